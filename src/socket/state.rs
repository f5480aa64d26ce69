//! Connection State Module
//!
//! The socket client's state machine vocabulary and the observable status
//! snapshot published on the client's watch channel.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Connection State ==
/// Lifecycle state of the logical connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    /// No transport; initial state, and where every session ends up
    Disconnected,
    /// A transport open is in flight
    Connecting,
    /// The transport is open and frames flow
    Connected,
}

impl ConnectionState {
    /// Lowercase name, matching the serialized form.
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Disconnected => "disconnected",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Connected => "connected",
        }
    }
}

// == Socket Status ==
/// Snapshot of the client's externally observable state.
///
/// Published on a `tokio::sync::watch` channel whenever anything changes, so
/// callers can poll (`SocketClient::status`) or await transitions.
#[derive(Debug, Clone, Serialize)]
pub struct SocketStatus {
    /// Current lifecycle state
    pub state: ConnectionState,
    /// Failed/dropped attempts since the last successful connect
    pub reconnect_attempts: u32,
    /// True once the retry budget is exhausted; cleared by `connect()`
    pub gave_up: bool,
    /// When the current connection was established, if connected
    pub connected_at: Option<DateTime<Utc>>,
}

impl SocketStatus {
    /// Initial status: disconnected, no attempts, not given up.
    pub fn idle() -> Self {
        Self {
            state: ConnectionState::Disconnected,
            reconnect_attempts: 0,
            gave_up: false,
            connected_at: None,
        }
    }
}

impl Default for SocketStatus {
    fn default() -> Self {
        Self::idle()
    }
}
