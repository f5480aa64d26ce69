//! Error types for the session layer
//!
//! Provides unified error handling using thiserror. Only the socket side
//! contributes variants: cache operations are total and cannot fail.

use thiserror::Error;

// == Socket Error Enum ==
/// Failures that can occur on the socket transport.
///
/// These never surface synchronously from the client's public operations;
/// they are logged and drive the retry path internally, or travel inside
/// transport events.
#[derive(Error, Debug)]
pub enum SocketError {
    /// Opening the transport failed
    #[error("connect failed: {0}")]
    Connect(String),

    /// Sending a frame on an open transport failed
    #[error("send failed: {0}")]
    Send(String),

    /// A frame could not be encoded or decoded
    #[error("frame codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The transport is closed
    #[error("transport closed")]
    Closed,
}

// == Result Type Alias ==
/// Convenience Result type for the session layer.
pub type Result<T> = std::result::Result<T, SocketError>;
