//! Socket Module
//!
//! Auto-reconnecting realtime socket client. The client keeps a logical
//! "always try to be connected" session over an unreliable transport:
//! unexpected drops re-enter connecting with bounded linear backoff, and the
//! publish/subscribe surface stays stable across the churn.
//!
//! Delivery guarantees are a non-goal: `emit` while disconnected drops the
//! frame, with no buffering.

mod client;
mod message;
mod registry;
mod state;
mod transport;
mod ws;

// Re-export public types
pub use client::{SocketClient, SocketConfig};
pub use message::Frame;
pub use registry::{Handler, HandlerRegistry, Subscription};
pub use state::{ConnectionState, SocketStatus};
pub use transport::{Connector, Transport, TransportEvent};
pub use ws::{WsConnector, WsTransport};
