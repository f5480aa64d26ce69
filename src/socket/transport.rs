//! Transport Seam Module
//!
//! The injected transport boundary: the client owns a [`Transport`] produced
//! by a [`Connector`], and never touches the network directly. Production
//! code supplies the WebSocket connector; tests supply scripted fakes.

use async_trait::async_trait;

use crate::error::Result;
use crate::socket::Frame;

// == Transport Event ==
/// What a transport reports back to its owner.
#[derive(Debug)]
pub enum TransportEvent {
    /// A decoded inbound frame
    Frame(Frame),
    /// The transport failed; the connection is no longer usable
    Errored(String),
    /// The transport closed (peer close or local close)
    Closed,
}

// == Transport ==
/// An open bidirectional message stream.
///
/// The socket client holds the only handle to a transport for its entire
/// lifetime; nothing else may send on it or close it.
#[async_trait]
pub trait Transport: Send {
    /// Sends one frame to the peer.
    async fn send(&mut self, frame: Frame) -> Result<()>;

    /// Waits for the next inbound event.
    ///
    /// Once `Closed` or `Errored` has been returned the transport is spent
    /// and `recv` must keep returning `Closed`.
    async fn recv(&mut self) -> TransportEvent;

    /// Closes the transport. Errors during close are swallowed; the handle
    /// is being dropped either way.
    async fn close(&mut self);
}

// == Connector ==
/// Factory for transports, injected into the socket client.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Attempts to open a transport to `url`.
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>>;
}
