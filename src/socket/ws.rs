//! WebSocket Connector Module
//!
//! Production [`Connector`] over tokio-tungstenite. Frames travel as JSON
//! text messages; ping/pong and binary traffic are handled or ignored at
//! this layer so the client above only ever sees decoded frames.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};

use crate::error::{Result, SocketError};
use crate::socket::{Connector, Frame, Transport, TransportEvent};

// == WebSocket Transport ==
/// One open WebSocket connection.
pub struct WsTransport {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

#[async_trait]
impl Transport for WsTransport {
    async fn send(&mut self, frame: Frame) -> Result<()> {
        let text = frame.encode()?;
        self.stream
            .send(Message::Text(text))
            .await
            .map_err(|e| SocketError::Send(e.to_string()))
    }

    async fn recv(&mut self) -> TransportEvent {
        loop {
            match self.stream.next().await {
                None => return TransportEvent::Closed,
                Some(Ok(Message::Text(text))) => match Frame::decode(&text) {
                    Ok(frame) => return TransportEvent::Frame(frame),
                    // Malformed frames are skipped, not fatal: one bad
                    // message from the server must not drop the connection.
                    Err(err) => warn!(error = %err, "skipping undecodable frame"),
                },
                Some(Ok(Message::Close(_))) => return TransportEvent::Closed,
                Some(Ok(other)) => {
                    // Ping/pong are answered by tungstenite itself; binary
                    // traffic is not part of the frame protocol.
                    debug!(kind = ?other, "ignoring non-text message");
                }
                Some(Err(err)) => return TransportEvent::Errored(err.to_string()),
            }
        }
    }

    async fn close(&mut self) {
        if let Err(err) = self.stream.close(None).await {
            debug!(error = %err, "error closing websocket");
        }
    }
}

// == WebSocket Connector ==
/// Connector that opens `ws://` / `wss://` endpoints.
#[derive(Debug, Clone, Default)]
pub struct WsConnector;

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, url: &str) -> Result<Box<dyn Transport>> {
        let (stream, response) = connect_async(url)
            .await
            .map_err(|e| SocketError::Connect(e.to_string()))?;

        debug!(url, status = %response.status(), "websocket handshake complete");
        Ok(Box::new(WsTransport { stream }))
    }
}
