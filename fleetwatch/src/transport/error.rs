//! Transport error types.

use thiserror::Error;
use tokio_tungstenite::tungstenite;

/// Errors raised by the WebSocket gateway and client.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Binding or accepting on the listen socket failed
    #[error("Socket error: {0}")]
    Io(#[from] std::io::Error),

    /// WebSocket handshake or framing failed
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tungstenite::Error),

    /// A frame could not be encoded or decoded as JSON
    #[error("Invalid message: {0}")]
    Codec(#[from] serde_json::Error),

    /// The peer closed the connection
    #[error("Connection closed")]
    Closed,
}
