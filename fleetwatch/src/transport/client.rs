//! Minimal WebSocket client for the gateway protocol.

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use super::error::TransportError;
use super::message::{ClientMessage, ServerMessage};
use crate::trip::{Sample, VehicleId};

/// A connection to a FleetWatch gateway.
pub struct GatewayClient {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl GatewayClient {
    /// Connect to a `ws://host:port` URL.
    pub async fn connect(url: &str) -> Result<Self, TransportError> {
        let (ws, _response) = tokio_tungstenite::connect_async(url).await?;
        Ok(Self { ws })
    }

    pub async fn send(&mut self, message: &ClientMessage) -> Result<(), TransportError> {
        let text = serde_json::to_string(message)?;
        self.ws.send(Message::Text(text)).await?;
        Ok(())
    }

    pub async fn join(&mut self, vehicle_id: VehicleId) -> Result<(), TransportError> {
        self.send(&ClientMessage::Join { vehicle_id }).await
    }

    pub async fn leave(&mut self, vehicle_id: VehicleId) -> Result<(), TransportError> {
        self.send(&ClientMessage::Leave { vehicle_id }).await
    }

    pub async fn send_sample(&mut self, sample: &Sample) -> Result<(), TransportError> {
        self.send(&ClientMessage::Sample {
            vehicle_id: sample.vehicle_id.clone(),
            latitude: sample.coordinate.latitude,
            longitude: sample.coordinate.longitude,
            timestamp: Some(sample.timestamp),
            speed: sample.speed,
        })
        .await
    }

    /// Wait for the next server message.
    ///
    /// Returns [`TransportError::Closed`] once the server hangs up.
    pub async fn next_message(&mut self) -> Result<ServerMessage, TransportError> {
        loop {
            match self.ws.next().await {
                None | Some(Ok(Message::Close(_))) => return Err(TransportError::Closed),
                Some(Err(e)) => return Err(e.into()),
                Some(Ok(Message::Text(text))) => return Ok(serde_json::from_str(&text)?),
                Some(Ok(_)) => continue,
            }
        }
    }

    pub async fn close(mut self) -> Result<(), TransportError> {
        self.ws.close(None).await?;
        Ok(())
    }
}
