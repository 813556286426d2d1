//! JSON wire messages.
//!
//! Every frame is a JSON object tagged by `type`:
//!
//! ```text
//! → {"type":"join","vehicle_id":"bus-1"}
//! → {"type":"leave","vehicle_id":"bus-1"}
//! → {"type":"sample","vehicle_id":"bus-1","latitude":20.29,"longitude":85.82,"speed":32.5}
//! ← {"type":"joined","vehicle_id":"bus-1"}
//! ← {"type":"update","vehicle_id":"bus-1","coordinate":{...},"trip":{...},...}
//! ← {"type":"error","message":"Unknown vehicle: bus-9"}
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::trip::{UpdateEvent, VehicleId};

/// Messages sent by a connected peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Start receiving updates for a vehicle.
    Join { vehicle_id: VehicleId },

    /// Stop receiving updates for a vehicle.
    Leave { vehicle_id: VehicleId },

    /// Report a position for a vehicle.
    Sample {
        vehicle_id: VehicleId,
        latitude: f64,
        longitude: f64,
        /// Defaults to the time the frame is received.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timestamp: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        speed: Option<f64>,
    },
}

/// Messages sent to a connected peer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    Joined { vehicle_id: VehicleId },
    Left { vehicle_id: VehicleId },
    Update(UpdateEvent),
    Error { message: String },
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Borrowed form of [`ServerMessage::Update`], so fan-out never clones events.
#[derive(Serialize)]
#[serde(tag = "type", rename = "update")]
struct UpdateFrame<'a> {
    #[serde(flatten)]
    event: &'a UpdateEvent,
}

/// Encode an update event as an outbound text frame.
pub fn encode_update(event: &UpdateEvent) -> Result<String, serde_json::Error> {
    serde_json::to_string(&UpdateFrame { event })
}
