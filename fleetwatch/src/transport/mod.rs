//! WebSocket transport for observers and position reporters.
//!
//! The gateway speaks a small JSON protocol (see [`message`]). Every
//! connection is one observer: it may join and leave vehicle rooms, report
//! samples, and receives an `update` frame for every event published to a
//! room it is in. Closing the connection leaves all rooms.

mod client;
mod error;
mod gateway;
pub mod message;
mod session;

pub use client::GatewayClient;
pub use error::TransportError;
pub use gateway::WebSocketGateway;
pub use message::{encode_update, ClientMessage, ServerMessage};
pub use session::{GatewayContext, Session};
