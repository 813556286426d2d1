//! Per-connection message handling, independent of the socket.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use super::message::{ClientMessage, ServerMessage};
use crate::fleet::Fleet;
use crate::geo::Coordinate;
use crate::registry::{InterestRegistry, ObserverHandle};
use crate::telemetry::TrackingMetrics;
use crate::trip::Sample;

/// Shared state every connection needs.
#[derive(Clone)]
pub struct GatewayContext {
    pub fleet: Arc<Fleet>,
    pub registry: Arc<InterestRegistry>,
    pub metrics: Arc<TrackingMetrics>,
    /// Capacity of each connection's outbound event queue.
    pub queue_capacity: usize,
}

/// One observer connection's view of the core.
pub struct Session {
    ctx: GatewayContext,
    observer: ObserverHandle,
}

impl Session {
    pub fn new(ctx: GatewayContext, observer: ObserverHandle) -> Self {
        ctx.metrics.observer_connected();
        Self { ctx, observer }
    }

    pub fn observer(&self) -> &ObserverHandle {
        &self.observer
    }

    /// Handle one inbound text frame, returning the reply to send, if any.
    pub fn handle_text(&self, text: &str) -> Option<ServerMessage> {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(message) => self.handle(message),
            Err(e) => {
                debug!(observer = %self.observer.id(), error = %e, "Malformed frame");
                Some(ServerMessage::error(format!("Malformed message: {}", e)))
            }
        }
    }

    /// Handle one decoded message.
    pub fn handle(&self, message: ClientMessage) -> Option<ServerMessage> {
        match message {
            ClientMessage::Join { vehicle_id } => {
                if self.ctx.registry.join(vehicle_id.clone(), &self.observer) {
                    self.ctx.metrics.observer_joined();
                }
                Some(ServerMessage::Joined { vehicle_id })
            }
            ClientMessage::Leave { vehicle_id } => {
                if self.ctx.registry.leave(&vehicle_id, self.observer.id()) {
                    self.ctx.metrics.observer_left();
                }
                Some(ServerMessage::Left { vehicle_id })
            }
            ClientMessage::Sample {
                vehicle_id,
                latitude,
                longitude,
                timestamp,
                speed,
            } => {
                let coordinate = match Coordinate::validated(latitude, longitude) {
                    Ok(coordinate) => coordinate,
                    Err(e) => {
                        self.ctx.metrics.sample_rejected();
                        warn!(vehicle = %vehicle_id, error = %e, "Sample rejected");
                        return Some(ServerMessage::error(e.to_string()));
                    }
                };

                let mut sample =
                    Sample::new(vehicle_id, coordinate, timestamp.unwrap_or_else(Utc::now));
                sample.speed = speed;

                match self.ctx.fleet.ingest(sample) {
                    Ok(_) => None,
                    Err(e) => Some(ServerMessage::error(e.to_string())),
                }
            }
        }
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        let rooms = self.ctx.registry.leave_all(self.observer.id());
        self.ctx.metrics.observer_disconnected();
        debug!(observer = %self.observer.id(), rooms, "Session closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::broadcast::Broadcaster;
    use crate::trip::{TrackedVehicle, VehicleId};

    fn context() -> GatewayContext {
        let registry = Arc::new(InterestRegistry::new());
        let metrics = Arc::new(TrackingMetrics::new());
        let broadcaster = Arc::new(Broadcaster::new(Arc::clone(&registry), Arc::clone(&metrics)));
        let fleet = Arc::new(Fleet::new(broadcaster, Arc::clone(&metrics)));
        fleet.register(TrackedVehicle::new("bus-1")).unwrap();
        GatewayContext {
            fleet,
            registry,
            metrics,
            queue_capacity: 8,
        }
    }

    fn session(ctx: &GatewayContext) -> (Session, tokio::sync::mpsc::Receiver<Arc<crate::trip::UpdateEvent>>) {
        let (observer, rx) = ObserverHandle::channel(ctx.queue_capacity);
        (Session::new(ctx.clone(), observer), rx)
    }

    #[test]
    fn test_join_then_sample_delivers_update() {
        let ctx = context();
        let (session, mut rx) = session(&ctx);

        let reply = session.handle_text(r#"{"type":"join","vehicle_id":"bus-1"}"#);
        assert_eq!(
            reply,
            Some(ServerMessage::Joined {
                vehicle_id: VehicleId::new("bus-1")
            })
        );

        let reply = session.handle_text(
            r#"{"type":"sample","vehicle_id":"bus-1","latitude":20.2961,"longitude":85.8245}"#,
        );
        assert!(reply.is_none());

        let event = rx.try_recv().unwrap();
        assert_eq!(event.vehicle_id, VehicleId::new("bus-1"));
        assert_eq!(event.coordinate, Coordinate::new(20.2961, 85.8245));
    }

    #[test]
    fn test_sample_for_unknown_vehicle_is_error() {
        let ctx = context();
        let (session, _rx) = session(&ctx);

        let reply = session.handle_text(
            r#"{"type":"sample","vehicle_id":"ghost","latitude":1.0,"longitude":1.0}"#,
        );
        match reply {
            Some(ServerMessage::Error { message }) => assert!(message.contains("ghost")),
            other => panic!("expected error, got {:?}", other),
        }
    }

    #[test]
    fn test_out_of_range_coordinate_is_rejected() {
        let ctx = context();
        let (session, _rx) = session(&ctx);

        let reply = session.handle_text(
            r#"{"type":"sample","vehicle_id":"bus-1","latitude":95.0,"longitude":1.0}"#,
        );
        assert!(matches!(reply, Some(ServerMessage::Error { .. })));
        assert!(ctx.fleet.snapshot(&VehicleId::new("bus-1")).unwrap().coordinate.is_none());
        assert_eq!(ctx.metrics.snapshot().samples_rejected, 1);
    }

    #[test]
    fn test_malformed_frame_is_error() {
        let ctx = context();
        let (session, _rx) = session(&ctx);
        assert!(matches!(
            session.handle_text("not json"),
            Some(ServerMessage::Error { .. })
        ));
    }

    #[test]
    fn test_leave_stops_updates() {
        let ctx = context();
        let (session, mut rx) = session(&ctx);
        session.handle_text(r#"{"type":"join","vehicle_id":"bus-1"}"#);
        session.handle_text(r#"{"type":"leave","vehicle_id":"bus-1"}"#);

        session.handle_text(
            r#"{"type":"sample","vehicle_id":"bus-1","latitude":1.0,"longitude":1.0}"#,
        );
        assert!(rx.try_recv().is_err());

        let snapshot = ctx.metrics.snapshot();
        assert_eq!(snapshot.joins, 1);
        assert_eq!(snapshot.leaves, 1);
    }

    #[test]
    fn test_drop_leaves_all_rooms() {
        let ctx = context();
        let (session, _rx) = session(&ctx);
        let id = session.observer().id();
        session.handle_text(r#"{"type":"join","vehicle_id":"bus-1"}"#);
        session.handle_text(r#"{"type":"join","vehicle_id":"bus-2"}"#);
        assert_eq!(ctx.registry.rooms_of(id).len(), 2);

        drop(session);

        assert!(ctx.registry.rooms_of(id).is_empty());
        assert_eq!(ctx.registry.room_count(), 0);
        let snapshot = ctx.metrics.snapshot();
        assert_eq!(snapshot.observers_connected, 0);
        assert_eq!(snapshot.observers_disconnected, 1);
    }
}
