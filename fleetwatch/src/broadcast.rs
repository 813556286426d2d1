//! Update broadcaster.
//!
//! Resolves the interest registry for an event's vehicle and hands the event
//! to every current subscriber's outbound queue. Delivery uses `try_send`, so
//! a slow or vanished observer never blocks ingestion or its peers; it simply
//! misses the event.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::registry::{Delivery, InterestRegistry};
use crate::telemetry::TrackingMetrics;
use crate::trip::UpdateEvent;

/// Delivery outcome of a single publish.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PublishReport {
    /// Observers whose queue accepted the event.
    pub delivered: usize,
    /// Observers skipped because their queue was full or closed.
    pub dropped: usize,
}

impl PublishReport {
    /// Number of subscribers at publish time.
    pub fn subscribers(&self) -> usize {
        self.delivered + self.dropped
    }
}

/// Sink for update events.
///
/// The fleet publishes through this trait while holding a vehicle's lock, so
/// implementations must not block.
pub trait UpdatePublisher: Send + Sync {
    fn publish(&self, event: UpdateEvent) -> PublishReport;
}

/// Fans update events out to the observers registered for each vehicle.
#[derive(Debug, Clone)]
pub struct Broadcaster {
    registry: Arc<InterestRegistry>,
    metrics: Arc<TrackingMetrics>,
}

impl Broadcaster {
    pub fn new(registry: Arc<InterestRegistry>, metrics: Arc<TrackingMetrics>) -> Self {
        Self { registry, metrics }
    }

    /// The registry this broadcaster resolves subscribers from.
    pub fn registry(&self) -> &Arc<InterestRegistry> {
        &self.registry
    }
}

impl UpdatePublisher for Broadcaster {
    fn publish(&self, event: UpdateEvent) -> PublishReport {
        // Snapshot first so no registry guard is held across delivery
        let subscribers = self.registry.subscribers(&event.vehicle_id);
        let event = Arc::new(event);
        let mut report = PublishReport::default();

        for observer in &subscribers {
            match observer.deliver(Arc::clone(&event)) {
                Delivery::Delivered => report.delivered += 1,
                outcome => {
                    report.dropped += 1;
                    debug!(
                        vehicle = %event.vehicle_id,
                        observer = %observer.id(),
                        ?outcome,
                        "Update not delivered"
                    );
                }
            }
        }

        self.metrics
            .event_published(report.delivered, report.dropped);
        trace!(
            vehicle = %event.vehicle_id,
            delivered = report.delivered,
            dropped = report.dropped,
            "Update published"
        );
        report
    }
}
