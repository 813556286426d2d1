//! Lock-free atomic metrics collection.

use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

use super::TelemetrySnapshot;

/// Lock-free counters for the tracking core.
///
/// All operations use `Relaxed` ordering; the counters are independent
/// measurements and never used for synchronization.
#[derive(Debug)]
pub struct TrackingMetrics {
    start_time: Instant,

    // === Ingestion ===
    samples_ingested: AtomicU64,
    samples_rejected: AtomicU64,
    daily_resets: AtomicU64,

    // === Fan-out ===
    events_published: AtomicU64,
    deliveries: AtomicU64,
    deliveries_dropped: AtomicU64,

    // === Subscriptions ===
    joins: AtomicU64,
    leaves: AtomicU64,
    observers_connected: AtomicUsize,
    observers_disconnected: AtomicU64,
}

impl Default for TrackingMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingMetrics {
    /// Creates a new metrics instance.
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            samples_ingested: AtomicU64::new(0),
            samples_rejected: AtomicU64::new(0),
            daily_resets: AtomicU64::new(0),
            events_published: AtomicU64::new(0),
            deliveries: AtomicU64::new(0),
            deliveries_dropped: AtomicU64::new(0),
            joins: AtomicU64::new(0),
            leaves: AtomicU64::new(0),
            observers_connected: AtomicUsize::new(0),
            observers_disconnected: AtomicU64::new(0),
        }
    }

    // === Ingestion tracking ===

    /// Record a sample folded into a vehicle's trip.
    pub fn sample_ingested(&self) {
        self.samples_ingested.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a sample rejected before reaching the accumulator.
    pub fn sample_rejected(&self) {
        self.samples_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a daily reset sweep across `vehicles` vehicles.
    pub fn daily_reset(&self, vehicles: usize) {
        self.daily_resets
            .fetch_add(vehicles as u64, Ordering::Relaxed);
    }

    // === Fan-out tracking ===

    /// Record one published event and its delivery outcome.
    pub fn event_published(&self, delivered: usize, dropped: usize) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
        self.deliveries
            .fetch_add(delivered as u64, Ordering::Relaxed);
        self.deliveries_dropped
            .fetch_add(dropped as u64, Ordering::Relaxed);
    }

    // === Subscription tracking ===

    /// Record an observer joining a vehicle room.
    pub fn observer_joined(&self) {
        self.joins.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an observer leaving a vehicle room.
    pub fn observer_left(&self) {
        self.leaves.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a new observer connection.
    pub fn observer_connected(&self) {
        self.observers_connected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an observer connection closing.
    pub fn observer_disconnected(&self) {
        self.observers_connected.fetch_sub(1, Ordering::Relaxed);
        self.observers_disconnected
            .fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            uptime: self.start_time.elapsed(),
            samples_ingested: self.samples_ingested.load(Ordering::Relaxed),
            samples_rejected: self.samples_rejected.load(Ordering::Relaxed),
            daily_resets: self.daily_resets.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
            deliveries: self.deliveries.load(Ordering::Relaxed),
            deliveries_dropped: self.deliveries_dropped.load(Ordering::Relaxed),
            joins: self.joins.load(Ordering::Relaxed),
            leaves: self.leaves.load(Ordering::Relaxed),
            observers_connected: self.observers_connected.load(Ordering::Relaxed),
            observers_disconnected: self.observers_disconnected.load(Ordering::Relaxed),
        }
    }
}
