//! Point-in-time telemetry snapshot.
//!
//! Provides an immutable view of metrics for display and reporting.

use std::fmt;
use std::time::Duration;

/// A point-in-time snapshot of tracking metrics.
#[derive(Clone, Debug, Default)]
pub struct TelemetrySnapshot {
    /// How long the service has been running
    pub uptime: Duration,

    // === Ingestion ===
    /// Samples folded into a vehicle's trip
    pub samples_ingested: u64,
    /// Samples rejected (unknown vehicle, invalid coordinate)
    pub samples_rejected: u64,
    /// Vehicles reset by daily sweeps
    pub daily_resets: u64,

    // === Fan-out ===
    /// Update events handed to the broadcaster
    pub events_published: u64,
    /// Successful enqueues into observer queues
    pub deliveries: u64,
    /// Deliveries skipped because a queue was full or closed
    pub deliveries_dropped: u64,

    // === Subscriptions ===
    /// Room joins
    pub joins: u64,
    /// Room leaves
    pub leaves: u64,
    /// Currently connected observers
    pub observers_connected: usize,
    /// Observer connections closed so far
    pub observers_disconnected: u64,
}

impl TelemetrySnapshot {
    /// Fraction of deliveries that were dropped (0.0 - 1.0).
    pub fn drop_rate(&self) -> f64 {
        let attempts = self.deliveries + self.deliveries_dropped;
        if attempts == 0 {
            0.0
        } else {
            self.deliveries_dropped as f64 / attempts as f64
        }
    }

    /// Average deliveries per published event.
    pub fn fan_out(&self) -> f64 {
        if self.events_published == 0 {
            0.0
        } else {
            self.deliveries as f64 / self.events_published as f64
        }
    }

    /// Format uptime as `HH:MM:SS`.
    pub fn uptime_human(&self) -> String {
        let secs = self.uptime.as_secs();
        format!("{:02}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
    }
}

impl fmt::Display for TelemetrySnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Tracking Telemetry (uptime: {})", self.uptime_human())?;
        writeln!(f, "─────────────────────────────────────────")?;
        writeln!(f, "Samples:")?;
        writeln!(f, "  Ingested: {}", self.samples_ingested)?;
        writeln!(f, "  Rejected: {}", self.samples_rejected)?;
        writeln!(f, "  Daily resets: {}", self.daily_resets)?;
        writeln!(f)?;
        writeln!(f, "Broadcast:")?;
        writeln!(f, "  Events: {}", self.events_published)?;
        writeln!(
            f,
            "  Deliveries: {} ({:.1} per event)",
            self.deliveries,
            self.fan_out()
        )?;
        writeln!(
            f,
            "  Dropped: {} ({:.1}%)",
            self.deliveries_dropped,
            self.drop_rate() * 100.0
        )?;
        writeln!(f)?;
        writeln!(f, "Observers:")?;
        writeln!(f, "  Connected: {}", self.observers_connected)?;
        writeln!(f, "  Disconnected: {}", self.observers_disconnected)?;
        write!(f, "  Joins/Leaves: {}/{}", self.joins, self.leaves)
    }
}
