//! Tracking telemetry for observability.
//!
//! This module provides counters for the ingestion and fan-out paths. It uses
//! lock-free atomic counters so that instrumenting the per-vehicle critical
//! section costs a handful of relaxed increments.
//!
//! # Architecture
//!
//! ```text
//! Fleet / Broadcaster / Gateway ─────► TrackingMetrics ─────► TelemetrySnapshot ─────► Views
//!                                      (atomic counters)      (point-in-time copy)     (CLI, logs)
//! ```
//!
//! # Example
//!
//! ```
//! use fleetwatch::telemetry::TrackingMetrics;
//! use std::sync::Arc;
//!
//! let metrics = Arc::new(TrackingMetrics::new());
//!
//! metrics.sample_ingested();
//! metrics.event_published(3, 1); // 3 delivered, 1 dropped
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.samples_ingested, 1);
//! assert_eq!(snapshot.deliveries_dropped, 1);
//! ```

mod metrics;
mod snapshot;

pub use metrics::TrackingMetrics;
pub use snapshot::TelemetrySnapshot;
