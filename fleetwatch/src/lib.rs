//! FleetWatch - live vehicle tracking for observers
//!
//! This library ingests sparse GPS samples for tracked vehicles, folds them
//! into per-vehicle trip statistics, and fans each resulting update out to the
//! observers currently watching that vehicle. Observers run a proximity engine
//! over the update stream to estimate arrival times at points of interest and
//! raise de-duplicated "approaching" alerts.
//!
//! # Architecture
//!
//! ```text
//! Sample ──► Fleet (per-vehicle lock) ──► TripState::apply_sample ──► UpdateEvent
//!                                                                        │
//!                      InterestRegistry ◄── Broadcaster::publish ◄───────┘
//!                             │
//!                             ▼
//!               one bounded queue per observer ──► ProximityEngine (observer side)
//! ```

pub mod broadcast;
pub mod config;
pub mod error;
pub mod fleet;
pub mod geo;
pub mod logging;
pub mod proximity;
pub mod registry;
pub mod service;
pub mod telemetry;
pub mod transport;
pub mod trip;

pub use error::TrackingError;

/// Library version, as recorded in Cargo.toml.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
