//! Proximity and arrival estimates, consumed on the observer side.
//!
//! - [`eta`] / [`format_eta`] - arrival estimate at a constant average speed
//! - [`nearest_point`] / [`check_approach`] - pure queries over points of interest
//! - [`ProximityEngine`] - per-observer state with de-duplicated approach alerts
//!
//! # Example
//!
//! ```
//! use fleetwatch::geo::Coordinate;
//! use fleetwatch::proximity::{eta, DEFAULT_AVERAGE_SPEED_KMH};
//!
//! let estimate = eta(
//!     Coordinate::new(0.0, 0.0),
//!     Coordinate::new(0.0, 0.001),
//!     DEFAULT_AVERAGE_SPEED_KMH,
//! );
//! assert_eq!(estimate.text, "Arriving now");
//! ```

mod engine;
mod eta;
mod poi;

pub use engine::{ApproachAlert, ProximityConfig, ProximityEngine, ProximityUpdate};
pub use eta::{eta, eta_for_distance, format_eta, Eta, DEFAULT_AVERAGE_SPEED_KMH};
pub use poi::{check_approach, nearest_point, PointOfInterest, DEFAULT_APPROACH_RADIUS_KM};
