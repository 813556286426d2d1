//! Trip-stat accumulator.
//!
//! Each tracked vehicle owns a [`TripState`] that is folded forward by every
//! accepted location sample. Folding a sample produces exactly one immutable
//! [`UpdateEvent`] snapshot for the broadcaster.
//!
//! # Usage
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use fleetwatch::geo::Coordinate;
//! use fleetwatch::trip::TrackedVehicle;
//!
//! let start = Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap();
//! let mut bus = TrackedVehicle::new("bus-7");
//!
//! bus.apply_sample(Coordinate::new(20.2961, 85.8245), start, None);
//! let event = bus.apply_sample(
//!     Coordinate::new(20.2945, 85.8197),
//!     start + Duration::minutes(1),
//!     None,
//! );
//!
//! assert!(event.trip.total_distance > 0.5);
//! assert!(event.speed > 30.0);
//! ```

mod model;
mod state;

pub use model::{Sample, TrackedVehicle, UpdateEvent, VehicleId, VehicleStatus};
pub use state::{TripState, TripStep};
