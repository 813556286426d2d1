//! Core error types.
//!
//! Business-logic no-ops (double join, leaving a room that was never joined,
//! delivering to a closed observer) are successes and have no variant here.

use thiserror::Error;

use crate::trip::VehicleId;

/// Errors surfaced by the tracking core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TrackingError {
    /// A sample or reset named a vehicle the fleet does not know.
    #[error("Unknown vehicle: {0}")]
    UnknownVehicle(VehicleId),

    /// The CRUD layer tried to register a vehicle id twice.
    #[error("Vehicle already registered: {0}")]
    DuplicateVehicle(VehicleId),
}
