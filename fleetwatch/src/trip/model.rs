//! Core data types for vehicle tracking.
//!
//! - [`VehicleId`] - Opaque identity of a tracked vehicle
//! - [`VehicleStatus`] - Lifecycle status owned by the CRUD layer
//! - [`Sample`] - One raw location observation
//! - [`TrackedVehicle`] - A vehicle with its current position and trip state
//! - [`UpdateEvent`] - Immutable snapshot emitted for every accepted sample

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::state::TripState;
use crate::geo::Coordinate;

/// Opaque identity of a tracked vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VehicleId(String);

impl VehicleId {
    /// Create a vehicle id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VehicleId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for VehicleId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Lifecycle status of a vehicle.
///
/// Status is owned by the CRUD layer; tracking never changes it on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    #[default]
    Active,
    Inactive,
    Maintenance,
}

impl fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
            Self::Maintenance => write!(f, "maintenance"),
        }
    }
}

/// One raw location observation for a vehicle.
///
/// Numeric ranges and vehicle existence are the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub vehicle_id: VehicleId,
    pub coordinate: Coordinate,
    pub timestamp: DateTime<Utc>,
    /// Speed reported by the device in km/h, if any.
    pub speed: Option<f64>,
}

impl Sample {
    /// Create a sample without an explicit speed.
    pub fn new(
        vehicle_id: impl Into<VehicleId>,
        coordinate: Coordinate,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            coordinate,
            timestamp,
            speed: None,
        }
    }

    /// Attach a device-reported speed.
    pub fn with_speed(mut self, speed_kmh: f64) -> Self {
        self.speed = Some(speed_kmh);
        self
    }
}

/// Emitted once per accepted sample. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEvent {
    pub vehicle_id: VehicleId,
    pub coordinate: Coordinate,
    /// Speed in km/h after folding the sample.
    pub speed: f64,
    /// Initial bearing from the previous location, when the vehicle moved.
    pub heading: Option<f64>,
    pub status: VehicleStatus,
    pub timestamp: DateTime<Utc>,
    pub trip: TripState,
}

/// A vehicle as seen by the tracker.
///
/// Created by the CRUD layer with [`VehicleStatus::Active`] and an empty
/// [`TripState`]. Tracking only mutates `coordinate` and `trip`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedVehicle {
    pub id: VehicleId,
    /// Last known position, absent until the first sample.
    pub coordinate: Option<Coordinate>,
    pub status: VehicleStatus,
    pub trip: TripState,
}

impl TrackedVehicle {
    /// Create an active vehicle with no trip history.
    pub fn new(id: impl Into<VehicleId>) -> Self {
        Self {
            id: id.into(),
            coordinate: None,
            status: VehicleStatus::Active,
            trip: TripState::default(),
        }
    }

    /// Fold a sample into this vehicle and return the resulting event.
    ///
    /// Exactly one event is produced per call.
    pub fn apply_sample(
        &mut self,
        coordinate: Coordinate,
        timestamp: DateTime<Utc>,
        explicit_speed: Option<f64>,
    ) -> UpdateEvent {
        let step = self.trip.apply_sample(coordinate, timestamp, explicit_speed);
        if coordinate.is_finite() {
            self.coordinate = Some(coordinate);
        }

        UpdateEvent {
            vehicle_id: self.id.clone(),
            coordinate,
            speed: self.trip.speed,
            heading: step.heading,
            status: self.status,
            timestamp,
            trip: self.trip.clone(),
        }
    }

    /// Start a new day: see [`TripState::reset_daily`].
    pub fn reset_daily(&mut self, at: DateTime<Utc>) {
        self.trip.reset_daily(at);
    }
}
