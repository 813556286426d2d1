//! Points of interest and the pure queries over them.

use serde::{Deserialize, Serialize};

use crate::geo::{self, Coordinate};

/// Radius inside which a vehicle counts as approaching a point (km).
pub const DEFAULT_APPROACH_RADIUS_KM: f64 = 0.5;

/// A static location an observer cares about, such as a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointOfInterest {
    pub id: String,
    pub coordinate: Coordinate,
    pub label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PointOfInterest {
    pub fn new(id: impl Into<String>, label: impl Into<String>, coordinate: Coordinate) -> Self {
        Self {
            id: id.into(),
            coordinate,
            label: label.into(),
            address: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

/// Closest point to `coordinate` and its distance in km.
///
/// Ties go to the point seen first; returns `None` for an empty slice.
pub fn nearest_point(
    coordinate: Coordinate,
    points: &[PointOfInterest],
) -> Option<(&PointOfInterest, f64)> {
    let mut best: Option<(&PointOfInterest, f64)> = None;
    for point in points {
        let distance = geo::distance(coordinate, point.coordinate);
        match best {
            Some((_, best_distance)) if best_distance <= distance => {}
            _ => best = Some((point, distance)),
        }
    }
    best
}

/// First point (in slice order) within `radius_km` of `coordinate`.
pub fn check_approach(
    coordinate: Coordinate,
    points: &[PointOfInterest],
    radius_km: f64,
) -> Option<&PointOfInterest> {
    points
        .iter()
        .find(|point| geo::within_radius(coordinate, point.coordinate, radius_km))
}
