//! Geodesy kernel
//!
//! Pure great-circle helpers over WGS84 coordinates: haversine distance,
//! initial bearing and radius containment. No state, no error conditions.

mod types;

pub use types::{Coordinate, CoordinateError, EARTH_RADIUS_KM, MAX_LAT, MAX_LON, MIN_LAT, MIN_LON};

/// Great-circle distance between two coordinates in kilometres.
///
/// Uses the haversine formula with [`EARTH_RADIUS_KM`]. Returns exactly 0.0
/// for identical points.
#[inline]
pub fn distance(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlon = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    // Rounding can push h a hair above 1 for antipodal points
    let c = 2.0 * h.sqrt().atan2((1.0 - h).max(0.0).sqrt());

    EARTH_RADIUS_KM * c
}

/// Initial compass bearing from `from` towards `to`.
///
/// Returns degrees in `[0, 360)`, where 0 = North and 90 = East.
/// Identical points yield 0.
#[inline]
pub fn bearing(from: Coordinate, to: Coordinate) -> f64 {
    let lat1 = from.latitude.to_radians();
    let lat2 = to.latitude.to_radians();
    let dlon = (to.longitude - from.longitude).to_radians();

    let x = dlon.sin() * lat2.cos();
    let y = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * dlon.cos();

    normalize_degrees(x.atan2(y).to_degrees())
}

/// Returns true if `b` lies within `radius_km` of `a` (inclusive).
#[inline]
pub fn within_radius(a: Coordinate, b: Coordinate, radius_km: f64) -> bool {
    distance(a, b) <= radius_km
}

/// Normalize an angle in degrees to `[0, 360)`.
fn normalize_degrees(deg: f64) -> f64 {
    let normalized = deg.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs
    if normalized >= 360.0 {
        0.0
    } else {
        normalized
    }
}
