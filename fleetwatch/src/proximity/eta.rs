//! Arrival-time estimates.

use serde::{Deserialize, Serialize};

use crate::geo::{self, Coordinate};

/// Average speed assumed when none is configured (km/h).
pub const DEFAULT_AVERAGE_SPEED_KMH: f64 = 30.0;

/// Estimated arrival at a target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Eta {
    pub distance_km: f64,
    pub minutes: u64,
    /// Human-readable form of `minutes`, see [`format_eta`].
    pub text: String,
}

/// Estimate arrival from `from` to `to` at a constant average speed.
///
/// A speed that is zero, negative or not finite falls back to
/// [`DEFAULT_AVERAGE_SPEED_KMH`].
pub fn eta(from: Coordinate, to: Coordinate, average_speed_kmh: f64) -> Eta {
    eta_for_distance(geo::distance(from, to), average_speed_kmh)
}

/// Estimate arrival over a known distance.
pub fn eta_for_distance(distance_km: f64, average_speed_kmh: f64) -> Eta {
    let speed = if average_speed_kmh.is_finite() && average_speed_kmh > 0.0 {
        average_speed_kmh
    } else {
        DEFAULT_AVERAGE_SPEED_KMH
    };

    let minutes = (distance_km / speed * 60.0).round().max(0.0) as u64;
    Eta {
        distance_km,
        minutes,
        text: format_eta(minutes),
    }
}

/// Render whole minutes as `Arriving now`, `1 min`, `N mins` or `Hh Mm`.
pub fn format_eta(minutes: u64) -> String {
    match minutes {
        0 => "Arriving now".to_string(),
        1 => "1 min".to_string(),
        m if m < 60 => format!("{} mins", m),
        m => format!("{}h {}m", m / 60, m % 60),
    }
}
