//! Trip statistics accumulator.
//!
//! Folds location samples into cumulative distance, instantaneous speed and
//! trip lifetime markers.
//!
//! # Design
//!
//! - Distance increments are always measured from the previous accepted
//!   sample, never further back
//! - Device-reported speed wins over derived speed
//! - Derived speed needs forward time progress; otherwise the last speed holds
//! - `distance_today` resets daily, `total_distance` never does

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::{self, Coordinate};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// Cumulative trip bookkeeping for one vehicle.
///
/// Invariant: `distance_today <= total_distance`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TripState {
    /// Kilometres travelled since the last daily reset.
    pub distance_today: f64,
    /// Kilometres travelled since the vehicle was created.
    pub total_distance: f64,
    /// Last known speed in km/h.
    pub speed: f64,
    /// First sample time since the last reset.
    pub trip_start_time: Option<DateTime<Utc>>,
    /// Baseline for the next distance increment.
    pub last_location: Option<Coordinate>,
    /// Time of the most recent accepted sample.
    pub last_updated: Option<DateTime<Utc>>,
}

/// What a single sample contributed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TripStep {
    /// Distance from the previous location in km (0 for the first sample).
    pub increment_km: f64,
    /// Bearing from the previous location, if the vehicle moved.
    pub heading: Option<f64>,
}

impl TripState {
    /// Fold a sample into the trip.
    ///
    /// A non-finite coordinate contributes nothing: distances, speed and the
    /// baseline location are left as they were.
    pub fn apply_sample(
        &mut self,
        coordinate: Coordinate,
        timestamp: DateTime<Utc>,
        explicit_speed: Option<f64>,
    ) -> TripStep {
        let explicit_speed = explicit_speed.and_then(sanitize_speed);

        if !coordinate.is_finite() {
            return TripStep {
                increment_km: 0.0,
                heading: None,
            };
        }

        let Some(previous) = self.last_location else {
            // First sample: establish the baseline only
            self.last_location = Some(coordinate);
            self.trip_start_time.get_or_insert(timestamp);
            self.speed = explicit_speed.unwrap_or(0.0);
            self.last_updated = Some(timestamp);
            return TripStep {
                increment_km: 0.0,
                heading: None,
            };
        };

        let increment = geo::distance(previous, coordinate);
        self.distance_today += increment;
        self.total_distance += increment;

        match explicit_speed {
            Some(speed) => self.speed = speed,
            None => {
                if let Some(derived) = self.derive_speed(increment, timestamp) {
                    self.speed = derived;
                }
            }
        }

        self.last_location = Some(coordinate);
        self.last_updated = Some(timestamp);

        TripStep {
            increment_km: increment,
            heading: (increment > 0.0).then(|| geo::bearing(previous, coordinate)),
        }
    }

    /// Start a new day.
    ///
    /// Zeroes `distance_today` and restarts the trip clock. `total_distance`
    /// and `last_location` are untouched so the next increment is still
    /// measured from the last known position.
    pub fn reset_daily(&mut self, at: DateTime<Utc>) {
        self.distance_today = 0.0;
        self.trip_start_time = Some(at);
    }

    /// Speed derived from the increment over elapsed time, if time moved forward.
    fn derive_speed(&self, increment: f64, timestamp: DateTime<Utc>) -> Option<f64> {
        if increment <= 0.0 {
            return None;
        }
        let last = self.last_updated?;
        let elapsed_hours = (timestamp - last).num_milliseconds() as f64 / MILLIS_PER_HOUR;
        if elapsed_hours <= 0.0 {
            return None;
        }
        Some(increment / elapsed_hours)
    }
}

/// Negative device speeds are floored at zero; non-finite ones are ignored.
fn sanitize_speed(speed: f64) -> Option<f64> {
    speed.is_finite().then(|| speed.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    #[test]
    fn test_first_sample_sets_baseline_only() {
        let mut trip = TripState::default();
        let step = trip.apply_sample(Coordinate::new(20.2961, 85.8245), t0(), None);

        assert_eq!(step.increment_km, 0.0);
        assert!(step.heading.is_none());
        assert_eq!(trip.distance_today, 0.0);
        assert_eq!(trip.total_distance, 0.0);
        assert_eq!(trip.speed, 0.0);
        assert_eq!(trip.trip_start_time, Some(t0()));
        assert_eq!(trip.last_location, Some(Coordinate::new(20.2961, 85.8245)));
        assert_eq!(trip.last_updated, Some(t0()));
    }

    #[test]
    fn test_first_sample_uses_explicit_speed() {
        let mut trip = TripState::default();
        trip.apply_sample(Coordinate::new(20.0, 85.0), t0(), Some(42.0));
        assert_eq!(trip.speed, 42.0);
    }

    #[test]
    fn test_derived_speed_one_minute_hop() {
        let mut trip = TripState::default();
        trip.apply_sample(Coordinate::new(20.2961, 85.8245), t0(), None);
        let step = trip.apply_sample(
            Coordinate::new(20.2945, 85.8197),
            t0() + Duration::minutes(1),
            None,
        );

        assert!(
            step.increment_km > 0.50 && step.increment_km < 0.55,
            "Expected ~0.52km, got {}",
            step.increment_km
        );
        assert!(
            trip.speed > 30.0 && trip.speed < 33.0,
            "Expected ~31km/h, got {}",
            trip.speed
        );
        assert_eq!(trip.distance_today, step.increment_km);
        assert_eq!(trip.total_distance, step.increment_km);
    }

    #[test]
    fn test_explicit_speed_wins_over_derived() {
        let mut trip = TripState::default();
        trip.apply_sample(Coordinate::new(20.2961, 85.8245), t0(), None);
        trip.apply_sample(
            Coordinate::new(20.2945, 85.8197),
            t0() + Duration::minutes(1),
            Some(12.5),
        );
        assert_eq!(trip.speed, 12.5);
    }

    #[test]
    fn test_negative_explicit_speed_floored() {
        let mut trip = TripState::default();
        trip.apply_sample(Coordinate::new(20.0, 85.0), t0(), Some(-5.0));
        assert_eq!(trip.speed, 0.0);
    }

    #[test]
    fn test_non_finite_explicit_speed_falls_back_to_derived() {
        let mut trip = TripState::default();
        trip.apply_sample(Coordinate::new(20.2961, 85.8245), t0(), None);
        trip.apply_sample(
            Coordinate::new(20.2945, 85.8197),
            t0() + Duration::minutes(1),
            Some(f64::NAN),
        );
        assert!(trip.speed > 30.0 && trip.speed < 33.0);
    }

    #[test]
    fn test_zero_elapsed_time_keeps_previous_speed() {
        let mut trip = TripState::default();
        trip.apply_sample(Coordinate::new(20.0, 85.0), t0(), Some(25.0));
        trip.apply_sample(Coordinate::new(20.01, 85.0), t0(), None);

        assert_eq!(trip.speed, 25.0);
        assert!(trip.total_distance > 1.0, "distance still accumulates");
    }

    #[test]
    fn test_backwards_time_keeps_previous_speed() {
        let mut trip = TripState::default();
        trip.apply_sample(Coordinate::new(20.0, 85.0), t0(), Some(25.0));
        trip.apply_sample(
            Coordinate::new(20.01, 85.0),
            t0() - Duration::seconds(30),
            None,
        );
        assert_eq!(trip.speed, 25.0);
        assert!(trip.speed >= 0.0);
    }

    #[test]
    fn test_stationary_sample_keeps_speed_and_has_no_heading() {
        let mut trip = TripState::default();
        trip.apply_sample(Coordinate::new(20.0, 85.0), t0(), Some(18.0));
        let step = trip.apply_sample(
            Coordinate::new(20.0, 85.0),
            t0() + Duration::seconds(30),
            None,
        );
        assert_eq!(step.increment_km, 0.0);
        assert!(step.heading.is_none());
        assert_eq!(trip.speed, 18.0);
    }

    #[test]
    fn test_heading_north() {
        let mut trip = TripState::default();
        trip.apply_sample(Coordinate::new(20.0, 85.0), t0(), None);
        let step = trip.apply_sample(
            Coordinate::new(20.01, 85.0),
            t0() + Duration::seconds(60),
            None,
        );
        let heading = step.heading.unwrap();
        assert!(heading < 0.1 || heading > 359.9, "Expected ~0°, got {}", heading);
    }

    #[test]
    fn test_last_location_tracks_latest_sample() {
        let mut trip = TripState::default();
        let a = Coordinate::new(20.00, 85.00);
        let b = Coordinate::new(20.01, 85.00);
        let c = Coordinate::new(20.02, 85.00);

        trip.apply_sample(a, t0(), None);
        trip.apply_sample(b, t0() + Duration::minutes(1), None);
        trip.apply_sample(c, t0() + Duration::minutes(2), None);

        assert_eq!(trip.last_location, Some(c));
        let expected = geo::distance(a, b) + geo::distance(b, c);
        assert!((trip.total_distance - expected).abs() < 1e-9);
    }

    #[test]
    fn test_reset_daily() {
        let mut trip = TripState::default();
        trip.apply_sample(Coordinate::new(20.0, 85.0), t0(), None);
        trip.apply_sample(Coordinate::new(20.1, 85.0), t0() + Duration::hours(1), None);

        let total = trip.total_distance;
        let last = trip.last_location;
        let midnight = t0() + Duration::hours(16);
        trip.reset_daily(midnight);

        assert_eq!(trip.distance_today, 0.0);
        assert_eq!(trip.total_distance, total);
        assert_eq!(trip.last_location, last);
        assert_eq!(trip.trip_start_time, Some(midnight));
        assert!(trip.distance_today <= trip.total_distance);
    }

    #[test]
    fn test_increment_after_reset_measured_from_last_location() {
        let mut trip = TripState::default();
        let a = Coordinate::new(20.0, 85.0);
        let b = Coordinate::new(20.1, 85.0);
        trip.apply_sample(a, t0(), None);
        trip.reset_daily(t0() + Duration::hours(1));
        trip.apply_sample(b, t0() + Duration::hours(2), None);

        assert!((trip.distance_today - geo::distance(a, b)).abs() < 1e-9);
        assert!(trip.distance_today <= trip.total_distance);
    }

    #[test]
    fn test_non_finite_coordinate_is_skipped() {
        let mut trip = TripState::default();
        let a = Coordinate::new(0.0, 0.0);
        let b = Coordinate::new(0.0, 0.01);

        trip.apply_sample(a, t0(), None);
        let step = trip.apply_sample(Coordinate::new(f64::NAN, 0.0), t0() + Duration::minutes(1), None);
        trip.apply_sample(b, t0() + Duration::minutes(2), None);

        assert_eq!(step.increment_km, 0.0);
        assert_eq!(trip.last_location, Some(b));
        assert!((trip.total_distance - geo::distance(a, b)).abs() < 1e-9);
        assert!(trip.distance_today.is_finite());
        assert!(trip.distance_today <= trip.total_distance);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn samples() -> impl Strategy<Value = Vec<(f64, f64, i64)>> {
            prop::collection::vec((-60.0..60.0_f64, -170.0..170.0_f64, 0i64..600), 1..40)
        }

        proptest! {
            #[test]
            fn test_total_is_sum_of_pairwise_increments(points in samples()) {
                let mut trip = TripState::default();
                let mut at = t0();
                let mut expected = 0.0;
                let mut previous: Option<Coordinate> = None;

                for (lat, lon, gap_secs) in points {
                    let c = Coordinate::new(lat, lon);
                    at += Duration::seconds(gap_secs);
                    trip.apply_sample(c, at, None);
                    if let Some(p) = previous {
                        expected += geo::distance(p, c);
                    }
                    previous = Some(c);
                }

                prop_assert!((trip.total_distance - expected).abs() < 1e-6);
            }

            #[test]
            fn test_today_never_exceeds_total(
                points in samples(),
                reset_at in 0usize..40,
            ) {
                let mut trip = TripState::default();
                let mut at = t0();

                for (i, (lat, lon, gap_secs)) in points.into_iter().enumerate() {
                    at += Duration::seconds(gap_secs);
                    if i == reset_at {
                        trip.reset_daily(at);
                        prop_assert!(trip.distance_today <= trip.total_distance);
                    }
                    trip.apply_sample(Coordinate::new(lat, lon), at, None);
                    prop_assert!(trip.distance_today <= trip.total_distance);
                    prop_assert!(trip.speed >= 0.0);
                }
            }
        }
    }
}
