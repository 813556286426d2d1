//! Observer-side proximity engine.
//!
//! Folds the update stream of the vehicles an observer watches into derived
//! state: nearest point, arrival estimate and approach alerts. Alerts are
//! edge-triggered per (vehicle, point): one alert on entering the radius,
//! none while staying inside, and another only after leaving and coming back.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use super::eta::{eta_for_distance, Eta, DEFAULT_AVERAGE_SPEED_KMH};
use super::poi::{nearest_point, PointOfInterest, DEFAULT_APPROACH_RADIUS_KM};
use crate::geo::{self, Coordinate};
use crate::trip::{UpdateEvent, VehicleId};

/// Tunables for the proximity engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProximityConfig {
    /// Radius inside which a vehicle is approaching a point (km).
    pub approach_radius_km: f64,
    /// Speed used for arrival estimates (km/h).
    pub average_speed_kmh: f64,
}

impl Default for ProximityConfig {
    fn default() -> Self {
        Self {
            approach_radius_km: DEFAULT_APPROACH_RADIUS_KM,
            average_speed_kmh: DEFAULT_AVERAGE_SPEED_KMH,
        }
    }
}

/// A vehicle has just entered a point's approach radius.
#[derive(Debug, Clone, PartialEq)]
pub struct ApproachAlert {
    pub vehicle_id: VehicleId,
    pub point: PointOfInterest,
    pub distance_km: f64,
}

/// Derived view after folding one update.
#[derive(Debug, Clone, PartialEq)]
pub struct ProximityUpdate {
    pub vehicle_id: VehicleId,
    /// Closest point and its distance in km.
    pub nearest: Option<(PointOfInterest, f64)>,
    /// Arrival estimate at the closest point.
    pub eta: Option<Eta>,
    /// Approach episodes that started with this update.
    pub alerts: Vec<ApproachAlert>,
}

/// Proximity state for one observer.
#[derive(Debug)]
pub struct ProximityEngine {
    config: ProximityConfig,
    points: Vec<PointOfInterest>,
    /// (vehicle, index into `points`) pairs currently inside the radius.
    inside: HashSet<(VehicleId, usize)>,
    last_seen: HashMap<VehicleId, DateTime<Utc>>,
}

impl ProximityEngine {
    pub fn new(points: Vec<PointOfInterest>, config: ProximityConfig) -> Self {
        Self {
            config,
            points,
            inside: HashSet::new(),
            last_seen: HashMap::new(),
        }
    }

    pub fn config(&self) -> &ProximityConfig {
        &self.config
    }

    /// Fold an update event.
    ///
    /// Returns `None` for an event older than the last one seen for the same
    /// vehicle.
    pub fn on_update(&mut self, event: &UpdateEvent) -> Option<ProximityUpdate> {
        if let Some(last) = self.last_seen.get(&event.vehicle_id) {
            if event.timestamp < *last {
                trace!(vehicle = %event.vehicle_id, "Stale update ignored");
                return None;
            }
        }
        self.last_seen
            .insert(event.vehicle_id.clone(), event.timestamp);

        Some(self.observe(&event.vehicle_id, event.coordinate))
    }

    /// Fold a bare position for a vehicle, bypassing the staleness check.
    pub fn observe(&mut self, vehicle: &VehicleId, coordinate: Coordinate) -> ProximityUpdate {
        let alerts = self.update_tags(vehicle, coordinate);

        let nearest = nearest_point(coordinate, &self.points)
            .map(|(point, distance)| (point.clone(), distance));
        let eta = nearest
            .as_ref()
            .map(|(_, distance)| eta_for_distance(*distance, self.config.average_speed_kmh));

        ProximityUpdate {
            vehicle_id: vehicle.clone(),
            nearest,
            eta,
            alerts,
        }
    }

    /// Drop all state for a vehicle the observer stopped watching.
    pub fn forget(&mut self, vehicle: &VehicleId) {
        self.inside.retain(|(id, _)| id != vehicle);
        self.last_seen.remove(vehicle);
    }

    /// Returns true while `vehicle` is inside the radius of `point_id`.
    pub fn is_inside(&self, vehicle: &VehicleId, point_id: &str) -> bool {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, point)| point.id == point_id)
            .any(|(index, _)| self.inside.contains(&(vehicle.clone(), index)))
    }

    fn update_tags(&mut self, vehicle: &VehicleId, coordinate: Coordinate) -> Vec<ApproachAlert> {
        let mut alerts = Vec::new();

        // Keyed by position so points sharing an id keep separate episodes
        for (index, point) in self.points.iter().enumerate() {
            let distance = geo::distance(coordinate, point.coordinate);
            let key = (vehicle.clone(), index);

            if distance <= self.config.approach_radius_km {
                if self.inside.insert(key) {
                    debug!(vehicle = %vehicle, point = %point.id, distance_km = distance, "Vehicle approaching");
                    alerts.push(ApproachAlert {
                        vehicle_id: vehicle.clone(),
                        point: point.clone(),
                        distance_km: distance,
                    });
                }
            } else {
                self.inside.remove(&key);
            }
        }

        alerts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trip::TrackedVehicle;
    use chrono::{Duration, TimeZone};

    fn stop() -> PointOfInterest {
        PointOfInterest::new("stop-1", "Central", Coordinate::new(0.0, 0.0))
    }

    fn engine() -> ProximityEngine {
        ProximityEngine::new(vec![stop()], ProximityConfig::default())
    }

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap()
    }

    /// Events for one vehicle along the given longitudes, one minute apart.
    fn drive(longitudes: &[f64]) -> Vec<UpdateEvent> {
        let mut bus = TrackedVehicle::new("bus-1");
        longitudes
            .iter()
            .enumerate()
            .map(|(i, lon)| {
                bus.apply_sample(
                    Coordinate::new(0.0, *lon),
                    start() + Duration::minutes(i as i64),
                    None,
                )
            })
            .collect()
    }

    #[test]
    fn test_alert_is_edge_triggered() {
        let mut engine = engine();
        // outside, enter, stay x3, leave, re-enter
        let events = drive(&[0.02, 0.004, 0.003, 0.002, 0.001, 0.02, 0.003]);

        let alert_counts: Vec<usize> = events
            .iter()
            .map(|e| engine.on_update(e).unwrap().alerts.len())
            .collect();

        assert_eq!(alert_counts, vec![0, 1, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_alert_carries_point_and_distance() {
        let mut engine = engine();
        let events = drive(&[0.003]);

        let update = engine.on_update(&events[0]).unwrap();
        let alert = &update.alerts[0];
        assert_eq!(alert.point.id, "stop-1");
        assert_eq!(alert.vehicle_id, VehicleId::new("bus-1"));
        assert!((alert.distance_km - 0.3336).abs() < 0.001);
        assert!(engine.is_inside(&VehicleId::new("bus-1"), "stop-1"));
    }

    #[test]
    fn test_nearest_and_eta() {
        let mut engine = engine();
        // 0.0675 degrees of longitude on the equator is ~7.5 km
        let events = drive(&[0.067_446]);

        let update = engine.on_update(&events[0]).unwrap();
        let (point, distance) = update.nearest.unwrap();
        assert_eq!(point.id, "stop-1");
        assert!((distance - 7.5).abs() < 0.01);

        let eta = update.eta.unwrap();
        assert_eq!(eta.minutes, 15);
        assert_eq!(eta.text, "15 mins");
        assert!(update.alerts.is_empty());
    }

    #[test]
    fn test_stale_event_ignored() {
        let mut engine = engine();
        let events = drive(&[0.02, 0.003]);

        assert!(engine.on_update(&events[1]).is_some());
        assert!(engine.on_update(&events[0]).is_none());
        // Same timestamp again is not stale
        assert!(engine.on_update(&events[1]).is_some());
    }

    #[test]
    fn test_vehicles_are_independent() {
        let mut engine = engine();
        let a = VehicleId::new("a");
        let b = VehicleId::new("b");
        let near = Coordinate::new(0.0, 0.001);

        assert_eq!(engine.observe(&a, near).alerts.len(), 1);
        assert_eq!(engine.observe(&b, near).alerts.len(), 1);
        assert_eq!(engine.observe(&a, near).alerts.len(), 0);
    }

    #[test]
    fn test_forget_rearms_alert() {
        let mut engine = engine();
        let bus = VehicleId::new("bus-1");
        let near = Coordinate::new(0.0, 0.001);

        assert_eq!(engine.observe(&bus, near).alerts.len(), 1);
        engine.forget(&bus);
        assert!(!engine.is_inside(&bus, "stop-1"));
        assert_eq!(engine.observe(&bus, near).alerts.len(), 1);
    }

    #[test]
    fn test_configured_radius() {
        let config = ProximityConfig {
            approach_radius_km: 2.0,
            ..Default::default()
        };
        let mut engine = ProximityEngine::new(vec![stop()], config);
        let update = engine.observe(&VehicleId::new("bus-1"), Coordinate::new(0.0, 0.015));
        assert_eq!(update.alerts.len(), 1);
    }

    #[test]
    fn test_points_sharing_an_id_stay_edge_triggered() {
        let far = PointOfInterest::new("stop-1", "Uptown", Coordinate::new(1.0, 1.0));
        let mut engine = ProximityEngine::new(vec![stop(), far], ProximityConfig::default());
        let bus = VehicleId::new("bus-1");
        let parked = Coordinate::new(0.0, 0.001);

        let alert_counts: Vec<usize> = (0..4)
            .map(|_| engine.observe(&bus, parked).alerts.len())
            .collect();

        assert_eq!(alert_counts, vec![1, 0, 0, 0]);
        assert!(engine.is_inside(&bus, "stop-1"));
    }

    #[test]
    fn test_no_points() {
        let mut engine = ProximityEngine::new(Vec::new(), ProximityConfig::default());
        let update = engine.observe(&VehicleId::new("bus-1"), Coordinate::new(0.0, 0.0));
        assert!(update.nearest.is_none());
        assert!(update.eta.is_none());
        assert!(update.alerts.is_empty());
    }
}
