//! The set of tracked vehicles and the ingestion entry point.
//!
//! Every vehicle sits behind its own mutex inside a sharded map. Ingesting a
//! sample locks only that vehicle, folds the sample into its trip state and
//! publishes the resulting event before releasing the lock, so observers see
//! one vehicle's updates in the order its state changed. Different vehicles
//! never contend.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::broadcast::{PublishReport, UpdatePublisher};
use crate::error::TrackingError;
use crate::telemetry::TrackingMetrics;
use crate::trip::{Sample, TrackedVehicle, UpdateEvent, VehicleId, VehicleStatus};

/// Result of ingesting one sample.
#[derive(Debug, Clone)]
pub struct Ingested {
    /// The event produced by the accumulator.
    pub event: UpdateEvent,
    /// How the event fared with the vehicle's subscribers.
    pub report: PublishReport,
}

/// In-memory fleet of tracked vehicles.
pub struct Fleet {
    vehicles: DashMap<VehicleId, Arc<Mutex<TrackedVehicle>>>,
    publisher: Arc<dyn UpdatePublisher>,
    metrics: Arc<TrackingMetrics>,
}

impl Fleet {
    pub fn new(publisher: Arc<dyn UpdatePublisher>, metrics: Arc<TrackingMetrics>) -> Self {
        Self {
            vehicles: DashMap::new(),
            publisher,
            metrics,
        }
    }

    // =========================================================================
    // Lifecycle (driven by the CRUD layer)
    // =========================================================================

    /// Start tracking a vehicle.
    pub fn register(&self, vehicle: TrackedVehicle) -> Result<(), TrackingError> {
        match self.vehicles.entry(vehicle.id.clone()) {
            Entry::Occupied(_) => Err(TrackingError::DuplicateVehicle(vehicle.id)),
            Entry::Vacant(slot) => {
                info!(vehicle = %vehicle.id, status = %vehicle.status, "Vehicle registered");
                slot.insert(Arc::new(Mutex::new(vehicle)));
                Ok(())
            }
        }
    }

    /// Stop tracking a vehicle, returning its final state.
    pub fn remove(&self, id: &VehicleId) -> Option<TrackedVehicle> {
        let (_, vehicle) = self.vehicles.remove(id)?;
        info!(vehicle = %id, "Vehicle removed");
        let state = vehicle.lock().clone();
        Some(state)
    }

    /// Change a vehicle's lifecycle status.
    pub fn set_status(&self, id: &VehicleId, status: VehicleStatus) -> Result<(), TrackingError> {
        let vehicle = self.lookup(id)?;
        vehicle.lock().status = status;
        debug!(vehicle = %id, %status, "Vehicle status changed");
        Ok(())
    }

    // =========================================================================
    // Tracking
    // =========================================================================

    /// Fold a sample into its vehicle and publish the resulting event.
    ///
    /// The vehicle stays locked until the event has been handed to every
    /// subscriber queue.
    pub fn ingest(&self, sample: Sample) -> Result<Ingested, TrackingError> {
        let vehicle = match self.lookup(&sample.vehicle_id) {
            Ok(vehicle) => vehicle,
            Err(e) => {
                self.metrics.sample_rejected();
                warn!(vehicle = %sample.vehicle_id, "Sample for unknown vehicle rejected");
                return Err(e);
            }
        };

        let mut guard = vehicle.lock();
        let event = guard.apply_sample(sample.coordinate, sample.timestamp, sample.speed);
        let report = self.publisher.publish(event.clone());
        drop(guard);

        self.metrics.sample_ingested();
        debug!(
            vehicle = %event.vehicle_id,
            coordinate = %event.coordinate,
            speed = event.speed,
            distance_today = event.trip.distance_today,
            delivered = report.delivered,
            "Sample ingested"
        );
        Ok(Ingested { event, report })
    }

    /// Start a new day for one vehicle.
    pub fn reset_daily(&self, id: &VehicleId, at: DateTime<Utc>) -> Result<(), TrackingError> {
        let vehicle = self.lookup(id)?;
        vehicle.lock().reset_daily(at);
        self.metrics.daily_reset(1);
        debug!(vehicle = %id, "Daily distance reset");
        Ok(())
    }

    /// Start a new day for every vehicle. Returns how many were reset.
    pub fn reset_all_daily(&self, at: DateTime<Utc>) -> usize {
        let vehicles: Vec<_> = self
            .vehicles
            .iter()
            .map(|entry| Arc::clone(entry.value()))
            .collect();

        for vehicle in &vehicles {
            vehicle.lock().reset_daily(at);
        }

        self.metrics.daily_reset(vehicles.len());
        info!(vehicles = vehicles.len(), at = %at, "Daily distances reset");
        vehicles.len()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Copy of a vehicle's current state.
    pub fn snapshot(&self, id: &VehicleId) -> Option<TrackedVehicle> {
        let vehicle = self.lookup(id).ok()?;
        let state = vehicle.lock().clone();
        Some(state)
    }

    pub fn contains(&self, id: &VehicleId) -> bool {
        self.vehicles.contains_key(id)
    }

    pub fn ids(&self) -> Vec<VehicleId> {
        self.vehicles.iter().map(|entry| entry.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.vehicles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vehicles.is_empty()
    }

    fn lookup(&self, id: &VehicleId) -> Result<Arc<Mutex<TrackedVehicle>>, TrackingError> {
        self.vehicles
            .get(id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| TrackingError::UnknownVehicle(id.clone()))
    }
}
