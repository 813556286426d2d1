//! Interest registry - which observers watch which vehicle.
//!
//! Two sharded maps are kept in step:
//!
//! - `rooms`: vehicle → observers currently subscribed (read on every publish)
//! - `memberships`: observer → vehicles it joined (read on disconnect)
//!
//! Lock order is always `memberships` before `rooms`, and no guard on one
//! map is held while taking a second entry of the same map.

use std::collections::{HashMap, HashSet};

use dashmap::DashMap;
use tracing::debug;

use super::observer::{ObserverHandle, ObserverId};
use crate::trip::VehicleId;

/// Concurrent mapping from vehicle id to its subscribed observers.
///
/// All operations are idempotent.
#[derive(Debug, Default)]
pub struct InterestRegistry {
    rooms: DashMap<VehicleId, HashMap<ObserverId, ObserverHandle>>,
    memberships: DashMap<ObserverId, HashSet<VehicleId>>,
}

impl InterestRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe `observer` to `vehicle`.
    ///
    /// Returns true if this created a new subscription, false if the observer
    /// was already in the room.
    pub fn join(&self, vehicle: VehicleId, observer: &ObserverHandle) -> bool {
        let id = observer.id();
        let mut joined = self.memberships.entry(id).or_default();
        let newly_joined = joined.insert(vehicle.clone());

        self.rooms
            .entry(vehicle.clone())
            .or_default()
            .entry(id)
            .or_insert_with(|| observer.clone());

        if newly_joined {
            debug!(vehicle = %vehicle, observer = %id, "Observer joined room");
        }
        newly_joined
    }

    /// Unsubscribe `observer` from `vehicle`.
    ///
    /// Leaving a room the observer never joined is a no-op returning false.
    pub fn leave(&self, vehicle: &VehicleId, observer: ObserverId) -> bool {
        let Some(mut joined) = self.memberships.get_mut(&observer) else {
            return false;
        };
        if !joined.remove(vehicle) {
            return false;
        }
        let now_empty = joined.is_empty();

        self.remove_from_room(vehicle, observer);
        drop(joined);

        if now_empty {
            self.memberships.remove_if(&observer, |_, rooms| rooms.is_empty());
        }
        debug!(vehicle = %vehicle, observer = %observer, "Observer left room");
        true
    }

    /// Remove `observer` from every room. Call once per disconnect.
    ///
    /// Returns the number of rooms the observer was removed from.
    pub fn leave_all(&self, observer: ObserverId) -> usize {
        let Some((_, vehicles)) = self.memberships.remove(&observer) else {
            return 0;
        };

        for vehicle in &vehicles {
            self.remove_from_room(vehicle, observer);
        }

        debug!(observer = %observer, rooms = vehicles.len(), "Observer left all rooms");
        vehicles.len()
    }

    /// Snapshot of the observers currently subscribed to `vehicle`.
    pub fn subscribers(&self, vehicle: &VehicleId) -> Vec<ObserverHandle> {
        self.rooms
            .get(vehicle)
            .map(|room| room.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Ids of the observers currently subscribed to `vehicle`.
    pub fn subscriber_ids(&self, vehicle: &VehicleId) -> HashSet<ObserverId> {
        self.rooms
            .get(vehicle)
            .map(|room| room.keys().copied().collect())
            .unwrap_or_default()
    }

    /// Vehicles `observer` is currently subscribed to.
    pub fn rooms_of(&self, observer: ObserverId) -> HashSet<VehicleId> {
        self.memberships
            .get(&observer)
            .map(|joined| joined.clone())
            .unwrap_or_default()
    }

    /// Returns true if `observer` is in `vehicle`'s room.
    pub fn is_subscribed(&self, vehicle: &VehicleId, observer: ObserverId) -> bool {
        self.rooms
            .get(vehicle)
            .is_some_and(|room| room.contains_key(&observer))
    }

    /// Number of vehicles with at least one subscriber.
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Number of observers holding at least one subscription.
    pub fn observer_count(&self) -> usize {
        self.memberships.len()
    }

    fn remove_from_room(&self, vehicle: &VehicleId, observer: ObserverId) {
        let now_empty = match self.rooms.get_mut(vehicle) {
            Some(mut room) => {
                room.remove(&observer);
                room.is_empty()
            }
            None => false,
        };
        if now_empty {
            // Re-checked under the shard lock in case someone joined meanwhile
            self.rooms.remove_if(vehicle, |_, room| room.is_empty());
        }
    }
}
