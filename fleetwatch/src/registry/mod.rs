//! Interest registry: who is watching which vehicle.
//!
//! Each observer connection is represented by an [`ObserverHandle`], the
//! sending half of a bounded queue of update events. The
//! [`InterestRegistry`] maps vehicle ids to the handles subscribed to them
//! ("rooms") and keeps the reverse index needed to drop every subscription
//! of an observer when its connection closes.
//!
//! # Example
//!
//! ```
//! use fleetwatch::registry::{InterestRegistry, ObserverHandle};
//! use fleetwatch::trip::VehicleId;
//!
//! let registry = InterestRegistry::new();
//! let (observer, _events) = ObserverHandle::channel(16);
//!
//! registry.join(VehicleId::new("bus-1"), &observer);
//! registry.join(VehicleId::new("bus-1"), &observer); // no-op
//! assert_eq!(registry.subscribers(&VehicleId::new("bus-1")).len(), 1);
//!
//! registry.leave_all(observer.id());
//! assert_eq!(registry.room_count(), 0);
//! ```

mod interest;
mod observer;

pub use interest::InterestRegistry;
pub use observer::{Delivery, ObserverHandle, ObserverId, DEFAULT_OBSERVER_QUEUE_CAPACITY};
