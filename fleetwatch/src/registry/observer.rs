//! Observer handles - the outbound side of one observer connection.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::trip::UpdateEvent;

/// Default capacity of each observer's outbound queue.
pub const DEFAULT_OBSERVER_QUEUE_CAPACITY: usize = 64;

static NEXT_OBSERVER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one observer connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObserverId(u64);

impl ObserverId {
    /// Allocate a process-unique observer id.
    pub fn next() -> Self {
        Self(NEXT_OBSERVER_ID.fetch_add(1, Ordering::Relaxed))
    }

}

impl fmt::Display for ObserverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "observer-{}", self.0)
    }
}

/// Outcome of handing one event to one observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// Enqueued on the observer's outbound queue.
    Delivered,
    /// Queue full; the event was dropped for this observer.
    Backpressured,
    /// The observer's receiver is gone.
    Closed,
}

/// Sending half of an observer connection.
///
/// Cloning is cheap; all clones feed the same bounded queue.
#[derive(Debug, Clone)]
pub struct ObserverHandle {
    id: ObserverId,
    tx: mpsc::Sender<Arc<UpdateEvent>>,
}

impl ObserverHandle {
    /// Create a handle with a fresh id and its bounded receiving queue.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<Arc<UpdateEvent>>) {
        Self::with_id(ObserverId::next(), capacity)
    }

    /// Create a handle with an explicit id.
    pub fn with_id(id: ObserverId, capacity: usize) -> (Self, mpsc::Receiver<Arc<UpdateEvent>>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { id, tx }, rx)
    }

    pub fn id(&self) -> ObserverId {
        self.id
    }

    /// Try to enqueue an event without waiting.
    pub fn deliver(&self, event: Arc<UpdateEvent>) -> Delivery {
        match self.tx.try_send(event) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(_)) => Delivery::Backpressured,
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }

    /// Returns true once the receiving side has been dropped.
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
