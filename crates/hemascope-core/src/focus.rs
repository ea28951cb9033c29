//! Single-writer channel carrying the shared focus point.
//!
//! The pointer controller owns the only [`FocusPublisher`]; renderers hold
//! [`FocusSubscriber`]s and compare revisions to decide whether to recompute.

use std::sync::{Arc, PoisonError, RwLock};

use crate::geometry::FocusPoint;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FocusSnapshot {
    pub point: FocusPoint,
    /// Incremented on every publish that changes the point. Starts at 0.
    pub revision: u64,
}

#[derive(Debug)]
struct Slot {
    snapshot: RwLock<FocusSnapshot>,
}

/// Write end of the focus channel. Not `Clone`.
#[derive(Debug)]
pub struct FocusPublisher {
    slot: Arc<Slot>,
}

/// Read end of the focus channel.
#[derive(Clone, Debug)]
pub struct FocusSubscriber {
    slot: Arc<Slot>,
}

/// Create a focus channel seeded with `initial`.
pub fn focus_channel(initial: FocusPoint) -> (FocusPublisher, FocusSubscriber) {
    let slot = Arc::new(Slot {
        snapshot: RwLock::new(FocusSnapshot {
            point: initial,
            revision: 0,
        }),
    });
    (
        FocusPublisher { slot: slot.clone() },
        FocusSubscriber { slot },
    )
}

impl FocusPublisher {
    /// Publish a new focus point. Returns the new revision, or `None` if the
    /// point is unchanged.
    pub fn publish(&self, point: FocusPoint) -> Option<u64> {
        let mut snap = self
            .slot
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if snap.point == point {
            return None;
        }
        snap.point = point;
        snap.revision += 1;
        Some(snap.revision)
    }

    pub fn subscribe(&self) -> FocusSubscriber {
        FocusSubscriber {
            slot: self.slot.clone(),
        }
    }

    pub fn current(&self) -> FocusPoint {
        self.subscribe().latest().point
    }
}

impl FocusSubscriber {
    pub fn latest(&self) -> FocusSnapshot {
        *self
            .slot
            .snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// The latest snapshot if its revision differs from `seen`.
    pub fn changed_since(&self, seen: u64) -> Option<FocusSnapshot> {
        let snap = self.latest();
        (snap.revision != seen).then_some(snap)
    }
}
