use std::sync::RwLock;

use crate::models::Snapshot;

/// Owns the in-memory data set. Refreshes replace the snapshot wholesale;
/// readers work on a clone, so a view never sees a half-applied load.
#[derive(Default)]
pub struct PortalState {
    snapshot: RwLock<Snapshot>,
}

impl PortalState {
    pub fn new(snapshot: Snapshot) -> Self {
        Self {
            snapshot: RwLock::new(snapshot),
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.snapshot.read().unwrap().clone()
    }

    pub fn replace(&self, snapshot: Snapshot) {
        *self.snapshot.write().unwrap() = snapshot;
    }
}
