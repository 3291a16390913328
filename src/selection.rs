//! Selection Store
//!
//! The active vehicle, shared by every screen for the life of the process.
//! Handles are cheap to clone and all clones see the same value.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::debug;

use crate::models::{Vehicle, VehicleId};

#[derive(Clone)]
pub struct SelectionStore {
    tx: Arc<watch::Sender<Option<Vehicle>>>,
}

impl SelectionStore {
    /// Start with nothing selected
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    pub fn get(&self) -> Option<Vehicle> {
        self.tx.borrow().clone()
    }

    pub fn selected_id(&self) -> Option<VehicleId> {
        self.tx.borrow().as_ref().map(|v| v.id.clone())
    }

    /// Replace the selection. Last write wins; no fleet check is made.
    pub fn set(&self, vehicle: Vehicle) {
        debug!("Selected vehicle: {}", vehicle.id);
        self.tx.send_replace(Some(vehicle));
    }

    /// Drop the selection. Nothing in the profile flow calls this.
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    /// Receiver notified on every change
    pub fn subscribe(&self) -> watch::Receiver<Option<Vehicle>> {
        self.tx.subscribe()
    }
}

impl Default for SelectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle(id: &str) -> Vehicle {
        Vehicle {
            id: VehicleId::new(id),
            name: format!("Vehicle {}", id),
            number: "KA01".into(),
            kind: "Sedan".into(),
            model: "X".into(),
        }
    }

    #[test]
    fn clones_share_state() {
        let store = SelectionStore::new();
        let other_screen = store.clone();
        assert_eq!(other_screen.get(), None);

        store.set(vehicle("v1"));
        assert_eq!(other_screen.get(), Some(vehicle("v1")));

        other_screen.set(vehicle("v2"));
        assert_eq!(store.selected_id(), Some(VehicleId::new("v2")));
    }

    #[tokio::test]
    async fn subscribers_see_changes() {
        let store = SelectionStore::new();
        let mut rx = store.subscribe();

        store.set(vehicle("v7"));
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().as_ref().map(|v| v.id.as_str()), Some("v7"));

        store.clear();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}
