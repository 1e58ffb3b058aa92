//! Charging station entity

use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::identifiers::{ChargingStationId, EvseId};

use super::Evse;

/// A physical charging station with one or more EVSEs.
#[derive(Debug)]
pub struct ChargingStation {
    pub id: ChargingStationId,
    pub name: String,
    evses: DashMap<EvseId, Arc<Evse>>,
}

impl ChargingStation {
    pub fn new(id: ChargingStationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            evses: DashMap::new(),
        }
    }

    pub fn evse(&self, id: &EvseId) -> Option<Arc<Evse>> {
        self.evses.get(id).map(|e| Arc::clone(&e))
    }

    pub fn attach_evse(&self, evse: Arc<Evse>) {
        self.evses.insert(evse.id.clone(), evse);
    }

    pub fn evse_count(&self) -> usize {
        self.evses.len()
    }

    pub fn evses_snapshot(&self) -> Vec<Arc<Evse>> {
        self.evses.iter().map(|e| Arc::clone(&e)).collect()
    }
}
