//! Charging pool entity

use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::identifiers::{
    ChargingPoolId, ChargingStationId, ChargingStationOperatorId,
};

use super::ChargingStation;

/// A charging pool is a geographic site (parking lot, depot) holding one
/// or more charging stations.
#[derive(Debug)]
pub struct ChargingPool {
    pub id: ChargingPoolId,
    pub name: String,
    pub operator_id: ChargingStationOperatorId,
    pub address: Option<String>,
    stations: DashMap<ChargingStationId, Arc<ChargingStation>>,
}

impl ChargingPool {
    pub fn new(
        id: ChargingPoolId,
        operator_id: ChargingStationOperatorId,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            operator_id,
            address: None,
            stations: DashMap::new(),
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn station(&self, id: &ChargingStationId) -> Option<Arc<ChargingStation>> {
        self.stations.get(id).map(|e| Arc::clone(&e))
    }

    pub fn attach_station(&self, station: Arc<ChargingStation>) {
        self.stations.insert(station.id.clone(), station);
    }

    pub fn station_count(&self) -> usize {
        self.stations.len()
    }

    pub fn stations_snapshot(&self) -> Vec<Arc<ChargingStation>> {
        self.stations.iter().map(|e| Arc::clone(&e)).collect()
    }
}
