//! Charging station operator entity

use std::sync::Arc;

use dashmap::DashMap;

use crate::domain::identifiers::{BrandId, ChargingStationGroupId, ChargingStationOperatorId};

use super::{Brand, ChargingStationGroup};

/// An operator runs charging infrastructure inside a roaming network.
/// Brands and station groups are scoped to their operator.
#[derive(Debug)]
pub struct ChargingStationOperator {
    pub id: ChargingStationOperatorId,
    pub name: String,
    brands: DashMap<BrandId, Arc<Brand>>,
    groups: DashMap<ChargingStationGroupId, Arc<ChargingStationGroup>>,
}

impl ChargingStationOperator {
    pub fn new(id: ChargingStationOperatorId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            brands: DashMap::new(),
            groups: DashMap::new(),
        }
    }

    pub fn brand(&self, id: &BrandId) -> Option<Arc<Brand>> {
        self.brands.get(id).map(|e| Arc::clone(&e))
    }

    pub fn group(&self, id: &ChargingStationGroupId) -> Option<Arc<ChargingStationGroup>> {
        self.groups.get(id).map(|e| Arc::clone(&e))
    }

    pub fn attach_brand(&self, brand: Arc<Brand>) {
        self.brands.insert(brand.id.clone(), brand);
    }

    pub fn attach_group(&self, group: Arc<ChargingStationGroup>) {
        self.groups.insert(group.id.clone(), group);
    }

    pub fn brand_count(&self) -> usize {
        self.brands.len()
    }

    pub fn group_count(&self) -> usize {
        self.groups.len()
    }
}
