//! Charging station group entity

use crate::domain::identifiers::{ChargingStationGroupId, ChargingStationId};

/// Named group of stations, used by operators for tariffing and access
/// control. Membership is fixed at seed time.
#[derive(Debug)]
pub struct ChargingStationGroup {
    pub id: ChargingStationGroupId,
    pub name: String,
    pub members: Vec<ChargingStationId>,
}

impl ChargingStationGroup {
    pub fn new(id: ChargingStationGroupId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            members: Vec::new(),
        }
    }

    pub fn with_members(mut self, members: Vec<ChargingStationId>) -> Self {
        self.members = members;
        self
    }
}
