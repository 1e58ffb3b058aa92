//! Roaming network — the root entity of the inventory hierarchy

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use crate::domain::identifiers::{
    ChargingPoolId, ChargingReservationId, ChargingSessionId, ChargingStationOperatorId,
    EMobilityProviderId, RoamingNetworkId,
};

use super::{
    ChargingPool, ChargingReservation, ChargingSession, ChargingStationOperator,
    EMobilityProvider,
};

/// A roaming network scopes every other entity: operators, pools,
/// sessions, reservations and providers are looked up within exactly one
/// network.
#[derive(Debug)]
pub struct RoamingNetwork {
    pub id: RoamingNetworkId,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    operators: DashMap<ChargingStationOperatorId, Arc<ChargingStationOperator>>,
    pools: DashMap<ChargingPoolId, Arc<ChargingPool>>,
    sessions: DashMap<ChargingSessionId, Arc<ChargingSession>>,
    reservations: DashMap<ChargingReservationId, Arc<ChargingReservation>>,
    providers: DashMap<EMobilityProviderId, Arc<EMobilityProvider>>,
}

impl RoamingNetwork {
    pub fn new(id: RoamingNetworkId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: None,
            created_at: Utc::now(),
            operators: DashMap::new(),
            pools: DashMap::new(),
            sessions: DashMap::new(),
            reservations: DashMap::new(),
            providers: DashMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    // -- scoped lookups ---------------------------------------------------

    pub fn operator(&self, id: &ChargingStationOperatorId) -> Option<Arc<ChargingStationOperator>> {
        self.operators.get(id).map(|e| Arc::clone(&e))
    }

    pub fn charging_pool(&self, id: &ChargingPoolId) -> Option<Arc<ChargingPool>> {
        self.pools.get(id).map(|e| Arc::clone(&e))
    }

    pub fn session(&self, id: &ChargingSessionId) -> Option<Arc<ChargingSession>> {
        self.sessions.get(id).map(|e| Arc::clone(&e))
    }

    pub fn reservation(&self, id: &ChargingReservationId) -> Option<Arc<ChargingReservation>> {
        self.reservations.get(id).map(|e| Arc::clone(&e))
    }

    pub fn provider(&self, id: &EMobilityProviderId) -> Option<Arc<EMobilityProvider>> {
        self.providers.get(id).map(|e| Arc::clone(&e))
    }

    // -- writes (seed time and domain operations) -------------------------

    pub fn attach_operator(&self, operator: Arc<ChargingStationOperator>) {
        self.operators.insert(operator.id.clone(), operator);
    }

    pub fn attach_pool(&self, pool: Arc<ChargingPool>) {
        self.pools.insert(pool.id.clone(), pool);
    }

    pub fn attach_provider(&self, provider: Arc<EMobilityProvider>) {
        self.providers.insert(provider.id.clone(), provider);
    }

    pub fn insert_session(&self, session: Arc<ChargingSession>) {
        self.sessions.insert(session.id.clone(), session);
    }

    pub fn remove_session(&self, id: &ChargingSessionId) -> Option<Arc<ChargingSession>> {
        self.sessions.remove(id).map(|(_, s)| s)
    }

    pub fn insert_reservation(&self, reservation: Arc<ChargingReservation>) {
        self.reservations
            .insert(reservation.id.clone(), reservation);
    }

    // -- counts for DTOs --------------------------------------------------

    pub fn operator_count(&self) -> usize {
        self.operators.len()
    }

    pub fn pool_count(&self) -> usize {
        self.pools.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Snapshot of all pools, for network-wide EVSE status listings.
    pub fn pools_snapshot(&self) -> Vec<Arc<ChargingPool>> {
        self.pools.iter().map(|e| Arc::clone(&e)).collect()
    }
}
