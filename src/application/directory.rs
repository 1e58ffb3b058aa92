//! Entity directory — the authoritative, read-mostly inventory graph
//!
//! Exposes one scoped lookup per entity kind: find a child of type `T`
//! with a typed ID within a resolved parent. Lookups are exact-ID only.
//! Writes happen at seed time (JSON inventory document) and through the
//! few domain operations that create sessions and reservations; concurrent
//! readers are never blocked.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Deserialize;
use tracing::info;

use crate::domain::identifiers::{
    BrandId, ChargingPoolId, ChargingReservationId, ChargingSessionId, ChargingStationGroupId,
    ChargingStationId, ChargingStationOperatorId, EMobilityProviderId, EvseId, RoamingNetworkId,
};
use crate::domain::models::{
    Brand, ChargingPool, ChargingReservation, ChargingSession, ChargingStation,
    ChargingStationGroup, ChargingStationOperator, EMobilityProvider, Evse, EvseStatus,
    RoamingNetwork,
};
use crate::domain::{DomainError, DomainResult};

/// Shared, reference-counted entity directory
pub type SharedEntityDirectory = Arc<EntityDirectory>;

/// Root scope of the inventory graph plus scoped finders for every child
/// kind. The lookup counter feeds metrics and the fail-fast tests.
pub struct EntityDirectory {
    networks: DashMap<RoamingNetworkId, Arc<RoamingNetwork>>,
    lookups: AtomicU64,
}

impl EntityDirectory {
    pub fn new() -> Self {
        Self {
            networks: DashMap::new(),
            lookups: AtomicU64::new(0),
        }
    }

    pub fn shared() -> SharedEntityDirectory {
        Arc::new(Self::new())
    }

    fn count_lookup(&self) {
        self.lookups.fetch_add(1, Ordering::Relaxed);
    }

    /// Total number of entity lookups performed since startup.
    pub fn lookup_count(&self) -> u64 {
        self.lookups.load(Ordering::Relaxed)
    }

    // -- scoped finders (exact ID equality, one per entity kind) ----------

    pub fn roaming_network(&self, id: &RoamingNetworkId) -> Option<Arc<RoamingNetwork>> {
        self.count_lookup();
        self.networks.get(id).map(|e| Arc::clone(&e))
    }

    pub fn operator(
        &self,
        network: &RoamingNetwork,
        id: &ChargingStationOperatorId,
    ) -> Option<Arc<ChargingStationOperator>> {
        self.count_lookup();
        network.operator(id)
    }

    pub fn brand(&self, operator: &ChargingStationOperator, id: &BrandId) -> Option<Arc<Brand>> {
        self.count_lookup();
        operator.brand(id)
    }

    pub fn station_group(
        &self,
        operator: &ChargingStationOperator,
        id: &ChargingStationGroupId,
    ) -> Option<Arc<ChargingStationGroup>> {
        self.count_lookup();
        operator.group(id)
    }

    pub fn charging_pool(
        &self,
        network: &RoamingNetwork,
        id: &ChargingPoolId,
    ) -> Option<Arc<ChargingPool>> {
        self.count_lookup();
        network.charging_pool(id)
    }

    pub fn charging_station(
        &self,
        pool: &ChargingPool,
        id: &ChargingStationId,
    ) -> Option<Arc<ChargingStation>> {
        self.count_lookup();
        pool.station(id)
    }

    pub fn evse(&self, station: &ChargingStation, id: &EvseId) -> Option<Arc<Evse>> {
        self.count_lookup();
        station.evse(id)
    }

    pub fn session(
        &self,
        network: &RoamingNetwork,
        id: &ChargingSessionId,
    ) -> Option<Arc<ChargingSession>> {
        self.count_lookup();
        network.session(id)
    }

    pub fn reservation(
        &self,
        network: &RoamingNetwork,
        id: &ChargingReservationId,
    ) -> Option<Arc<ChargingReservation>> {
        self.count_lookup();
        network.reservation(id)
    }

    pub fn provider(
        &self,
        network: &RoamingNetwork,
        id: &EMobilityProviderId,
    ) -> Option<Arc<EMobilityProvider>> {
        self.count_lookup();
        network.provider(id)
    }

    // -- writes -----------------------------------------------------------

    pub fn add_network(&self, network: Arc<RoamingNetwork>) {
        self.networks.insert(network.id.clone(), network);
    }

    pub fn network_ids(&self) -> Vec<RoamingNetworkId> {
        self.networks.iter().map(|e| e.key().clone()).collect()
    }

    pub fn network_count(&self) -> usize {
        self.networks.len()
    }

    /// Populate the graph from a JSON inventory document.
    pub async fn load_seed(&self, path: &Path) -> DomainResult<()> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| DomainError::Seed(format!("cannot read {}: {}", path.display(), e)))?;
        let doc: SeedDocument = serde_json::from_str(&raw)
            .map_err(|e| DomainError::Seed(format!("cannot parse {}: {}", path.display(), e)))?;
        self.apply_seed(doc)?;
        info!(
            networks = self.network_count(),
            path = %path.display(),
            "Inventory seed loaded"
        );
        Ok(())
    }

    fn apply_seed(&self, doc: SeedDocument) -> DomainResult<()> {
        for net in doc.networks {
            let network = Arc::new(match net.description {
                Some(d) => RoamingNetwork::new(net.id, net.name).with_description(d),
                None => RoamingNetwork::new(net.id, net.name),
            });

            for op in net.operators {
                let operator = Arc::new(ChargingStationOperator::new(op.id, op.name));
                for brand in op.brands {
                    operator.attach_brand(Arc::new(Brand::new(brand.id, brand.name)));
                }
                for group in op.groups {
                    operator.attach_group(Arc::new(
                        ChargingStationGroup::new(group.id, group.name)
                            .with_members(group.members),
                    ));
                }
                network.attach_operator(operator);
            }

            for pool_seed in net.pools {
                let pool = {
                    let p = ChargingPool::new(pool_seed.id, pool_seed.operator, pool_seed.name);
                    Arc::new(match pool_seed.address {
                        Some(a) => p.with_address(a),
                        None => p,
                    })
                };
                for station_seed in pool_seed.stations {
                    let station =
                        Arc::new(ChargingStation::new(station_seed.id, station_seed.name));
                    for evse_seed in station_seed.evses {
                        station.attach_evse(Arc::new(
                            Evse::new(evse_seed.id, evse_seed.max_power_kw)
                                .with_status(evse_seed.status),
                        ));
                    }
                    pool.attach_station(station);
                }
                network.attach_pool(pool);
            }

            for provider in net.providers {
                network.attach_provider(Arc::new(EMobilityProvider::new(
                    provider.id,
                    provider.name,
                )));
            }

            self.add_network(network);
        }
        Ok(())
    }
}

impl Default for EntityDirectory {
    fn default() -> Self {
        Self::new()
    }
}

// -- seed document shape --------------------------------------------------

#[derive(Debug, Deserialize)]
struct SeedDocument {
    networks: Vec<NetworkSeed>,
}

#[derive(Debug, Deserialize)]
struct NetworkSeed {
    id: RoamingNetworkId,
    name: String,
    description: Option<String>,
    #[serde(default)]
    operators: Vec<OperatorSeed>,
    #[serde(default)]
    pools: Vec<PoolSeed>,
    #[serde(default)]
    providers: Vec<ProviderSeed>,
}

#[derive(Debug, Deserialize)]
struct ProviderSeed {
    id: EMobilityProviderId,
    name: String,
}

#[derive(Debug, Deserialize)]
struct OperatorSeed {
    id: ChargingStationOperatorId,
    name: String,
    #[serde(default)]
    brands: Vec<BrandSeed>,
    #[serde(default)]
    groups: Vec<GroupSeed>,
}

#[derive(Debug, Deserialize)]
struct BrandSeed {
    id: BrandId,
    name: String,
}

#[derive(Debug, Deserialize)]
struct GroupSeed {
    id: ChargingStationGroupId,
    name: String,
    #[serde(default)]
    members: Vec<ChargingStationId>,
}

#[derive(Debug, Deserialize)]
struct PoolSeed {
    id: ChargingPoolId,
    operator: ChargingStationOperatorId,
    name: String,
    address: Option<String>,
    #[serde(default)]
    stations: Vec<StationSeed>,
}

#[derive(Debug, Deserialize)]
struct StationSeed {
    id: ChargingStationId,
    name: String,
    #[serde(default)]
    evses: Vec<EvseSeed>,
}

#[derive(Debug, Deserialize)]
struct EvseSeed {
    id: EvseId,
    #[serde(default = "default_max_power")]
    max_power_kw: f64,
    #[serde(default = "default_seed_status")]
    status: EvseStatus,
}

fn default_max_power() -> f64 {
    22.0
}

fn default_seed_status() -> EvseStatus {
    EvseStatus::Available
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_document_builds_full_hierarchy() {
        let doc: SeedDocument = serde_json::from_str(
            r#"{
                "networks": [{
                    "id": "Prod",
                    "name": "Production",
                    "operators": [{
                        "id": "DE*GEF",
                        "name": "GraphEnergy",
                        "brands": [{"id": "DE*GEF*B1", "name": "VoltBrand"}],
                        "groups": [{"id": "DE*GEF*G1", "name": "Downtown", "members": []}]
                    }],
                    "pools": [{
                        "id": "DE*GEF*P555",
                        "operator": "DE*GEF",
                        "name": "Central Garage",
                        "stations": [{
                            "id": "DE*GEF*S555*1",
                            "name": "Row A",
                            "evses": [{"id": "DE*GEF*E555*1*A", "max_power_kw": 50.0, "status": "Available"}]
                        }]
                    }],
                    "providers": [{"id": "DE-GDF", "name": "GridDrive"}]
                }]
            }"#,
        )
        .expect("valid seed");

        let directory = EntityDirectory::new();
        directory.apply_seed(doc).expect("seed applies");

        let network = directory
            .roaming_network(&RoamingNetworkId::parse("Prod").expect("id"))
            .expect("network present");
        let operator = directory
            .operator(
                &network,
                &ChargingStationOperatorId::parse("DE*GEF").expect("id"),
            )
            .expect("operator present");
        assert!(directory
            .brand(&operator, &BrandId::parse("DE*GEF*B1").expect("id"))
            .is_some());

        let pool = directory
            .charging_pool(&network, &ChargingPoolId::parse("DE*GEF*P555").expect("id"))
            .expect("pool present");
        let station = directory
            .charging_station(&pool, &ChargingStationId::parse("DE*GEF*S555*1").expect("id"))
            .expect("station present");
        let evse = directory
            .evse(&station, &EvseId::parse("DE*GEF*E555*1*A").expect("id"))
            .expect("evse present");
        assert_eq!(evse.status(), EvseStatus::Available);
        assert_eq!(evse.max_power_kw, 50.0);
    }

    #[test]
    fn lookup_counter_records_every_find() {
        let directory = EntityDirectory::new();
        let before = directory.lookup_count();

        let missing = RoamingNetworkId::parse("Nope").expect("id");
        assert!(directory.roaming_network(&missing).is_none());
        assert_eq!(directory.lookup_count(), before + 1);
    }
}
