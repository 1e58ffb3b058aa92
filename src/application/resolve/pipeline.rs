//! Pipelines and the resolution algorithm

use std::sync::Arc;

use tracing::error;

use crate::application::directory::EntityDirectory;
use crate::domain::models::{
    Brand, ChargingPool, ChargingReservation, ChargingSession, ChargingStation,
    ChargingStationGroup, ChargingStationOperator, EMobilityProvider, Evse, RoamingNetwork,
};

use super::failure::ResolutionFailure;
use super::step::{ResolvedEntity, Step, StepError};

// Every concrete traversal of the hierarchy, expressed as data.
pub const RN: &[Step] = &[Step::RoamingNetwork];
pub const RN_OPERATOR: &[Step] = &[Step::RoamingNetwork, Step::Operator];
pub const RN_OPERATOR_BRAND: &[Step] = &[Step::RoamingNetwork, Step::Operator, Step::Brand];
pub const RN_OPERATOR_GROUP: &[Step] = &[Step::RoamingNetwork, Step::Operator, Step::StationGroup];
pub const RN_POOL: &[Step] = &[Step::RoamingNetwork, Step::ChargingPool];
pub const RN_POOL_STATION: &[Step] =
    &[Step::RoamingNetwork, Step::ChargingPool, Step::ChargingStation];
pub const RN_POOL_STATION_EVSE: &[Step] = &[
    Step::RoamingNetwork,
    Step::ChargingPool,
    Step::ChargingStation,
    Step::Evse,
];
pub const RN_SESSION: &[Step] = &[Step::RoamingNetwork, Step::Session];
pub const RN_RESERVATION: &[Step] = &[Step::RoamingNetwork, Step::Reservation];
pub const RN_PROVIDER: &[Step] = &[Step::RoamingNetwork, Step::Provider];

/// The full ordered chain of entities resolved by a pipeline, one per
/// step.
#[derive(Debug)]
pub struct Chain(Vec<ResolvedEntity>);

impl Chain {
    pub fn entities(&self) -> &[ResolvedEntity] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn network(&self) -> Option<&Arc<RoamingNetwork>> {
        self.0.iter().find_map(|e| match e {
            ResolvedEntity::RoamingNetwork(n) => Some(n),
            _ => None,
        })
    }

    pub fn operator(&self) -> Option<&Arc<ChargingStationOperator>> {
        self.0.iter().find_map(|e| match e {
            ResolvedEntity::Operator(o) => Some(o),
            _ => None,
        })
    }

    pub fn brand(&self) -> Option<&Arc<Brand>> {
        self.0.iter().find_map(|e| match e {
            ResolvedEntity::Brand(b) => Some(b),
            _ => None,
        })
    }

    pub fn station_group(&self) -> Option<&Arc<ChargingStationGroup>> {
        self.0.iter().find_map(|e| match e {
            ResolvedEntity::StationGroup(g) => Some(g),
            _ => None,
        })
    }

    pub fn pool(&self) -> Option<&Arc<ChargingPool>> {
        self.0.iter().find_map(|e| match e {
            ResolvedEntity::ChargingPool(p) => Some(p),
            _ => None,
        })
    }

    pub fn station(&self) -> Option<&Arc<ChargingStation>> {
        self.0.iter().find_map(|e| match e {
            ResolvedEntity::ChargingStation(s) => Some(s),
            _ => None,
        })
    }

    pub fn evse(&self) -> Option<&Arc<Evse>> {
        self.0.iter().find_map(|e| match e {
            ResolvedEntity::Evse(v) => Some(v),
            _ => None,
        })
    }

    pub fn session(&self) -> Option<&Arc<ChargingSession>> {
        self.0.iter().find_map(|e| match e {
            ResolvedEntity::Session(s) => Some(s),
            _ => None,
        })
    }

    pub fn reservation(&self) -> Option<&Arc<ChargingReservation>> {
        self.0.iter().find_map(|e| match e {
            ResolvedEntity::Reservation(r) => Some(r),
            _ => None,
        })
    }

    pub fn provider(&self) -> Option<&Arc<EMobilityProvider>> {
        self.0.iter().find_map(|e| match e {
            ResolvedEntity::Provider(p) => Some(p),
            _ => None,
        })
    }
}

/// Resolve `segments` against `pipeline`, left to right, fail-fast.
///
/// The segment-count check is pipeline-wide and runs before any parse or
/// lookup; once enough segments exist, each stage is evaluated
/// independently and in order, and the first failing stage ends the
/// resolution — later stages are never attempted.
pub fn resolve(
    directory: &EntityDirectory,
    pipeline: &[Step],
    segments: &[&str],
) -> Result<Chain, ResolutionFailure> {
    if segments.len() < pipeline.len() {
        let first = pipeline
            .first()
            .map(Step::kind)
            .unwrap_or(super::EntityKind::RoamingNetwork);
        return Err(ResolutionFailure::too_few_segments(
            first,
            pipeline.len(),
            segments.len(),
        ));
    }

    let mut entities: Vec<ResolvedEntity> = Vec::with_capacity(pipeline.len());
    for (stage, step) in pipeline.iter().enumerate() {
        let segment = segments[stage];
        match step.resolve(directory, entities.last(), segment) {
            Ok(entity) => entities.push(entity),
            Err(StepError::Invalid(err)) => {
                return Err(ResolutionFailure::invalid_identifier(
                    stage,
                    step.kind(),
                    &err,
                ));
            }
            Err(StepError::NotFound) => {
                return Err(ResolutionFailure::entity_not_found(
                    stage,
                    step.kind(),
                    segment,
                ));
            }
            Err(StepError::ParentMismatch) => {
                error!(
                    stage,
                    kind = step.kind().name(),
                    "Pipeline step received a parent of the wrong kind"
                );
                return Err(ResolutionFailure::entity_not_found(
                    stage,
                    step.kind(),
                    segment,
                ));
            }
        }
    }

    Ok(Chain(entities))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::resolve::FailureKind;
    use crate::domain::identifiers::{
        BrandId, ChargingPoolId, ChargingStationId, ChargingStationOperatorId,
        EMobilityProviderId, EvseId, RoamingNetworkId,
    };

    /// Prod network with one operator (brand + group), one pool → station
    /// → EVSE chain, one session and one provider.
    fn fixture() -> EntityDirectory {
        let directory = EntityDirectory::new();

        let network = Arc::new(RoamingNetwork::new(
            RoamingNetworkId::parse("DE*GEF").expect("id"),
            "Production",
        ));

        let operator = Arc::new(ChargingStationOperator::new(
            ChargingStationOperatorId::parse("DE*GEF*O1").expect("id"),
            "GraphEnergy",
        ));
        operator.attach_brand(Arc::new(Brand::new(
            BrandId::parse("DE*GEF*B1").expect("id"),
            "VoltBrand",
        )));
        operator.attach_group(Arc::new(ChargingStationGroup::new(
            crate::domain::identifiers::ChargingStationGroupId::parse("DE*GEF*G1").expect("id"),
            "Downtown",
        )));
        network.attach_operator(operator);

        let pool = Arc::new(ChargingPool::new(
            ChargingPoolId::parse("DE*GEF*P555").expect("id"),
            ChargingStationOperatorId::parse("DE*GEF*O1").expect("id"),
            "Central Garage",
        ));
        let station = Arc::new(ChargingStation::new(
            ChargingStationId::parse("DE*GEF*S555*1").expect("id"),
            "Row A",
        ));
        station.attach_evse(Arc::new(Evse::new(
            EvseId::parse("DE*GEF*E555*1*A").expect("id"),
            50.0,
        )));
        pool.attach_station(station);
        network.attach_pool(pool);

        let session = Arc::new(ChargingSession::new(
            EvseId::parse("DE*GEF*E555*1*A").expect("id"),
        ));
        network.insert_session(session);

        network.attach_provider(Arc::new(EMobilityProvider::new(
            EMobilityProviderId::parse("DE-GDF").expect("id"),
            "GridDrive",
        )));

        directory.add_network(network);
        directory
    }

    #[test]
    fn scenario_a_empty_segments_is_too_few() {
        let directory = fixture();
        let err = resolve(&directory, RN, &[]).unwrap_err();
        assert_eq!(err.kind, FailureKind::TooFewSegments);
        assert_eq!(err.stage, 0);
    }

    #[test]
    fn scenario_b_malformed_network_id() {
        let directory = fixture();
        let err = resolve(&directory, RN, &["!!invalid!!"]).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidIdentifier);
        assert_eq!(err.stage, 0);
        assert!(err.reason.contains("RoamingNetwork"), "reason: {}", err.reason);
    }

    #[test]
    fn scenario_c_unknown_pool_at_stage_one() {
        let directory = fixture();
        let err = resolve(&directory, RN_POOL, &["DE*GEF", "UNKNOWNPOOL"]).unwrap_err();
        assert_eq!(err.kind, FailureKind::EntityNotFound);
        assert_eq!(err.stage, 1);
        assert_eq!(err.entity_kind.name(), "ChargingPool");
    }

    #[test]
    fn scenario_d_full_four_step_chain() {
        let directory = fixture();
        let chain = resolve(
            &directory,
            RN_POOL_STATION_EVSE,
            &["DE*GEF", "DE*GEF*P555", "DE*GEF*S555*1", "DE*GEF*E555*1*A"],
        )
        .expect("all four stages resolve");
        assert_eq!(chain.len(), 4);
        assert!(chain.network().is_some());
        assert!(chain.pool().is_some());
        assert!(chain.station().is_some());
        assert!(chain.evse().is_some());
    }

    #[test]
    fn too_few_segments_wins_regardless_of_content() {
        let directory = fixture();
        // even nonsense segments: the count check runs first
        for segments in [&[][..], &["!!!"][..], &["DE*GEF", "!!!"][..]] {
            if segments.len() >= RN_POOL_STATION_EVSE.len() {
                continue;
            }
            let err = resolve(&directory, RN_POOL_STATION_EVSE, segments).unwrap_err();
            assert_eq!(err.kind, FailureKind::TooFewSegments);
            assert_eq!(err.stage, 0);
        }
    }

    #[test]
    fn count_check_triggers_no_lookup() {
        let directory = fixture();
        let before = directory.lookup_count();
        let _ = resolve(&directory, RN_POOL, &["DE*GEF"]).unwrap_err();
        assert_eq!(directory.lookup_count(), before, "no lookup may run");
    }

    #[test]
    fn parse_failure_stops_before_its_own_lookup() {
        let directory = fixture();
        let before = directory.lookup_count();
        let err = resolve(&directory, RN_POOL, &["DE*GEF", "!!pool!!"]).unwrap_err();
        assert_eq!(err.kind, FailureKind::InvalidIdentifier);
        assert_eq!(err.stage, 1);
        // exactly one lookup: the stage-0 network; the failing stage never
        // reaches the directory
        assert_eq!(directory.lookup_count(), before + 1);
    }

    #[test]
    fn lookup_miss_stops_later_stages() {
        let directory = fixture();
        let before = directory.lookup_count();
        let err = resolve(
            &directory,
            RN_POOL_STATION_EVSE,
            &["DE*GEF", "UNKNOWNPOOL", "DE*GEF*S555*1", "DE*GEF*E555*1*A"],
        )
        .unwrap_err();
        assert_eq!(err.kind, FailureKind::EntityNotFound);
        assert_eq!(err.stage, 1);
        // network hit + pool miss; station and EVSE stages never evaluated
        assert_eq!(directory.lookup_count(), before + 2);
    }

    #[test]
    fn unknown_root_with_enough_segments_is_not_found_not_too_few() {
        let directory = fixture();
        let err = resolve(&directory, RN, &["UNKNOWNNET"]).unwrap_err();
        assert_eq!(err.kind, FailureKind::EntityNotFound);
        assert_eq!(err.stage, 0);
    }

    #[test]
    fn extra_segments_are_ignored_by_shorter_pipelines() {
        let directory = fixture();
        let chain = resolve(&directory, RN, &["DE*GEF", "leftover"]).expect("resolves");
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn operator_scoped_pipelines_resolve() {
        let directory = fixture();

        let chain = resolve(
            &directory,
            RN_OPERATOR_BRAND,
            &["DE*GEF", "DE*GEF*O1", "DE*GEF*B1"],
        )
        .expect("brand resolves");
        assert_eq!(chain.brand().expect("brand").name, "VoltBrand");

        let chain = resolve(
            &directory,
            RN_OPERATOR_GROUP,
            &["DE*GEF", "DE*GEF*O1", "DE*GEF*G1"],
        )
        .expect("group resolves");
        assert_eq!(chain.station_group().expect("group").name, "Downtown");
    }

    #[test]
    fn provider_pipeline_resolves() {
        let directory = fixture();
        let chain = resolve(&directory, RN_PROVIDER, &["DE*GEF", "DE-GDF"]).expect("resolves");
        assert_eq!(chain.provider().expect("provider").name, "GridDrive");
    }

    #[test]
    fn failure_is_identical_across_pipelines_for_same_bad_root() {
        let directory = fixture();
        for pipeline in [RN, RN_POOL, RN_SESSION, RN_RESERVATION, RN_PROVIDER] {
            let segments: Vec<&str> = std::iter::once("!!invalid!!")
                .chain(std::iter::repeat("X").take(pipeline.len() - 1))
                .collect();
            let err = resolve(&directory, pipeline, &segments).unwrap_err();
            assert_eq!(err.kind, FailureKind::InvalidIdentifier);
            assert_eq!(err.stage, 0);
            assert_eq!(err.entity_kind, crate::application::resolve::EntityKind::RoamingNetwork);
        }
    }
}
