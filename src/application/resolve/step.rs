//! Resolution steps
//!
//! One [`Step`] per entity kind: parse the path segment into the kind's
//! typed ID, then look it up within the parent entity resolved by the
//! previous step (or the directory's root scope for roaming networks).

use std::sync::Arc;

use crate::application::directory::EntityDirectory;
use crate::domain::identifiers::{
    BrandId, ChargingPoolId, ChargingReservationId, ChargingSessionId, ChargingStationGroupId,
    ChargingStationId, ChargingStationOperatorId, EMobilityProviderId, EvseId, IdParseError,
    RoamingNetworkId,
};
use crate::domain::models::{
    Brand, ChargingPool, ChargingReservation, ChargingSession, ChargingStation,
    ChargingStationGroup, ChargingStationOperator, EMobilityProvider, Evse, RoamingNetwork,
};

/// Entity kinds of the inventory hierarchy, used for failure messages and
/// response bodies (`Invalid <Kind>Id!` / `Unknown <Kind>Id!`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    RoamingNetwork,
    ChargingStationOperator,
    Brand,
    ChargingStationGroup,
    ChargingPool,
    ChargingStation,
    Evse,
    ChargingSession,
    ChargingReservation,
    EMobilityProvider,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::RoamingNetwork => RoamingNetworkId::KIND,
            Self::ChargingStationOperator => ChargingStationOperatorId::KIND,
            Self::Brand => BrandId::KIND,
            Self::ChargingStationGroup => ChargingStationGroupId::KIND,
            Self::ChargingPool => ChargingPoolId::KIND,
            Self::ChargingStation => ChargingStationId::KIND,
            Self::Evse => EvseId::KIND,
            Self::ChargingSession => ChargingSessionId::KIND,
            Self::ChargingReservation => ChargingReservationId::KIND,
            Self::EMobilityProvider => EMobilityProviderId::KIND,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An entity resolved by one pipeline step
#[derive(Debug, Clone)]
pub enum ResolvedEntity {
    RoamingNetwork(Arc<RoamingNetwork>),
    Operator(Arc<ChargingStationOperator>),
    Brand(Arc<Brand>),
    StationGroup(Arc<ChargingStationGroup>),
    ChargingPool(Arc<ChargingPool>),
    ChargingStation(Arc<ChargingStation>),
    Evse(Arc<Evse>),
    Session(Arc<ChargingSession>),
    Reservation(Arc<ChargingReservation>),
    Provider(Arc<EMobilityProvider>),
}

/// Why a single step failed; mapped to the public taxonomy by `resolve`.
pub(super) enum StepError {
    Invalid(IdParseError),
    NotFound,
    /// The parent entity did not match the step's expected kind. Pipeline
    /// constants pair each step with its parent kind, so this only fires
    /// on a wiring bug.
    ParentMismatch,
}

/// One resolution step; a pipeline is an ordered `&[Step]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    RoamingNetwork,
    Operator,
    Brand,
    StationGroup,
    ChargingPool,
    ChargingStation,
    Evse,
    Session,
    Reservation,
    Provider,
}

impl Step {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::RoamingNetwork => EntityKind::RoamingNetwork,
            Self::Operator => EntityKind::ChargingStationOperator,
            Self::Brand => EntityKind::Brand,
            Self::StationGroup => EntityKind::ChargingStationGroup,
            Self::ChargingPool => EntityKind::ChargingPool,
            Self::ChargingStation => EntityKind::ChargingStation,
            Self::Evse => EntityKind::Evse,
            Self::Session => EntityKind::ChargingSession,
            Self::Reservation => EntityKind::ChargingReservation,
            Self::Provider => EntityKind::EMobilityProvider,
        }
    }

    /// `(segment) -> parse -> ID -> lookup(parent, ID) -> entity`
    pub(super) fn resolve(
        &self,
        directory: &EntityDirectory,
        parent: Option<&ResolvedEntity>,
        segment: &str,
    ) -> Result<ResolvedEntity, StepError> {
        match self {
            Step::RoamingNetwork => {
                let id = RoamingNetworkId::parse(segment).map_err(StepError::Invalid)?;
                directory
                    .roaming_network(&id)
                    .map(ResolvedEntity::RoamingNetwork)
                    .ok_or(StepError::NotFound)
            }
            Step::Operator => {
                let id = ChargingStationOperatorId::parse(segment).map_err(StepError::Invalid)?;
                let Some(ResolvedEntity::RoamingNetwork(network)) = parent else {
                    return Err(StepError::ParentMismatch);
                };
                directory
                    .operator(network, &id)
                    .map(ResolvedEntity::Operator)
                    .ok_or(StepError::NotFound)
            }
            Step::Brand => {
                let id = BrandId::parse(segment).map_err(StepError::Invalid)?;
                let Some(ResolvedEntity::Operator(operator)) = parent else {
                    return Err(StepError::ParentMismatch);
                };
                directory
                    .brand(operator, &id)
                    .map(ResolvedEntity::Brand)
                    .ok_or(StepError::NotFound)
            }
            Step::StationGroup => {
                let id = ChargingStationGroupId::parse(segment).map_err(StepError::Invalid)?;
                let Some(ResolvedEntity::Operator(operator)) = parent else {
                    return Err(StepError::ParentMismatch);
                };
                directory
                    .station_group(operator, &id)
                    .map(ResolvedEntity::StationGroup)
                    .ok_or(StepError::NotFound)
            }
            Step::ChargingPool => {
                let id = ChargingPoolId::parse(segment).map_err(StepError::Invalid)?;
                let Some(ResolvedEntity::RoamingNetwork(network)) = parent else {
                    return Err(StepError::ParentMismatch);
                };
                directory
                    .charging_pool(network, &id)
                    .map(ResolvedEntity::ChargingPool)
                    .ok_or(StepError::NotFound)
            }
            Step::ChargingStation => {
                let id = ChargingStationId::parse(segment).map_err(StepError::Invalid)?;
                let Some(ResolvedEntity::ChargingPool(pool)) = parent else {
                    return Err(StepError::ParentMismatch);
                };
                directory
                    .charging_station(pool, &id)
                    .map(ResolvedEntity::ChargingStation)
                    .ok_or(StepError::NotFound)
            }
            Step::Evse => {
                let id = EvseId::parse(segment).map_err(StepError::Invalid)?;
                let Some(ResolvedEntity::ChargingStation(station)) = parent else {
                    return Err(StepError::ParentMismatch);
                };
                directory
                    .evse(station, &id)
                    .map(ResolvedEntity::Evse)
                    .ok_or(StepError::NotFound)
            }
            Step::Session => {
                let id = ChargingSessionId::parse(segment).map_err(StepError::Invalid)?;
                let Some(ResolvedEntity::RoamingNetwork(network)) = parent else {
                    return Err(StepError::ParentMismatch);
                };
                directory
                    .session(network, &id)
                    .map(ResolvedEntity::Session)
                    .ok_or(StepError::NotFound)
            }
            Step::Reservation => {
                let id = ChargingReservationId::parse(segment).map_err(StepError::Invalid)?;
                let Some(ResolvedEntity::RoamingNetwork(network)) = parent else {
                    return Err(StepError::ParentMismatch);
                };
                directory
                    .reservation(network, &id)
                    .map(ResolvedEntity::Reservation)
                    .ok_or(StepError::NotFound)
            }
            Step::Provider => {
                let id = EMobilityProviderId::parse(segment).map_err(StepError::Invalid)?;
                let Some(ResolvedEntity::RoamingNetwork(network)) = parent else {
                    return Err(StepError::ParentMismatch);
                };
                directory
                    .provider(network, &id)
                    .map(ResolvedEntity::Provider)
                    .ok_or(StepError::NotFound)
            }
        }
    }
}
