//! Charging operations: remote start/stop, authorize start/stop, CDR
//! submission and EVSE status snapshots
//!
//! These are the domain operations the HTTP handlers invoke after
//! resolution; the handlers raise the paired notification events around
//! them.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::identifiers::{EMobilityProviderId, EvseId};
use crate::domain::models::{
    ChargeDetailRecord, ChargingSession, Evse, EvseStatus, RoamingNetwork,
};
use crate::domain::{DomainError, DomainResult};

/// Outcome of an authorize start/stop request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuthDecision {
    Accepted,
    Blocked,
    Invalid,
}

impl std::fmt::Display for AuthDecision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Accepted => write!(f, "Accepted"),
            Self::Blocked => write!(f, "Blocked"),
            Self::Invalid => write!(f, "Invalid"),
        }
    }
}

/// Start a session on an EVSE on behalf of a provider or remote token.
pub fn remote_start(
    network: &RoamingNetwork,
    evse: &Arc<Evse>,
    provider_id: Option<EMobilityProviderId>,
    auth_token: Option<String>,
) -> DomainResult<Arc<ChargingSession>> {
    match evse.status() {
        EvseStatus::OutOfService => {
            return Err(DomainError::EvseOutOfService(evse.id.to_string()))
        }
        EvseStatus::Occupied => {
            return Err(DomainError::Conflict(format!(
                "EVSE {} already has an active session",
                evse.id
            )))
        }
        _ => {}
    }

    let mut session = ChargingSession::new(evse.id.clone());
    if let Some(provider) = provider_id {
        session = session.with_provider(provider);
    }
    if let Some(token) = auth_token {
        session = session.with_auth_token(token);
    }
    let session = Arc::new(session);

    network.insert_session(Arc::clone(&session));
    evse.set_current_session(Some(session.id.clone()));
    evse.set_status(EvseStatus::Occupied);

    info!(evse = %evse.id, session = %session.id, "Remote start accepted");
    Ok(session)
}

/// Stop the active session on an EVSE.
pub fn remote_stop(
    network: &RoamingNetwork,
    evse: &Arc<Evse>,
) -> DomainResult<Arc<ChargingSession>> {
    let Some(session_id) = evse.current_session() else {
        return Err(DomainError::NoActiveSession(evse.id.to_string()));
    };

    let session = network
        .remove_session(&session_id)
        .ok_or_else(|| DomainError::NoActiveSession(evse.id.to_string()))?;

    evse.set_current_session(None);
    evse.set_status(EvseStatus::Available);

    info!(evse = %evse.id, session = %session.id, "Remote stop completed");
    Ok(session)
}

/// Authorize a token for starting at an EVSE.
pub fn auth_start(evse: &Arc<Evse>, auth_token: &str) -> AuthDecision {
    if auth_token.trim().is_empty() {
        return AuthDecision::Invalid;
    }
    if evse.status() == EvseStatus::OutOfService {
        return AuthDecision::Blocked;
    }
    AuthDecision::Accepted
}

/// Authorize a token for stopping at an EVSE. Stopping is only sensible
/// against the EVSE's active session.
pub fn auth_stop(evse: &Arc<Evse>, auth_token: &str) -> AuthDecision {
    if auth_token.trim().is_empty() {
        return AuthDecision::Invalid;
    }
    if evse.current_session().is_none() {
        return AuthDecision::Blocked;
    }
    AuthDecision::Accepted
}

/// Validate and accept a charge detail record.
pub fn send_cdr(network: &RoamingNetwork, cdr: &ChargeDetailRecord) -> DomainResult<()> {
    if cdr.stopped_at < cdr.started_at {
        return Err(DomainError::InvalidCdr(
            "stopped_at precedes started_at".to_string(),
        ));
    }
    if cdr.energy_kwh < 0.0 {
        return Err(DomainError::InvalidCdr("negative energy".to_string()));
    }

    info!(
        network = %network.id,
        session = %cdr.session_id,
        evse = %cdr.evse_id,
        energy_kwh = cdr.energy_kwh,
        "Charge detail record accepted"
    );
    Ok(())
}

/// Network-wide EVSE status snapshot (pool → station → EVSE walk).
pub fn evse_status_snapshot(network: &RoamingNetwork) -> Vec<(EvseId, EvseStatus)> {
    let mut statuses = Vec::new();
    for pool in network.pools_snapshot() {
        for station in pool.stations_snapshot() {
            for evse in station.evses_snapshot() {
                statuses.push((evse.id.clone(), evse.status()));
            }
        }
    }
    statuses
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identifiers::RoamingNetworkId;

    fn network_with_evse() -> (RoamingNetwork, Arc<Evse>) {
        let network = RoamingNetwork::new(
            RoamingNetworkId::parse("Test").expect("id"),
            "Test network",
        );
        let evse = Arc::new(Evse::new(EvseId::parse("DE*GEF*E1*A").expect("id"), 22.0));
        (network, evse)
    }

    #[test]
    fn remote_start_then_stop_round_trip() {
        let (network, evse) = network_with_evse();

        let session =
            remote_start(&network, &evse, None, Some("04AA11BB".to_string())).expect("starts");
        assert_eq!(evse.status(), EvseStatus::Occupied);
        assert_eq!(evse.current_session(), Some(session.id.clone()));
        assert_eq!(network.session_count(), 1);

        let stopped = remote_stop(&network, &evse).expect("stops");
        assert_eq!(stopped.id, session.id);
        assert_eq!(evse.status(), EvseStatus::Available);
        assert_eq!(network.session_count(), 0);
    }

    #[test]
    fn remote_start_rejects_occupied_evse() {
        let (network, evse) = network_with_evse();
        remote_start(&network, &evse, None, None).expect("first start");

        let err = remote_start(&network, &evse, None, None).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn remote_stop_without_session_fails() {
        let (network, evse) = network_with_evse();
        let err = remote_stop(&network, &evse).unwrap_err();
        assert!(matches!(err, DomainError::NoActiveSession(_)));
    }

    #[test]
    fn auth_decisions() {
        let (network, evse) = network_with_evse();

        assert_eq!(auth_start(&evse, "04AA11BB"), AuthDecision::Accepted);
        assert_eq!(auth_start(&evse, "  "), AuthDecision::Invalid);

        evse.set_status(EvseStatus::OutOfService);
        assert_eq!(auth_start(&evse, "04AA11BB"), AuthDecision::Blocked);

        evse.set_status(EvseStatus::Available);
        assert_eq!(auth_stop(&evse, "04AA11BB"), AuthDecision::Blocked);
        remote_start(&network, &evse, None, None).expect("start");
        assert_eq!(auth_stop(&evse, "04AA11BB"), AuthDecision::Accepted);
    }

    #[test]
    fn cdr_validation() {
        let (network, evse) = network_with_evse();
        let session = remote_start(&network, &evse, None, None).expect("start");

        let now = chrono::Utc::now();
        let good = ChargeDetailRecord {
            session_id: session.id.clone(),
            evse_id: evse.id.clone(),
            energy_kwh: 7.5,
            started_at: now - chrono::Duration::hours(1),
            stopped_at: now,
        };
        assert!(send_cdr(&network, &good).is_ok());

        let bad = ChargeDetailRecord {
            stopped_at: now - chrono::Duration::hours(2),
            ..good.clone()
        };
        assert!(matches!(
            send_cdr(&network, &bad).unwrap_err(),
            DomainError::InvalidCdr(_)
        ));
    }
}
