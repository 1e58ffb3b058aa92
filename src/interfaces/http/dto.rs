//! HTTP DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::charging::AuthDecision;
use crate::domain::models::{
    Brand, ChargingPool, ChargingReservation, ChargingSession, ChargingStation,
    ChargingStationGroup, ChargingStationOperator, EMobilityProvider, Evse, RoamingNetwork,
};

/// Error body returned for failed resolution and domain operations
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDto {
    pub description: String,
}

/// Roaming network summary
#[derive(Debug, Serialize, ToSchema)]
pub struct NetworkDto {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub operator_count: usize,
    pub pool_count: usize,
    pub session_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&RoamingNetwork> for NetworkDto {
    fn from(n: &RoamingNetwork) -> Self {
        Self {
            id: n.id.to_string(),
            name: n.name.clone(),
            description: n.description.clone(),
            operator_count: n.operator_count(),
            pool_count: n.pool_count(),
            session_count: n.session_count(),
            created_at: n.created_at,
        }
    }
}

/// Charging station operator details
#[derive(Debug, Serialize, ToSchema)]
pub struct OperatorDto {
    pub id: String,
    pub name: String,
    pub brand_count: usize,
    pub group_count: usize,
}

impl From<&ChargingStationOperator> for OperatorDto {
    fn from(o: &ChargingStationOperator) -> Self {
        Self {
            id: o.id.to_string(),
            name: o.name.clone(),
            brand_count: o.brand_count(),
            group_count: o.group_count(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BrandDto {
    pub id: String,
    pub name: String,
}

impl From<&Brand> for BrandDto {
    fn from(b: &Brand) -> Self {
        Self {
            id: b.id.to_string(),
            name: b.name.clone(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GroupDto {
    pub id: String,
    pub name: String,
    pub members: Vec<String>,
}

impl From<&ChargingStationGroup> for GroupDto {
    fn from(g: &ChargingStationGroup) -> Self {
        Self {
            id: g.id.to_string(),
            name: g.name.clone(),
            members: g.members.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PoolDto {
    pub id: String,
    pub name: String,
    pub operator_id: String,
    pub address: Option<String>,
    pub station_count: usize,
}

impl From<&ChargingPool> for PoolDto {
    fn from(p: &ChargingPool) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            operator_id: p.operator_id.to_string(),
            address: p.address.clone(),
            station_count: p.station_count(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StationDto {
    pub id: String,
    pub name: String,
    pub evse_count: usize,
}

impl From<&ChargingStation> for StationDto {
    fn from(s: &ChargingStation) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            evse_count: s.evse_count(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct EvseDto {
    pub id: String,
    /// Available, Occupied, Reserved, OutOfService or Unknown
    pub status: String,
    pub max_power_kw: f64,
    pub current_session: Option<String>,
}

impl From<&Evse> for EvseDto {
    fn from(e: &Evse) -> Self {
        Self {
            id: e.id.to_string(),
            status: e.status().to_string(),
            max_power_kw: e.max_power_kw,
            current_session: e.current_session().map(|s| s.to_string()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionDto {
    pub id: String,
    pub evse_id: String,
    pub provider_id: Option<String>,
    pub auth_token: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl From<&ChargingSession> for SessionDto {
    fn from(s: &ChargingSession) -> Self {
        Self {
            id: s.id.to_string(),
            evse_id: s.evse_id.to_string(),
            provider_id: s.provider_id.as_ref().map(|p| p.to_string()),
            auth_token: s.auth_token.clone(),
            started_at: s.started_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: String,
    pub evse_id: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub expired: bool,
}

impl From<&ChargingReservation> for ReservationDto {
    fn from(r: &ChargingReservation) -> Self {
        Self {
            id: r.id.to_string(),
            evse_id: r.evse_id.to_string(),
            created_at: r.created_at,
            expires_at: r.expires_at,
            expired: r.is_expired(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProviderDto {
    pub id: String,
    pub name: String,
}

impl From<&EMobilityProvider> for ProviderDto {
    fn from(p: &EMobilityProvider) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
        }
    }
}

/// One row of a network-wide EVSE status snapshot
#[derive(Debug, Serialize, ToSchema)]
pub struct EvseStatusEntryDto {
    pub evse_id: String,
    pub status: String,
}

// -- command requests/responses -------------------------------------------

/// Remote start request body
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct RemoteStartRequest {
    /// Requesting e-mobility provider (optional)
    pub provider_id: Option<String>,
    /// Authorization token presented by the driver (optional)
    pub auth_token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoteStartResponse {
    pub session_id: String,
    pub evse_id: String,
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RemoteStopResponse {
    pub session_id: String,
    pub evse_id: String,
    pub status: String,
}

/// Authorize start/stop request body
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct AuthRequest {
    /// RFID UID or eMAID
    pub auth_token: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponseDto {
    pub decision: String,
    /// Session handle issued on an accepted authorize-start
    pub session_id: Option<String>,
}

impl AuthResponseDto {
    pub fn new(decision: AuthDecision, session_id: Option<String>) -> Self {
        Self {
            decision: decision.to_string(),
            session_id,
        }
    }
}

/// Charge detail record submission body
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct CdrRequest {
    pub session_id: String,
    pub evse_id: String,
    pub energy_kwh: f64,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CdrResponse {
    pub session_id: String,
    pub status: String,
}
