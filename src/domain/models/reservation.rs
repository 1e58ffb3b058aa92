//! Charging reservation entity

use chrono::{DateTime, Utc};

use crate::domain::identifiers::{ChargingReservationId, EvseId};

/// A reservation holds an EVSE for a driver until the expiry time.
#[derive(Debug)]
pub struct ChargingReservation {
    pub id: ChargingReservationId,
    pub evse_id: EvseId,
    pub auth_token: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl ChargingReservation {
    pub fn new(
        id: ChargingReservationId,
        evse_id: EvseId,
        auth_token: impl Into<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            evse_id,
            auth_token: auth_token.into(),
            created_at: Utc::now(),
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() > self.expires_at
    }
}
