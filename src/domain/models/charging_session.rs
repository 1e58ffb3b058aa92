//! Charging session entity

use chrono::{DateTime, Utc};

use crate::domain::identifiers::{ChargingSessionId, EMobilityProviderId, EvseId};

/// An in-progress or completed charging session. Sessions are immutable
/// snapshots; stopping a session removes it from the network's session
/// table and produces a charge detail record.
#[derive(Debug)]
pub struct ChargingSession {
    pub id: ChargingSessionId,
    pub evse_id: EvseId,
    pub provider_id: Option<EMobilityProviderId>,
    /// Authorization token (RFID UID, eMAID or remote-start handle)
    pub auth_token: Option<String>,
    pub started_at: DateTime<Utc>,
}

impl ChargingSession {
    pub fn new(evse_id: EvseId) -> Self {
        Self {
            id: ChargingSessionId::random(),
            evse_id,
            provider_id: None,
            auth_token: None,
            started_at: Utc::now(),
        }
    }

    pub fn with_provider(mut self, provider_id: EMobilityProviderId) -> Self {
        self.provider_id = Some(provider_id);
        self
    }

    pub fn with_auth_token(mut self, token: impl Into<String>) -> Self {
        self.auth_token = Some(token.into());
        self
    }
}
