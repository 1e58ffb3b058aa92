//! Charge detail record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::identifiers::{ChargingSessionId, EvseId};

/// Billing record submitted after a session ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChargeDetailRecord {
    pub session_id: ChargingSessionId,
    pub evse_id: EvseId,
    pub energy_kwh: f64,
    pub started_at: DateTime<Utc>,
    pub stopped_at: DateTime<Utc>,
}
