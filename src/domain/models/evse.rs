//! EVSE entity

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::domain::identifiers::{ChargingSessionId, EvseId};

/// EVSE operational status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvseStatus {
    Available,
    Occupied,
    Reserved,
    OutOfService,
    Unknown,
}

impl Default for EvseStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl std::fmt::Display for EvseStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Available => write!(f, "Available"),
            Self::Occupied => write!(f, "Occupied"),
            Self::Reserved => write!(f, "Reserved"),
            Self::OutOfService => write!(f, "OutOfService"),
            Self::Unknown => write!(f, "Unknown"),
        }
    }
}

impl From<&str> for EvseStatus {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "available" => Self::Available,
            "occupied" => Self::Occupied,
            "reserved" => Self::Reserved,
            "outofservice" => Self::OutOfService,
            _ => Self::Unknown,
        }
    }
}

/// A single charge point outlet. Status and the active session are the
/// only mutable fields; the guards are never held across an await.
#[derive(Debug)]
pub struct Evse {
    pub id: EvseId,
    pub max_power_kw: f64,
    status: RwLock<EvseStatus>,
    current_session: RwLock<Option<ChargingSessionId>>,
}

impl Evse {
    pub fn new(id: EvseId, max_power_kw: f64) -> Self {
        Self {
            id,
            max_power_kw,
            status: RwLock::new(EvseStatus::Available),
            current_session: RwLock::new(None),
        }
    }

    pub fn with_status(self, status: EvseStatus) -> Self {
        *self.status.write().unwrap_or_else(|e| e.into_inner()) = status;
        self
    }

    pub fn status(&self) -> EvseStatus {
        *self.status.read().unwrap_or_else(|e| e.into_inner())
    }

    pub fn set_status(&self, status: EvseStatus) {
        *self.status.write().unwrap_or_else(|e| e.into_inner()) = status;
    }

    pub fn current_session(&self) -> Option<ChargingSessionId> {
        self.current_session
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn set_current_session(&self, session: Option<ChargingSessionId>) {
        *self
            .current_session
            .write()
            .unwrap_or_else(|e| e.into_inner()) = session;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identifiers::EvseId;

    #[test]
    fn status_transitions() {
        let evse = Evse::new(EvseId::parse("DE*GEF*E1*A").expect("valid"), 22.0);
        assert_eq!(evse.status(), EvseStatus::Available);

        evse.set_status(EvseStatus::Occupied);
        assert_eq!(evse.status(), EvseStatus::Occupied);
    }

    #[test]
    fn status_parses_from_text() {
        assert_eq!(EvseStatus::from("available"), EvseStatus::Available);
        assert_eq!(EvseStatus::from("OutOfService"), EvseStatus::OutOfService);
        assert_eq!(EvseStatus::from("bogus"), EvseStatus::Unknown);
    }
}
