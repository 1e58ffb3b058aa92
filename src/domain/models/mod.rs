//! Inventory entities
//!
//! The entity graph is read-mostly: children live in concurrent maps on
//! their parent, inserts happen at seed time (and through the few domain
//! operations that create sessions/reservations), reads happen on every
//! request.

pub mod brand;
pub mod cdr;
pub mod charging_pool;
pub mod charging_session;
pub mod charging_station;
pub mod evse;
pub mod operator;
pub mod provider;
pub mod reservation;
pub mod roaming_network;
pub mod station_group;

pub use brand::Brand;
pub use cdr::ChargeDetailRecord;
pub use charging_pool::ChargingPool;
pub use charging_session::ChargingSession;
pub use charging_station::ChargingStation;
pub use evse::{Evse, EvseStatus};
pub use operator::ChargingStationOperator;
pub use provider::EMobilityProvider;
pub use reservation::ChargingReservation;
pub use roaming_network::RoamingNetwork;
pub use station_group::ChargingStationGroup;
