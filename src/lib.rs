//! # Roaming Hub
//!
//! Networked inventory of EV charging infrastructure: roaming networks,
//! operators, pools, stations, EVSEs, sessions, reservations and
//! providers, exposed over HTTP with structured event notifications.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Typed identifiers, entities and domain errors
//! - **application**: Entity directory, path resolution, charging operations
//! - **notifications**: Event bus, registry and sinks (console/disk/network/push)
//! - **interfaces**: REST API with Swagger documentation and the WebSocket
//!   push stream
//! - **shared**: Shutdown coordination and retry helpers

pub mod application;
pub mod config;
pub mod domain;
pub mod interfaces;
pub mod notifications;
pub mod shared;

pub use config::{default_config_path, AppConfig};

// Re-export the directory and resolver surface
pub use application::directory::{EntityDirectory, SharedEntityDirectory};
pub use application::resolve;

// Re-export the API router
pub use interfaces::http::create_api_router;

// Re-export notifications
pub use notifications::{create_event_bus, EventBus, EventOccurrence, EventRegistry, SharedEventBus};
