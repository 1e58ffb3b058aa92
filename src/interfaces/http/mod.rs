//! HTTP interface: router, handlers, error rendering and the push stream

pub mod dto;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod router;
pub mod ws;

pub use router::{create_api_router, ApiState};
