//! Domain errors

use thiserror::Error;

use super::identifiers::IdParseError;

/// Domain-level error types
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with id={id}")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    InvalidId(#[from] IdParseError),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("EVSE {0} is out of service")]
    EvseOutOfService(String),

    #[error("No active session on EVSE {0}")]
    NoActiveSession(String),

    #[error("Invalid charge detail record: {0}")]
    InvalidCdr(String),

    #[error("Seed data error: {0}")]
    Seed(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
