//! Core domain: typed identifiers, entities and domain errors

pub mod error;
pub mod identifiers;
pub mod models;

pub use error::{DomainError, DomainResult};
