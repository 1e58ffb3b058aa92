//! Cross-cutting helpers

pub mod retry;
pub mod shutdown;
