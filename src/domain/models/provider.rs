//! E-mobility provider entity

use crate::domain::identifiers::EMobilityProviderId;

/// An e-mobility provider issues auth tokens to drivers and is billed for
/// their sessions.
#[derive(Debug)]
pub struct EMobilityProvider {
    pub id: EMobilityProviderId,
    pub name: String,
}

impl EMobilityProvider {
    pub fn new(id: EMobilityProviderId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
