//! Brand entity

use crate::domain::identifiers::BrandId;

/// Marketing brand under which an operator's stations appear.
#[derive(Debug)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
}

impl Brand {
    pub fn new(id: BrandId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}
