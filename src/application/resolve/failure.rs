//! Resolution failure taxonomy

use crate::domain::identifiers::IdParseError;

use super::step::EntityKind;

/// What went wrong during resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Fewer path segments than pipeline steps; checked up front, before
    /// any parse or lookup
    TooFewSegments,
    /// A segment did not parse as the step's identifier kind
    InvalidIdentifier,
    /// The parsed ID has no entity within the parent scope
    EntityNotFound,
}

/// A classified resolution failure. Resolution stops at the first failing
/// step; `stage` is that step's index.
#[derive(Debug, Clone)]
pub struct ResolutionFailure {
    pub stage: usize,
    pub kind: FailureKind,
    /// Entity kind of the failing step (the first step for
    /// `TooFewSegments`)
    pub entity_kind: EntityKind,
    pub reason: String,
}

impl ResolutionFailure {
    pub(super) fn too_few_segments(first: EntityKind, expected: usize, got: usize) -> Self {
        Self {
            stage: 0,
            kind: FailureKind::TooFewSegments,
            entity_kind: first,
            reason: format!("expected {expected} path segments, got {got}"),
        }
    }

    pub(super) fn invalid_identifier(stage: usize, kind: EntityKind, err: &IdParseError) -> Self {
        Self {
            stage,
            kind: FailureKind::InvalidIdentifier,
            entity_kind: kind,
            reason: err.to_string(),
        }
    }

    pub(super) fn entity_not_found(stage: usize, kind: EntityKind, segment: &str) -> Self {
        Self {
            stage,
            kind: FailureKind::EntityNotFound,
            entity_kind: kind,
            reason: format!("Unknown {}Id '{}'", kind.name(), segment),
        }
    }
}

impl std::fmt::Display for ResolutionFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "stage {}: {}", self.stage, self.reason)
    }
}

impl std::error::Error for ResolutionFailure {}
