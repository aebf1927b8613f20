//! Domain error model.

use thiserror::Error;

use crate::id::EntityId;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Keep this focused on deterministic caller mistakes. Storage failures
/// belong to the infrastructure layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Two identities that must address the same record disagree.
    #[error("identity mismatch: expected {expected}, got {actual}")]
    IdentityMismatch { expected: EntityId, actual: EntityId },
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn identity_mismatch(expected: EntityId, actual: EntityId) -> Self {
        Self::IdentityMismatch { expected, actual }
    }
}
