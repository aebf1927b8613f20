//! Entity trait: identity + continuity across state changes.

use crate::error::{DomainError, DomainResult};
use crate::id::EntityId;

/// Anything with a backend-assigned identity that a repository can store.
///
/// The identity is assigned once, by the storage backend, when the record is
/// first inserted. Nothing outside a repository should call [`Entity::with_id`].
pub trait Entity: Clone + Send + Sync + 'static {
    /// Returns the entity identifier.
    fn id(&self) -> EntityId;

    /// Returns the same entity carrying the identity the backend assigned.
    fn with_id(self, id: EntityId) -> Self;

    /// Checks that this entity is the record addressed by `expected`.
    ///
    /// Used at request boundaries where the identity arrives twice (path and
    /// body) and the two must agree before storage is touched.
    fn ensure_identity(&self, expected: EntityId) -> DomainResult<()> {
        if self.id() == expected {
            Ok(())
        } else {
            Err(DomainError::identity_mismatch(expected, self.id()))
        }
    }
}
