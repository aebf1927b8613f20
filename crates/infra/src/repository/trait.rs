use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use todoapi_core::{Entity, EntityId};

/// Repository operation error.
///
/// A lookup that finds nothing is **not** an error (`get` returns `None`).
/// These variants cover the outcomes a caller has to react to explicitly.
///
/// ## Error Categories
///
/// - **RecordMissing**: `update` was asked to replace a record that does not exist
/// - **Conflict**: a concurrent writer changed or removed the record between the
///   existence check and the write
/// - **Backend**: the storage backend failed (connection, pool, SQL)
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("no record with id {id}")]
    RecordMissing { id: EntityId },

    #[error("concurrent modification of record {id}")]
    Conflict { id: EntityId },

    #[error("storage backend failure: {0}")]
    Backend(String),
}

/// Generic CRUD contract over any entity type with an identity.
///
/// ## Unit of Work
///
/// Every call is self-contained: it round-trips to the backend, and anything it
/// writes is committed atomically before it returns. Nothing is cached between
/// calls and no call spans another.
///
/// ## Update Semantics
///
/// `update()` is a full replace-by-identity:
/// 1. Check that a record with `entity.id()` exists, else `RecordMissing`
/// 2. Overwrite every non-identity field with the entity's values
/// 3. If the write touched no record (it vanished after step 1), `Conflict`
///
/// Callers that get `Conflict` re-check existence with `get()` to decide
/// between "not found" and a real collision.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    /// Create the backing storage if it does not exist yet.
    async fn ensure_schema(&self) -> Result<(), RepositoryError>;

    /// Every stored record, ascending by identity.
    async fn get_all(&self) -> Result<Vec<E>, RepositoryError>;

    /// Look up one record; `None` when no record has this identity.
    async fn get(&self, id: EntityId) -> Result<Option<E>, RepositoryError>;

    /// Store a new record. The input identity is ignored; the returned entity
    /// carries the identity the backend assigned.
    async fn insert(&self, entity: E) -> Result<E, RepositoryError>;

    /// Replace the record with the same identity.
    async fn update(&self, entity: E) -> Result<(), RepositoryError>;

    /// Remove the record with the same identity. Removing an absent record is a no-op.
    async fn delete(&self, entity: &E) -> Result<(), RepositoryError>;
}

#[async_trait]
impl<E, R> Repository<E> for Arc<R>
where
    E: Entity,
    R: Repository<E> + ?Sized,
{
    async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        (**self).ensure_schema().await
    }

    async fn get_all(&self) -> Result<Vec<E>, RepositoryError> {
        (**self).get_all().await
    }

    async fn get(&self, id: EntityId) -> Result<Option<E>, RepositoryError> {
        (**self).get(id).await
    }

    async fn insert(&self, entity: E) -> Result<E, RepositoryError> {
        (**self).insert(entity).await
    }

    async fn update(&self, entity: E) -> Result<(), RepositoryError> {
        (**self).update(entity).await
    }

    async fn delete(&self, entity: &E) -> Result<(), RepositoryError> {
        (**self).delete(entity).await
    }
}
