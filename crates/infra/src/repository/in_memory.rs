use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;

use todoapi_core::{Entity, EntityId};

use super::r#trait::{Repository, RepositoryError};

/// In-memory repository.
///
/// Intended for tests/dev. Identities start at 1 and are never reused, even
/// after the record holding one is deleted.
#[derive(Debug)]
pub struct InMemoryRepository<E> {
    records: RwLock<BTreeMap<EntityId, E>>,
    next_id: AtomicI64,
}

impl<E> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    fn poisoned() -> RepositoryError {
        RepositoryError::Backend("lock poisoned".to_string())
    }
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<E: Entity> Repository<E> for InMemoryRepository<E> {
    async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        Ok(())
    }

    async fn get_all(&self) -> Result<Vec<E>, RepositoryError> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(records.values().cloned().collect())
    }

    async fn get(&self, id: EntityId) -> Result<Option<E>, RepositoryError> {
        let records = self.records.read().map_err(|_| Self::poisoned())?;
        Ok(records.get(&id).cloned())
    }

    async fn insert(&self, entity: E) -> Result<E, RepositoryError> {
        let id = EntityId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let stored = entity.with_id(id);

        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        records.insert(id, stored.clone());
        Ok(stored)
    }

    async fn update(&self, entity: E) -> Result<(), RepositoryError> {
        let id = entity.id();

        // Existence check and write take the lock separately, like a
        // read-then-write against a real backend.
        let exists = self
            .records
            .read()
            .map_err(|_| Self::poisoned())?
            .contains_key(&id);
        if !exists {
            return Err(RepositoryError::RecordMissing { id });
        }

        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        match records.get_mut(&id) {
            Some(slot) => {
                *slot = entity;
                Ok(())
            }
            None => Err(RepositoryError::Conflict { id }),
        }
    }

    async fn delete(&self, entity: &E) -> Result<(), RepositoryError> {
        let mut records = self.records.write().map_err(|_| Self::poisoned())?;
        records.remove(&entity.id());
        Ok(())
    }
}
