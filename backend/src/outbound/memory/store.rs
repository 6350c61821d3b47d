//! Generic keyed store backing every in-memory repository.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::Entity;
use crate::domain::ports::{Repository, RepositoryError};

/// Records of one entity type keyed by identity.
///
/// Reads share the lock; writes take it exclusively, so a revision check and
/// the write it guards can never interleave with another writer.
pub struct InMemoryRepository<T: Entity> {
    records: RwLock<HashMap<T::Id, T>>,
}

impl<T: Entity> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl<T: Entity> InMemoryRepository<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with `records`, keeping their revisions as given.
    pub fn seeded(records: impl IntoIterator<Item = T>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.id().clone(), record))
            .collect();
        Self {
            records: RwLock::new(records),
        }
    }

    /// Every record matching `keep`, in unspecified order.
    pub(super) async fn select(&self, keep: impl Fn(&T) -> bool) -> Vec<T> {
        self.records
            .read()
            .await
            .values()
            .filter(|record| keep(*record))
            .cloned()
            .collect()
    }

    pub(super) async fn first(&self, keep: impl Fn(&T) -> bool) -> Option<T> {
        self.records
            .read()
            .await
            .values()
            .find(|record| keep(*record))
            .cloned()
    }

    pub(super) fn records(&self) -> &RwLock<HashMap<T::Id, T>> {
        &self.records
    }
}

/// Revision-checked replacement used by single and batch updates.
///
/// Returns the record as it will be stored, with its revision bumped; the
/// caller decides whether to commit it.
pub(super) fn checked_update<T: Entity>(
    records: &HashMap<T::Id, T>,
    entity: T,
) -> Result<T, RepositoryError> {
    let stored = records
        .get(entity.id())
        .ok_or_else(|| RepositoryError::missing::<T>(entity.id()))?;
    if stored.revision() != entity.revision() {
        return Err(RepositoryError::stale(&entity, stored.revision()));
    }
    let audit = entity.audit().bumped();
    Ok(entity.with_audit(audit))
}

#[async_trait]
impl<T: Entity> Repository for InMemoryRepository<T> {
    type Entity = T;
    type Id = T::Id;

    async fn find_by_id(&self, id: &T::Id) -> Result<T, RepositoryError> {
        self.records
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::missing::<T>(id))
    }

    async fn save(&self, entity: T) -> Result<T, RepositoryError> {
        let mut records = self.records.write().await;
        if records.contains_key(entity.id()) {
            return Err(RepositoryError::conflict(format!(
                "{} with id {} already exists",
                T::NAME,
                entity.id()
            )));
        }
        debug!(entity = T::NAME, id = %entity.id(), "record inserted");
        records.insert(entity.id().clone(), entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: T) -> Result<T, RepositoryError> {
        let mut records = self.records.write().await;
        let next = checked_update(&records, entity)?;
        debug!(
            entity = T::NAME,
            id = %next.id(),
            revision = next.revision(),
            "record updated"
        );
        records.insert(next.id().clone(), next.clone());
        Ok(next)
    }

    async fn delete(&self, id: &T::Id) -> Result<bool, RepositoryError> {
        let removed = self.records.write().await.remove(id).is_some();
        debug!(entity = T::NAME, %id, removed, "record delete requested");
        Ok(removed)
    }

    async fn find_all(&self) -> Result<Vec<T>, RepositoryError> {
        Ok(self.records.read().await.values().cloned().collect())
    }
}
