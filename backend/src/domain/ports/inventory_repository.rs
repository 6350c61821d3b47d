//! Port for pharmacy stock persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{InventoryItem, InventoryItemId};

use super::{Repository, RepositoryError};

/// Stock storage with batch updates used when dispensing prescriptions.
#[async_trait]
pub trait InventoryRepository:
    Repository<Entity = InventoryItem, Id = InventoryItemId>
{
    /// Exact medication name, ignoring case.
    async fn find_by_name(&self, name: &str) -> Result<Option<InventoryItem>, RepositoryError>;

    async fn find_low_stock(&self) -> Result<Vec<InventoryItem>, RepositoryError>;

    /// Unexpired items expiring within `days` of `now`.
    async fn find_expiring_soon(
        &self,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<InventoryItem>, RepositoryError>;

    async fn find_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<InventoryItem>, RepositoryError>;

    /// Substring match on medication or generic name, ignoring case.
    async fn search_medications(
        &self,
        query: &str,
    ) -> Result<Vec<InventoryItem>, RepositoryError>;

    /// Update every item or none of them.
    ///
    /// Each item's revision is checked as in [`Repository::update`]; a single
    /// missing or stale item rejects the whole batch. Stored items are
    /// returned in input order.
    async fn update_all(
        &self,
        items: Vec<InventoryItem>,
    ) -> Result<Vec<InventoryItem>, RepositoryError>;
}

#[cfg(test)]
mockall::mock! {
    pub InventoryStore {}

    #[async_trait]
    impl Repository for InventoryStore {
        type Entity = InventoryItem;
        type Id = InventoryItemId;

        async fn find_by_id(&self, id: &InventoryItemId) -> Result<InventoryItem, RepositoryError>;
        async fn save(&self, entity: InventoryItem) -> Result<InventoryItem, RepositoryError>;
        async fn update(&self, entity: InventoryItem) -> Result<InventoryItem, RepositoryError>;
        async fn delete(&self, id: &InventoryItemId) -> Result<bool, RepositoryError>;
        async fn find_all(&self) -> Result<Vec<InventoryItem>, RepositoryError>;
    }

    #[async_trait]
    impl InventoryRepository for InventoryStore {
        async fn find_by_name(&self, name: &str) -> Result<Option<InventoryItem>, RepositoryError>;
        async fn find_low_stock(&self) -> Result<Vec<InventoryItem>, RepositoryError>;
        async fn find_expiring_soon(
            &self,
            days: u32,
            now: DateTime<Utc>,
        ) -> Result<Vec<InventoryItem>, RepositoryError>;
        async fn find_expired(
            &self,
            now: DateTime<Utc>,
        ) -> Result<Vec<InventoryItem>, RepositoryError>;
        async fn search_medications(
            &self,
            query: &str,
        ) -> Result<Vec<InventoryItem>, RepositoryError>;
        async fn update_all(
            &self,
            items: Vec<InventoryItem>,
        ) -> Result<Vec<InventoryItem>, RepositoryError>;
    }
}
