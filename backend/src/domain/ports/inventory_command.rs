//! Driving port for pharmacy stock maintenance.

use async_trait::async_trait;

use crate::domain::{DomainResult, InventoryItem, InventoryItemDraft, InventoryItemId};

/// Driving port for stock write operations.
#[async_trait]
pub trait InventoryCommand: Send + Sync {
    /// Add a new stock line; medication names are unique ignoring case.
    async fn add_inventory_item(&self, draft: InventoryItemDraft) -> DomainResult<InventoryItem>;

    async fn restock_item(
        &self,
        id: &InventoryItemId,
        quantity: u32,
    ) -> DomainResult<InventoryItem>;
}
