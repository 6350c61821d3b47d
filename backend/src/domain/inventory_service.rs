//! Pharmacy stock maintenance.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{InventoryCommand, InventoryRepository};
use crate::domain::service_support::bounded;
use crate::domain::{
    DomainError, DomainResult, InventoryItem, InventoryItemDraft, InventoryItemId, ServicePolicy,
};

/// Inventory service implementing the stock driving port.
#[derive(Clone)]
pub struct InventoryService<I> {
    inventory: Arc<I>,
    clock: Arc<dyn Clock>,
    policy: ServicePolicy,
}

impl<I> InventoryService<I> {
    pub fn new(inventory: Arc<I>, clock: Arc<dyn Clock>, policy: ServicePolicy) -> Self {
        Self {
            inventory,
            clock,
            policy,
        }
    }
}

#[async_trait]
impl<I> InventoryCommand for InventoryService<I>
where
    I: InventoryRepository,
{
    async fn add_inventory_item(&self, draft: InventoryItemDraft) -> DomainResult<InventoryItem> {
        let item = InventoryItem::create(draft, self.clock.utc())?;
        let existing = bounded(
            &self.policy,
            "inventory.find_by_name",
            self.inventory.find_by_name(item.medication_name()),
        )
        .await?;
        if existing.is_some() {
            return Err(DomainError::conflict(format!(
                "Medication {} is already stocked",
                item.medication_name()
            )));
        }
        let saved = bounded(&self.policy, "inventory.save", self.inventory.save(item)).await?;
        info!(
            item_id = %saved.id(),
            medication = saved.medication_name(),
            quantity = saved.quantity(),
            "inventory item added"
        );
        Ok(saved)
    }

    async fn restock_item(
        &self,
        id: &InventoryItemId,
        quantity: u32,
    ) -> DomainResult<InventoryItem> {
        let current = bounded(
            &self.policy,
            "inventory.find_by_id",
            self.inventory.find_by_id(id),
        )
        .await?;
        let restocked = current.restock(quantity, self.clock.utc())?;
        let stored = bounded(
            &self.policy,
            "inventory.update",
            self.inventory.update(restocked),
        )
        .await?;
        info!(item_id = %stored.id(), quantity = stored.quantity(), "inventory restocked");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{MockInventoryStore, RepositoryError};
    use crate::domain::service_fixtures::{clock_at, fixed_now, stock};
    use crate::domain::{Currency, ErrorCode, Money};

    fn service(inventory: MockInventoryStore) -> InventoryService<MockInventoryStore> {
        InventoryService::new(
            Arc::new(inventory),
            clock_at(fixed_now()),
            ServicePolicy::default(),
        )
    }

    fn draft(name: &str) -> InventoryItemDraft {
        InventoryItemDraft {
            medication_name: name.to_owned(),
            generic_name: "Acetylsalicylic acid".to_owned(),
            manufacturer: "Bayer".to_owned(),
            batch_number: "ASP-0926".to_owned(),
            expiry_date: fixed_now() + Duration::days(200),
            quantity: 120,
            unit_price: Money::from_units(3, Currency::Egp),
            reorder_level: 20,
            location: "Shelf B2".to_owned(),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn new_medications_are_saved() {
        let mut inventory = MockInventoryStore::new();
        inventory
            .expect_find_by_name()
            .withf(|name| name == "Aspirin")
            .return_once(|_| Ok(None));
        inventory.expect_save().times(1).returning(Ok);

        let item = service(inventory)
            .add_inventory_item(draft("  Aspirin "))
            .await
            .expect("new medication");

        assert_eq!(item.medication_name(), "Aspirin");
        assert_eq!(item.quantity(), 120);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_names_conflict() {
        let existing = stock("aspirin", 10, fixed_now());
        let mut inventory = MockInventoryStore::new();
        inventory
            .expect_find_by_name()
            .return_once(move |_| Ok(Some(existing)));
        inventory.expect_save().times(0);

        let err = service(inventory)
            .add_inventory_item(draft("Aspirin"))
            .await
            .expect_err("already stocked");

        assert_eq!(err.code(), ErrorCode::Conflict);
        assert_eq!(err.message(), "Medication Aspirin is already stocked");
    }

    #[rstest]
    #[tokio::test]
    async fn invalid_drafts_never_reach_the_repository() {
        let mut inventory = MockInventoryStore::new();
        inventory.expect_find_by_name().times(0);
        let mut expired = draft("Aspirin");
        expired.expiry_date = fixed_now() - Duration::days(1);

        let err = service(inventory)
            .add_inventory_item(expired)
            .await
            .expect_err("already expired");

        assert_eq!(err.code(), ErrorCode::ValidationError);
    }

    #[rstest]
    #[tokio::test]
    async fn restock_adds_to_the_stored_quantity() {
        let item = stock("Aspirin", 4, fixed_now());
        let id = item.id().clone();
        let mut inventory = MockInventoryStore::new();
        inventory.expect_find_by_id().return_once(move |_| Ok(item));
        inventory
            .expect_update()
            .withf(|item| item.quantity() == 54)
            .returning(Ok);

        let restocked = service(inventory)
            .restock_item(&id, 50)
            .await
            .expect("restocked");

        assert!(!restocked.is_low_stock());
    }

    #[rstest]
    #[tokio::test]
    async fn restock_of_an_unknown_item_is_not_found() {
        let item = stock("Aspirin", 4, fixed_now());
        let mut inventory = MockInventoryStore::new();
        inventory
            .expect_find_by_id()
            .return_once(|id| Err(RepositoryError::not_found("InventoryItem", id.as_str())));

        let err = service(inventory)
            .restock_item(item.id(), 5)
            .await
            .expect_err("unknown id");

        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
