//! Persistence contract shared by every stored entity.

use async_trait::async_trait;

use crate::domain::Entity;

use super::define_port_error;

define_port_error! {
    /// Errors raised by repository adapters.
    pub enum RepositoryError {
        /// No record exists for the identity.
        NotFound { entity: String, id: String } => "{entity} with id {id} not found",
        /// Duplicate identity, stale revision or uniqueness breach.
        Conflict { message: String } => "{message}",
        /// Backing store could not be reached.
        Connection { message: String } => "repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "repository query failed: {message}",
    }
}

impl RepositoryError {
    /// Not-found error naming the entity kind and identity.
    pub fn missing<E: Entity>(id: &E::Id) -> Self {
        Self::not_found(E::NAME, id.to_string())
    }

    /// Conflict raised when the caller's revision no longer matches storage.
    pub fn stale<E: Entity>(entity: &E, stored_revision: u32) -> Self {
        Self::conflict(format!(
            "{} with id {} was modified concurrently (expected revision {}, found {})",
            E::NAME,
            entity.id(),
            entity.revision(),
            stored_revision
        ))
    }
}

/// Generic CRUD contract over one entity type.
///
/// `update` is optimistic: the stored revision must equal the revision of the
/// record passed in, and the stored copy receives the next revision.
#[async_trait]
pub trait Repository: Send + Sync {
    type Entity: crate::domain::Entity<Id = Self::Id>;
    type Id: Clone + Eq + std::hash::Hash + std::fmt::Display + Send + Sync + 'static;

    /// Fetch one record; `NotFound` when absent.
    async fn find_by_id(&self, id: &Self::Id) -> Result<Self::Entity, RepositoryError>;

    /// Insert a new record; `Conflict` when the identity is taken.
    async fn save(&self, entity: Self::Entity) -> Result<Self::Entity, RepositoryError>;

    /// Replace an existing record; `NotFound` when absent, `Conflict` when
    /// stale.
    async fn update(&self, entity: Self::Entity) -> Result<Self::Entity, RepositoryError>;

    /// Remove a record, reporting whether it existed.
    async fn delete(&self, id: &Self::Id) -> Result<bool, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Self::Entity>, RepositoryError>;
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.

    use chrono::Utc;
    use rstest::rstest;

    use super::*;
    use crate::domain::{Currency, InventoryItem, InventoryItemDraft, InventoryItemId, Money};

    fn item() -> InventoryItem {
        let now = Utc::now();
        InventoryItem::create(
            InventoryItemDraft {
                medication_name: "Amoxicillin".into(),
                generic_name: "Amoxicillin".into(),
                manufacturer: "Pharco".into(),
                batch_number: "B-1".into(),
                expiry_date: now + chrono::Duration::days(90),
                quantity: 10,
                unit_price: Money::from_units(5, Currency::Egp),
                reorder_level: 2,
                location: "Shelf A".into(),
            },
            now,
        )
        .expect("valid item")
    }

    #[rstest]
    fn missing_names_the_entity() {
        let id = InventoryItemId::new("ITM42").expect("valid id");
        let err = RepositoryError::missing::<InventoryItem>(&id);
        assert_eq!(err.to_string(), "InventoryItem with id ITM42 not found");
        assert!(err.is_not_found());
    }

    #[rstest]
    fn stale_reports_both_revisions() {
        let stock = item();
        let err = RepositoryError::stale(&stock, 4);
        assert!(err.is_conflict());
        assert!(err.to_string().contains("expected revision 1, found 4"));
    }
}
