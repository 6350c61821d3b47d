//! Pharmacy stock.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity::impl_entity;
use super::{Audit, DomainError, DomainResult, InventoryItemId, Money, Validator};

/// Input payload for [`InventoryItem::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemDraft {
    pub medication_name: String,
    pub generic_name: String,
    pub manufacturer: String,
    pub batch_number: String,
    pub expiry_date: DateTime<Utc>,
    pub quantity: u32,
    pub unit_price: Money,
    pub reorder_level: u32,
    pub location: String,
}

/// One batch of a medicine held by the pharmacy.
///
/// ## Invariants
/// - `quantity` never goes below zero; dispensing more than is held fails.
/// - `reorder_level` is strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    id: InventoryItemId,
    medication_name: String,
    generic_name: String,
    manufacturer: String,
    batch_number: String,
    expiry_date: DateTime<Utc>,
    quantity: u32,
    unit_price: Money,
    reorder_level: u32,
    location: String,
    audit: Audit,
}

impl_entity!(InventoryItem, InventoryItemId, "InventoryItem");

impl InventoryItem {
    pub fn create(draft: InventoryItemDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let item = Self {
            id: InventoryItemId::generate(now),
            medication_name: draft.medication_name.trim().to_owned(),
            generic_name: draft.generic_name,
            manufacturer: draft.manufacturer,
            batch_number: draft.batch_number,
            expiry_date: draft.expiry_date,
            quantity: draft.quantity,
            unit_price: draft.unit_price,
            reorder_level: draft.reorder_level,
            location: draft.location,
            audit: Audit::new(now),
        };

        Validator::new()
            .field_rule("medicationName", "Medication name is required", |i: &Self| {
                !i.medication_name.is_empty()
            })
            .field_rule("reorderLevel", "Reorder level must be positive", |i: &Self| {
                i.reorder_level > 0
            })
            .field_rule(
                "expiryDate",
                "Expiry date must be in the future",
                move |i: &Self| i.expiry_date > now,
            )
            .validate(item)
    }

    pub fn id(&self) -> &InventoryItemId {
        &self.id
    }
    pub fn medication_name(&self) -> &str {
        &self.medication_name
    }
    pub fn generic_name(&self) -> &str {
        &self.generic_name
    }
    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }
    pub fn batch_number(&self) -> &str {
        &self.batch_number
    }
    pub fn expiry_date(&self) -> DateTime<Utc> {
        self.expiry_date
    }
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }
    pub fn reorder_level(&self) -> u32 {
        self.reorder_level
    }
    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expiry_date
    }

    /// Not yet expired but expiring within `days` of `now`.
    ///
    /// A horizon past the end of the calendar covers every later expiry.
    pub fn expires_within(&self, days: u32, now: DateTime<Utc>) -> bool {
        let within_horizon = now
            .checked_add_signed(Duration::days(i64::from(days)))
            .is_none_or(|horizon| self.expiry_date <= horizon);
        now <= self.expiry_date && within_horizon
    }

    pub fn needs_reorder(&self) -> bool {
        self.quantity <= self.reorder_level
    }

    /// Quantity at or below one and a half times the reorder level.
    pub fn is_low_stock(&self) -> bool {
        u64::from(self.quantity) <= u64::from(self.reorder_level) * 3 / 2
    }

    /// Case-insensitive search over brand, generic and manufacturer names.
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        [&self.medication_name, &self.generic_name, &self.manufacturer]
            .iter()
            .any(|field| field.to_lowercase().contains(&query))
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.medication_name.eq_ignore_ascii_case(name.trim())
    }

    /// Value of the units on hand.
    pub fn stock_value(&self) -> DomainResult<Money> {
        self.unit_price.times(Decimal::from(self.quantity))
    }

    /// Remove `requested` units.
    pub fn dispense(&self, requested: u32, now: DateTime<Utc>) -> DomainResult<Self> {
        if requested == 0 {
            return Err(DomainError::invalid_field(
                "quantity",
                "Dispense quantity must be positive",
            ));
        }
        if self.is_expired(now) {
            return Err(DomainError::business_rule(
                "Cannot dispense expired medication",
            ));
        }
        if requested > self.quantity {
            return Err(DomainError::business_rule(format!(
                "Insufficient stock. Available: {}, Requested: {requested}",
                self.quantity
            )));
        }
        Ok(Self {
            quantity: self.quantity - requested,
            audit: self.audit.touched(now),
            ..self.clone()
        })
    }

    /// Add `additional` units.
    pub fn restock(&self, additional: u32, now: DateTime<Utc>) -> DomainResult<Self> {
        if additional == 0 {
            return Err(DomainError::invalid_field(
                "quantity",
                "Restock quantity must be positive",
            ));
        }
        let quantity = self.quantity.checked_add(additional).ok_or_else(|| {
            DomainError::invalid_field("quantity", "Restock quantity exceeds capacity")
        })?;
        Ok(Self {
            quantity,
            audit: self.audit.touched(now),
            ..self.clone()
        })
    }
}
