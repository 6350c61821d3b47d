//! Line items, payments and insurance claims attached to an invoice.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainError, DomainResult, Money, PaymentId};

/// One billable charge.
///
/// ## Invariants
/// - `quantity` is strictly positive.
/// - `discount_percent` lies in `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "InvoiceLineItemDraft")]
pub struct InvoiceLineItem {
    description: String,
    quantity: u32,
    unit_price: Money,
    discount_percent: Decimal,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InvoiceLineItemDraft {
    description: String,
    quantity: u32,
    unit_price: Money,
    #[serde(default)]
    discount_percent: Decimal,
}

impl TryFrom<InvoiceLineItemDraft> for InvoiceLineItem {
    type Error = DomainError;

    fn try_from(draft: InvoiceLineItemDraft) -> Result<Self, Self::Error> {
        Self::new(
            draft.description,
            draft.quantity,
            draft.unit_price,
            draft.discount_percent,
        )
    }
}

impl InvoiceLineItem {
    pub fn new(
        description: impl Into<String>,
        quantity: u32,
        unit_price: Money,
        discount_percent: Decimal,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::invalid_field(
                "quantity",
                "Quantity must be positive",
            ));
        }
        if discount_percent < Decimal::ZERO || discount_percent > Decimal::ONE_HUNDRED {
            return Err(DomainError::invalid_field(
                "discount",
                "Discount must be from 0 to 100",
            ));
        }
        Ok(Self {
            description: description.into(),
            quantity,
            unit_price,
            discount_percent,
        })
    }

    /// Undiscounted charge.
    pub fn without_discount(
        description: impl Into<String>,
        quantity: u32,
        unit_price: Money,
    ) -> DomainResult<Self> {
        Self::new(description, quantity, unit_price, Decimal::ZERO)
    }

    pub fn description(&self) -> &str {
        &self.description
    }
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
    pub fn unit_price(&self) -> Money {
        self.unit_price
    }
    pub fn discount_percent(&self) -> Decimal {
        self.discount_percent
    }

    /// `unit_price × quantity`.
    pub fn subtotal(&self) -> Money {
        Money::from_non_negative(
            self.unit_price.amount() * Decimal::from(self.quantity),
            self.unit_price.currency(),
        )
    }

    pub fn discount_amount(&self) -> Money {
        Money::from_non_negative(
            self.subtotal().amount() * self.discount_percent / Decimal::ONE_HUNDRED,
            self.unit_price.currency(),
        )
    }

    /// Subtotal less discount; never negative because the discount is capped at 100 %.
    pub fn total(&self) -> Money {
        Money::from_non_negative(
            self.subtotal().amount() - self.discount_amount().amount(),
            self.unit_price.currency(),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Cash,
    CreditCard,
    Insurance,
    BankTransfer,
}

/// Money received against an invoice.
///
/// ## Invariants
/// - `amount` is strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "PaymentRecord")]
pub struct Payment {
    id: PaymentId,
    amount: Money,
    method: PaymentMethod,
    transaction_id: Option<String>,
    paid_at: DateTime<Utc>,
    notes: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct PaymentRecord {
    id: PaymentId,
    amount: Money,
    method: PaymentMethod,
    transaction_id: Option<String>,
    paid_at: DateTime<Utc>,
    notes: Option<String>,
}

impl TryFrom<PaymentRecord> for Payment {
    type Error = DomainError;

    fn try_from(record: PaymentRecord) -> Result<Self, Self::Error> {
        ensure_positive(&record.amount)?;
        Ok(Self {
            id: record.id,
            amount: record.amount,
            method: record.method,
            transaction_id: record.transaction_id,
            paid_at: record.paid_at,
            notes: record.notes,
        })
    }
}

fn ensure_positive(amount: &Money) -> DomainResult<()> {
    if amount.amount() > Decimal::ZERO {
        Ok(())
    } else {
        Err(DomainError::invalid_field(
            "amount",
            "Payment amount must be positive",
        ))
    }
}

impl Payment {
    pub fn new(
        amount: Money,
        method: PaymentMethod,
        transaction_id: Option<String>,
        notes: Option<String>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        ensure_positive(&amount)?;
        Ok(Self {
            id: PaymentId::generate(now),
            amount,
            method,
            transaction_id,
            paid_at: now,
            notes,
        })
    }

    pub fn id(&self) -> &PaymentId {
        &self.id
    }
    pub fn amount(&self) -> Money {
        self.amount
    }
    pub fn method(&self) -> PaymentMethod {
        self.method
    }
    pub fn transaction_id(&self) -> Option<&str> {
        self.transaction_id.as_deref()
    }
    pub fn paid_at(&self) -> DateTime<Utc> {
        self.paid_at
    }
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsuranceClaimStatus {
    Submitted,
    UnderReview,
    Approved,
    Rejected,
    PartiallyApproved,
}

/// Insurer's settlement of part of an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceClaim {
    pub claim_number: String,
    pub approved_amount: Money,
    pub submitted_at: DateTime<Utc>,
    pub status: InsuranceClaimStatus,
}
