//! Invoices and their settlement.
//!
//! Every amount on one invoice shares the invoice currency, which is taken
//! from its first line item. Derived totals are recomputed from the line
//! items, payments and claim on every read.

mod billing;

pub use billing::{InsuranceClaim, InsuranceClaimStatus, InvoiceLineItem, Payment, PaymentMethod};

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity::impl_entity;
use super::{
    AppointmentId, Audit, Currency, DomainError, DomainResult, InvoiceId, Money, PatientId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Pending,
    PartiallyPaid,
    Paid,
    Cancelled,
}

impl InvoiceStatus {
    /// Still expecting money.
    pub const fn is_open(self) -> bool {
        !matches!(self, Self::Paid | Self::Cancelled)
    }
}

/// Input payload for [`Invoice::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDraft {
    pub patient_id: PatientId,
    pub appointment_id: Option<AppointmentId>,
    pub line_items: Vec<InvoiceLineItem>,
    pub due_in_days: i64,
    pub notes: Option<String>,
}

/// Bill issued to a patient.
///
/// ## Invariants
/// - At least one line item.
/// - `outstanding_balance` is never negative; payments never exceed it.
/// - At most one insurance claim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    id: InvoiceId,
    patient_id: PatientId,
    appointment_id: Option<AppointmentId>,
    currency: Currency,
    line_items: Vec<InvoiceLineItem>,
    status: InvoiceStatus,
    payments: Vec<Payment>,
    insurance_claim: Option<InsuranceClaim>,
    due_date: DateTime<Utc>,
    notes: Option<String>,
    audit: Audit,
}

impl_entity!(Invoice, InvoiceId, "Invoice");

impl Invoice {
    pub fn create(draft: InvoiceDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        let Some(first) = draft.line_items.first() else {
            return Err(DomainError::invalid_field(
                "lineItems",
                "Invoice must have at least one line item.",
            ));
        };
        if draft.due_in_days <= 0 {
            return Err(DomainError::invalid_field(
                "dueInDays",
                "Due in days must be a positive integer.",
            ));
        }
        let currency = first.unit_price().currency();
        if let Some(stray) = draft
            .line_items
            .iter()
            .find(|item| item.unit_price().currency() != currency)
        {
            return Err(DomainError::invalid_field(
                "currency",
                format!(
                    "Line item {:?} is priced in {} but the invoice is in {currency}",
                    stray.description(),
                    stray.unit_price().currency()
                ),
            ));
        }
        let due_date = Duration::try_days(draft.due_in_days)
            .and_then(|offset| now.checked_add_signed(offset))
            .ok_or_else(|| {
                DomainError::invalid_field("dueInDays", "Due in days is out of range.")
            })?;

        Ok(Self {
            id: InvoiceId::generate(now),
            patient_id: draft.patient_id,
            appointment_id: draft.appointment_id,
            currency,
            line_items: draft.line_items,
            status: InvoiceStatus::Pending,
            payments: Vec::new(),
            insurance_claim: None,
            due_date,
            notes: draft.notes,
            audit: Audit::new(now),
        })
    }

    pub fn id(&self) -> &InvoiceId {
        &self.id
    }
    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }
    pub fn appointment_id(&self) -> Option<&AppointmentId> {
        self.appointment_id.as_ref()
    }
    pub fn currency(&self) -> Currency {
        self.currency
    }
    pub fn line_items(&self) -> &[InvoiceLineItem] {
        &self.line_items
    }
    pub fn status(&self) -> InvoiceStatus {
        self.status
    }
    pub fn payments(&self) -> &[Payment] {
        &self.payments
    }
    pub fn insurance_claim(&self) -> Option<&InsuranceClaim> {
        self.insurance_claim.as_ref()
    }
    pub fn due_date(&self) -> DateTime<Utc> {
        self.due_date
    }
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
    pub fn created_at(&self) -> DateTime<Utc> {
        self.audit.created_at
    }

    fn money(&self, amount: Decimal) -> Money {
        Money::from_non_negative(amount, self.currency)
    }

    pub fn subtotal(&self) -> Money {
        self.money(self.line_items.iter().map(|i| i.subtotal().amount()).sum())
    }

    pub fn total_discount(&self) -> Money {
        self.money(
            self.line_items
                .iter()
                .map(|i| i.discount_amount().amount())
                .sum(),
        )
    }

    pub fn total_amount(&self) -> Money {
        self.money(self.line_items.iter().map(|i| i.total().amount()).sum())
    }

    pub fn total_paid(&self) -> Money {
        self.money(self.payments.iter().map(|p| p.amount().amount()).sum())
    }

    pub fn insurance_coverage(&self) -> Money {
        self.insurance_claim
            .as_ref()
            .map_or_else(|| self.money(Decimal::ZERO), |claim| claim.approved_amount)
    }

    /// Total less payments and insurance coverage, floored at zero.
    pub fn outstanding_balance(&self) -> Money {
        let covered = self.total_paid().amount() + self.insurance_coverage().amount();
        let total = self.total_amount().amount();
        self.money(if total > covered {
            total - covered
        } else {
            Decimal::ZERO
        })
    }

    pub fn is_fully_paid(&self) -> bool {
        self.outstanding_balance().is_zero()
    }

    /// PENDING past its due date.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.status == InvoiceStatus::Pending && now > self.due_date
    }

    fn ensure_currency(&self, amount: &Money, field: &str) -> DomainResult<()> {
        if amount.currency() == self.currency {
            Ok(())
        } else {
            Err(DomainError::invalid_field(
                field,
                format!(
                    "Invoice is in {} but {field} is in {}",
                    self.currency,
                    amount.currency()
                ),
            ))
        }
    }

    pub fn add_payment(&self, payment: Payment, now: DateTime<Utc>) -> DomainResult<Self> {
        if self.status == InvoiceStatus::Cancelled {
            return Err(DomainError::business_rule(
                "Cannot add payment to a cancelled invoice.",
            ));
        }
        self.ensure_currency(&payment.amount(), "payment")?;

        let outstanding = self.outstanding_balance();
        let remaining = outstanding.minus(&payment.amount()).map_err(|_| {
            DomainError::business_rule(format!(
                "Payment amount exceeds outstanding balance. Outstanding: {}, Payment: {}",
                outstanding.amount().normalize(),
                payment.amount().amount().normalize()
            ))
        })?;

        let status = if remaining.is_zero() {
            InvoiceStatus::Paid
        } else {
            InvoiceStatus::PartiallyPaid
        };
        let mut payments = self.payments.clone();
        payments.push(payment);

        Ok(Self {
            payments,
            status,
            audit: self.audit.touched(now),
            ..self.clone()
        })
    }

    pub fn add_insurance_claim(
        &self,
        claim: InsuranceClaim,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if self.insurance_claim.is_some() {
            return Err(DomainError::business_rule(
                "Insurance claim already exists for this invoice.",
            ));
        }
        self.ensure_currency(&claim.approved_amount, "claim")?;
        Ok(Self {
            insurance_claim: Some(claim),
            audit: self.audit.touched(now),
            ..self.clone()
        })
    }

    pub fn cancel(&self, now: DateTime<Utc>) -> DomainResult<Self> {
        if self.status == InvoiceStatus::Paid {
            return Err(DomainError::business_rule("Cannot cancel a paid invoice."));
        }
        Ok(Self {
            status: InvoiceStatus::Cancelled,
            audit: self.audit.touched(now),
            ..self.clone()
        })
    }
}
