//! Driving port for invoicing and settlement.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    AppointmentId, DomainResult, InsuranceClaim, Invoice, InvoiceId, InvoiceLineItem, Money,
    PaymentMethod,
};

/// Request to bill an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInvoiceRequest {
    pub appointment_id: AppointmentId,
    /// Charges listed after the consultation line.
    #[serde(default)]
    pub additional_charges: Vec<InvoiceLineItem>,
    /// Days until due; the configured default applies when absent.
    pub due_in_days: Option<i64>,
    pub notes: Option<String>,
}

/// Request to record a payment against an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessPaymentRequest {
    pub invoice_id: InvoiceId,
    pub amount: Money,
    pub method: PaymentMethod,
    pub transaction_id: Option<String>,
    pub notes: Option<String>,
}

/// Request to attach an insurer's decision to an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddInsuranceClaimRequest {
    pub invoice_id: InvoiceId,
    pub claim: InsuranceClaim,
}

/// Driving port for billing write operations.
#[async_trait]
pub trait BillingCommand: Send + Sync {
    /// Issue an invoice whose first line is the doctor's consultation fee.
    async fn generate_invoice(&self, request: GenerateInvoiceRequest) -> DomainResult<Invoice>;

    async fn process_payment(&self, request: ProcessPaymentRequest) -> DomainResult<Invoice>;

    async fn add_insurance_claim(&self, request: AddInsuranceClaimRequest)
    -> DomainResult<Invoice>;

    async fn cancel_invoice(&self, id: &InvoiceId) -> DomainResult<Invoice>;
}
