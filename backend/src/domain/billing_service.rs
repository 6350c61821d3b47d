//! Invoicing and payment services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::ports::{
    AddInsuranceClaimRequest, AppointmentRepository, BillingCommand, DoctorRepository,
    GenerateInvoiceRequest, InvoiceRepository, ProcessPaymentRequest,
};
use crate::domain::service_support::bounded;
use crate::domain::{
    DomainResult, Invoice, InvoiceDraft, InvoiceId, InvoiceLineItem, Payment, ServicePolicy,
};

/// Billing service implementing the billing driving port.
#[derive(Clone)]
pub struct BillingService<V, A, D> {
    invoices: Arc<V>,
    appointments: Arc<A>,
    doctors: Arc<D>,
    clock: Arc<dyn Clock>,
    policy: ServicePolicy,
}

impl<V, A, D> BillingService<V, A, D> {
    pub fn new(
        invoices: Arc<V>,
        appointments: Arc<A>,
        doctors: Arc<D>,
        clock: Arc<dyn Clock>,
        policy: ServicePolicy,
    ) -> Self {
        Self {
            invoices,
            appointments,
            doctors,
            clock,
            policy,
        }
    }
}

impl<V, A, D> BillingService<V, A, D>
where
    V: InvoiceRepository,
{
    async fn load(&self, id: &InvoiceId) -> DomainResult<Invoice> {
        bounded(&self.policy, "invoices.find_by_id", self.invoices.find_by_id(id)).await
    }

    async fn store(&self, invoice: Invoice) -> DomainResult<Invoice> {
        let stored = bounded(&self.policy, "invoices.update", self.invoices.update(invoice)).await?;
        debug!(invoice_id = %stored.id(), status = ?stored.status(), "invoice updated");
        Ok(stored)
    }
}

#[async_trait]
impl<V, A, D> BillingCommand for BillingService<V, A, D>
where
    V: InvoiceRepository,
    A: AppointmentRepository,
    D: DoctorRepository,
{
    async fn generate_invoice(&self, request: GenerateInvoiceRequest) -> DomainResult<Invoice> {
        let now = self.clock.utc();
        let appointment = bounded(
            &self.policy,
            "appointments.find_by_id",
            self.appointments.find_by_id(&request.appointment_id),
        )
        .await?;
        let doctor = bounded(
            &self.policy,
            "doctors.find_by_id",
            self.doctors.find_by_id(appointment.doctor_id()),
        )
        .await?;

        let consultation = InvoiceLineItem::without_discount(
            format!("Consultation - {}", doctor.full_name()),
            1,
            doctor.consultation_fee(),
        )?;
        let mut line_items = Vec::with_capacity(1 + request.additional_charges.len());
        line_items.push(consultation);
        line_items.extend(request.additional_charges);

        let invoice = Invoice::create(
            InvoiceDraft {
                patient_id: appointment.patient_id().clone(),
                appointment_id: Some(request.appointment_id),
                line_items,
                due_in_days: request.due_in_days.unwrap_or(self.policy.invoice_due_days),
                notes: request.notes,
            },
            now,
        )?;
        let saved = bounded(&self.policy, "invoices.save", self.invoices.save(invoice)).await?;
        info!(
            invoice_id = %saved.id(),
            patient_id = %saved.patient_id(),
            total = %saved.total_amount(),
            "invoice generated"
        );
        Ok(saved)
    }

    async fn process_payment(&self, request: ProcessPaymentRequest) -> DomainResult<Invoice> {
        let now = self.clock.utc();
        let invoice = self.load(&request.invoice_id).await?;
        let payment = Payment::new(
            request.amount,
            request.method,
            request.transaction_id,
            request.notes,
            now,
        )?;
        let settled = invoice.add_payment(payment, now)?;
        let stored = self.store(settled).await?;
        info!(
            invoice_id = %stored.id(),
            amount = %request.amount,
            outstanding = %stored.outstanding_balance(),
            "payment recorded"
        );
        Ok(stored)
    }

    async fn add_insurance_claim(
        &self,
        request: AddInsuranceClaimRequest,
    ) -> DomainResult<Invoice> {
        let claimed = self
            .load(&request.invoice_id)
            .await?
            .add_insurance_claim(request.claim, self.clock.utc())?;
        self.store(claimed).await
    }

    async fn cancel_invoice(&self, id: &InvoiceId) -> DomainResult<Invoice> {
        let cancelled = self.load(id).await?.cancel(self.clock.utc())?;
        self.store(cancelled).await
    }
}

#[cfg(test)]
#[path = "billing_service_tests.rs"]
mod tests;
