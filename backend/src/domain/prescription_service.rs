//! Prescription services.
//!
//! Dispensing touches two aggregates. Every stock line is resolved and
//! checked before anything is written, the decrements are committed with a
//! single atomic batch update, and the prescription is written last. When the
//! prescription write fails the committed stock is returned.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    AppointmentRepository, CreatePrescriptionRequest, DispensePrescriptionRequest,
    InventoryRepository, PrescriptionCommand, PrescriptionRepository,
};
use crate::domain::service_support::bounded;
use crate::domain::{
    AppointmentStatus, DomainError, DomainResult, Entity, InventoryItem, Prescription,
    PrescriptionDraft, PrescriptionId, ServicePolicy,
};

/// Prescription service implementing the prescription driving port.
#[derive(Clone)]
pub struct PrescriptionService<R, A, I> {
    prescriptions: Arc<R>,
    appointments: Arc<A>,
    inventory: Arc<I>,
    clock: Arc<dyn Clock>,
    policy: ServicePolicy,
}

impl<R, A, I> PrescriptionService<R, A, I> {
    pub fn new(
        prescriptions: Arc<R>,
        appointments: Arc<A>,
        inventory: Arc<I>,
        clock: Arc<dyn Clock>,
        policy: ServicePolicy,
    ) -> Self {
        Self {
            prescriptions,
            appointments,
            inventory,
            clock,
            policy,
        }
    }
}

impl<R, A, I> PrescriptionService<R, A, I>
where
    R: PrescriptionRepository,
    I: InventoryRepository,
{
    async fn load(&self, id: &PrescriptionId) -> DomainResult<Prescription> {
        bounded(
            &self.policy,
            "prescriptions.find_by_id",
            self.prescriptions.find_by_id(id),
        )
        .await
    }

    /// Resolve every medicine to a stock item and compute its decrement.
    ///
    /// Returns the decremented items paired with the quantity taken from each.
    async fn plan_decrements(
        &self,
        prescription: &Prescription,
        now: DateTime<Utc>,
    ) -> DomainResult<Vec<(InventoryItem, u32)>> {
        let mut plan = Vec::new();
        for line in prescription.demand() {
            let item = bounded(
                &self.policy,
                "inventory.find_by_name",
                self.inventory.find_by_name(&line.name),
            )
            .await?
            .ok_or_else(|| DomainError::not_found(InventoryItem::NAME, line.name.as_str()))?;
            if item.quantity() < line.quantity {
                return Err(DomainError::business_rule(format!(
                    "Insufficient stock for {}. Required: {}, Available: {}",
                    line.name,
                    line.quantity,
                    item.quantity()
                )));
            }
            plan.push((item.dispense(line.quantity, now)?, line.quantity));
        }
        Ok(plan)
    }

    /// Give back stock committed for a prescription whose write failed.
    async fn return_stock(
        &self,
        committed: &[InventoryItem],
        taken: &[u32],
        now: DateTime<Utc>,
    ) {
        let restocked = committed
            .iter()
            .zip(taken)
            .map(|(item, quantity)| item.restock(*quantity, now))
            .collect::<DomainResult<Vec<_>>>();
        let outcome = match restocked {
            Ok(items) => bounded(
                &self.policy,
                "inventory.update_all",
                self.inventory.update_all(items),
            )
            .await
            .map(drop),
            Err(error) => Err(error),
        };
        if let Err(error) = outcome {
            warn!(%error, "stock could not be returned after a failed dispense");
        }
    }
}

#[async_trait]
impl<R, A, I> PrescriptionCommand for PrescriptionService<R, A, I>
where
    R: PrescriptionRepository,
    A: AppointmentRepository,
    I: InventoryRepository,
{
    async fn create_prescription(
        &self,
        request: CreatePrescriptionRequest,
    ) -> DomainResult<Prescription> {
        let now = self.clock.utc();
        let appointment = bounded(
            &self.policy,
            "appointments.find_by_id",
            self.appointments.find_by_id(&request.appointment_id),
        )
        .await?;
        if appointment.status() != AppointmentStatus::Completed {
            return Err(DomainError::business_rule(
                "Cannot create prescription for an appointment that is not completed",
            ));
        }
        if appointment.patient_id() != &request.patient_id {
            return Err(DomainError::business_rule(
                "Prescription patient does not match the appointment",
            ));
        }
        if appointment.doctor_id() != &request.doctor_id {
            return Err(DomainError::business_rule(
                "Prescribing doctor does not match the appointment",
            ));
        }

        let prescription = Prescription::create(
            PrescriptionDraft {
                patient_id: request.patient_id,
                doctor_id: request.doctor_id,
                appointment_id: request.appointment_id,
                medications: request.medications,
                validity_days: request
                    .validity_days
                    .unwrap_or(self.policy.prescription_validity_days),
                notes: request.notes,
            },
            now,
        )?;
        let saved = bounded(
            &self.policy,
            "prescriptions.save",
            self.prescriptions.save(prescription),
        )
        .await?;
        info!(
            prescription_id = %saved.id(),
            appointment_id = %saved.appointment_id(),
            "prescription created"
        );
        Ok(saved)
    }

    async fn dispense_prescription(
        &self,
        request: DispensePrescriptionRequest,
    ) -> DomainResult<Prescription> {
        let now = self.clock.utc();
        let prescription = self.load(&request.prescription_id).await?;
        let dispensed = prescription.dispense(request.pharmacist_id, now)?;

        let (decremented, taken): (Vec<_>, Vec<_>) =
            self.plan_decrements(&prescription, now).await?.into_iter().unzip();
        let committed = bounded(
            &self.policy,
            "inventory.update_all",
            self.inventory.update_all(decremented),
        )
        .await?;

        match bounded(
            &self.policy,
            "prescriptions.update",
            self.prescriptions.update(dispensed),
        )
        .await
        {
            Ok(stored) => {
                info!(
                    prescription_id = %stored.id(),
                    lines = committed.len(),
                    "prescription dispensed"
                );
                Ok(stored)
            }
            Err(error) => {
                self.return_stock(&committed, &taken, now).await;
                Err(error)
            }
        }
    }

    async fn cancel_prescription(&self, id: &PrescriptionId) -> DomainResult<Prescription> {
        let cancelled = self.load(id).await?.cancel(self.clock.utc())?;
        bounded(
            &self.policy,
            "prescriptions.update",
            self.prescriptions.update(cancelled),
        )
        .await
    }
}

#[cfg(test)]
#[path = "prescription_service_tests.rs"]
mod tests;
