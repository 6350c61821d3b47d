//! Driving port for prescribing and dispensing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    AppointmentId, DoctorId, DomainResult, Medication, PatientId, Prescription, PrescriptionId,
    UserId,
};

/// Request to prescribe medicines after a completed appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrescriptionRequest {
    pub appointment_id: AppointmentId,
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub medications: Vec<Medication>,
    /// Days of validity; the configured default applies when absent.
    pub validity_days: Option<u32>,
    pub notes: Option<String>,
}

/// Request to hand a prescription's medicines over the counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispensePrescriptionRequest {
    pub prescription_id: PrescriptionId,
    pub pharmacist_id: UserId,
}

/// Driving port for prescription write operations.
#[async_trait]
pub trait PrescriptionCommand: Send + Sync {
    async fn create_prescription(
        &self,
        request: CreatePrescriptionRequest,
    ) -> DomainResult<Prescription>;

    /// Decrement stock for every medication and mark the prescription
    /// dispensed.
    ///
    /// Every stock line is checked before any is written: a shortage on one
    /// medication leaves all stock untouched and the prescription pending.
    async fn dispense_prescription(
        &self,
        request: DispensePrescriptionRequest,
    ) -> DomainResult<Prescription>;

    async fn cancel_prescription(&self, id: &PrescriptionId) -> DomainResult<Prescription>;
}
