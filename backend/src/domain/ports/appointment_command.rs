//! Driving ports for the appointment lifecycle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{
    Appointment, AppointmentDraft, AppointmentId, AppointmentStatus, DomainResult, PatientId,
    PrescriptionId,
};

/// Request to close an in-progress appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteAppointmentRequest {
    pub appointment_id: AppointmentId,
    pub diagnosis: String,
    pub prescription_id: Option<PrescriptionId>,
    pub notes: Option<String>,
}

/// Request to cancel an appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAppointmentRequest {
    pub appointment_id: AppointmentId,
    pub reason: String,
}

/// Filter for a patient's appointment list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientAppointmentsRequest {
    pub patient_id: PatientId,
    /// Only pending appointments scheduled after now, soonest first.
    #[serde(default)]
    pub upcoming_only: bool,
    /// Keep only these statuses; empty keeps all.
    #[serde(default)]
    pub statuses: Vec<AppointmentStatus>,
}

/// Driving port for appointment write operations.
#[async_trait]
pub trait AppointmentCommand: Send + Sync {
    /// Book a slot with a doctor.
    ///
    /// The patient and doctor must exist and the doctor must have no other
    /// slot-holding appointment covering the requested time.
    async fn schedule_appointment(&self, draft: AppointmentDraft) -> DomainResult<Appointment>;

    async fn confirm_appointment(&self, id: &AppointmentId) -> DomainResult<Appointment>;

    async fn start_appointment(&self, id: &AppointmentId) -> DomainResult<Appointment>;

    async fn complete_appointment(
        &self,
        request: CompleteAppointmentRequest,
    ) -> DomainResult<Appointment>;

    async fn cancel_appointment(
        &self,
        request: CancelAppointmentRequest,
    ) -> DomainResult<Appointment>;

    /// Record that the patient did not attend once the slot has ended.
    async fn mark_no_show(&self, id: &AppointmentId) -> DomainResult<Appointment>;
}

/// Driving port for appointment reads.
#[async_trait]
pub trait AppointmentQuery: Send + Sync {
    async fn patient_appointments(
        &self,
        request: PatientAppointmentsRequest,
    ) -> DomainResult<Vec<Appointment>>;
}
