//! Driving ports for patient registration and profile maintenance.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::{DomainResult, Patient, PatientDraft, PatientId, PatientProfileUpdate, User};

/// Request to open a patient account.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterPatientRequest {
    pub patient: PatientDraft,
    pub password: String,
}

impl fmt::Debug for RegisterPatientRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterPatientRequest")
            .field("patient", &self.patient)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login account and patient record created together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredPatient {
    pub user: User,
    pub patient: Patient,
}

/// Request to change the mutable parts of a patient profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientProfileRequest {
    pub patient_id: PatientId,
    pub update: PatientProfileUpdate,
}

/// Driving port for patient write operations.
#[async_trait]
pub trait PatientCommand: Send + Sync {
    /// Create the login account and the patient record.
    ///
    /// Fails with `Conflict` when the email is already registered. The
    /// password and patient details are validated before anything is
    /// written; when the patient write fails the new account is removed.
    async fn register_patient(
        &self,
        request: RegisterPatientRequest,
    ) -> DomainResult<RegisteredPatient>;

    async fn update_patient_profile(
        &self,
        request: UpdatePatientProfileRequest,
    ) -> DomainResult<Patient>;
}

/// Driving port for patient reads.
#[async_trait]
pub trait PatientQuery: Send + Sync {
    async fn get_patient_profile(&self, patient_id: &PatientId) -> DomainResult<Patient>;
}
