//! Patient registration and profile services.
//!
//! Registration writes two records (the login account, then the patient).
//! Everything that can be validated is validated before the first write, and
//! a failed patient write removes the account again.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::ports::{
    PatientCommand, PatientQuery, PatientRepository, RegisterPatientRequest, RegisteredPatient,
    UpdatePatientProfileRequest, UserRepository,
};
use crate::domain::service_support::bounded;
use crate::domain::{
    DomainError, DomainResult, Patient, PatientId, ServicePolicy, User, UserRole,
};

/// Patient service implementing the patient driving ports.
#[derive(Clone)]
pub struct PatientService<U, P> {
    users: Arc<U>,
    patients: Arc<P>,
    clock: Arc<dyn Clock>,
    policy: ServicePolicy,
}

impl<U, P> PatientService<U, P> {
    pub fn new(
        users: Arc<U>,
        patients: Arc<P>,
        clock: Arc<dyn Clock>,
        policy: ServicePolicy,
    ) -> Self {
        Self {
            users,
            patients,
            clock,
            policy,
        }
    }
}

#[async_trait]
impl<U, P> PatientCommand for PatientService<U, P>
where
    U: UserRepository,
    P: PatientRepository,
{
    async fn register_patient(
        &self,
        request: RegisterPatientRequest,
    ) -> DomainResult<RegisteredPatient> {
        let RegisterPatientRequest {
            patient: draft,
            password,
        } = request;
        let now = self.clock.utc();

        let existing = bounded(
            &self.policy,
            "users.find_by_email",
            self.users.find_by_email(&draft.email),
        )
        .await?;
        if existing.is_some() {
            return Err(DomainError::conflict(format!(
                "User with email {} already exists",
                draft.email
            )));
        }

        let user = User::create(draft.email.clone(), &password, UserRole::Patient, now)?;
        let patient = Patient::register(draft, user.id().clone(), now)?;

        let user = bounded(&self.policy, "users.save", self.users.save(user)).await?;
        match bounded(&self.policy, "patients.save", self.patients.save(patient)).await {
            Ok(patient) => {
                info!(patient_id = %patient.id(), user_id = %user.id(), "patient registered");
                Ok(RegisteredPatient { user, patient })
            }
            Err(error) => {
                let rollback =
                    bounded(&self.policy, "users.delete", self.users.delete(user.id())).await;
                if let Err(rollback_error) = rollback {
                    warn!(
                        user_id = %user.id(),
                        error = %rollback_error,
                        "orphaned user left behind after failed patient write"
                    );
                }
                Err(error)
            }
        }
    }

    async fn update_patient_profile(
        &self,
        request: UpdatePatientProfileRequest,
    ) -> DomainResult<Patient> {
        let current = bounded(
            &self.policy,
            "patients.find_by_id",
            self.patients.find_by_id(&request.patient_id),
        )
        .await?;
        let updated = current.update_profile(request.update, self.clock.utc());
        bounded(&self.policy, "patients.update", self.patients.update(updated)).await
    }
}

#[async_trait]
impl<U, P> PatientQuery for PatientService<U, P>
where
    U: UserRepository,
    P: PatientRepository,
{
    async fn get_patient_profile(&self, patient_id: &PatientId) -> DomainResult<Patient> {
        bounded(
            &self.policy,
            "patients.find_by_id",
            self.patients.find_by_id(patient_id),
        )
        .await
    }
}

#[cfg(test)]
#[path = "patient_service_tests.rs"]
mod tests;
