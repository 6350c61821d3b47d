//! Port for prescription persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{DoctorId, PatientId, Prescription, PrescriptionId};

use super::{Repository, RepositoryError};

#[async_trait]
pub trait PrescriptionRepository:
    Repository<Entity = Prescription, Id = PrescriptionId>
{
    async fn find_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<Prescription>, RepositoryError>;

    async fn find_by_doctor(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Vec<Prescription>, RepositoryError>;

    /// Pending prescriptions still valid at `now`.
    async fn find_pending_for_dispensing(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Prescription>, RepositoryError>;

    /// Prescriptions whose validity ended before `now`.
    async fn find_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Prescription>, RepositoryError>;
}

#[cfg(test)]
mockall::mock! {
    pub PrescriptionStore {}

    #[async_trait]
    impl Repository for PrescriptionStore {
        type Entity = Prescription;
        type Id = PrescriptionId;

        async fn find_by_id(&self, id: &PrescriptionId) -> Result<Prescription, RepositoryError>;
        async fn save(&self, entity: Prescription) -> Result<Prescription, RepositoryError>;
        async fn update(&self, entity: Prescription) -> Result<Prescription, RepositoryError>;
        async fn delete(&self, id: &PrescriptionId) -> Result<bool, RepositoryError>;
        async fn find_all(&self) -> Result<Vec<Prescription>, RepositoryError>;
    }

    #[async_trait]
    impl PrescriptionRepository for PrescriptionStore {
        async fn find_by_patient(
            &self,
            patient_id: &PatientId,
        ) -> Result<Vec<Prescription>, RepositoryError>;
        async fn find_by_doctor(
            &self,
            doctor_id: &DoctorId,
        ) -> Result<Vec<Prescription>, RepositoryError>;
        async fn find_pending_for_dispensing(
            &self,
            now: DateTime<Utc>,
        ) -> Result<Vec<Prescription>, RepositoryError>;
        async fn find_expired(
            &self,
            now: DateTime<Utc>,
        ) -> Result<Vec<Prescription>, RepositoryError>;
    }
}
