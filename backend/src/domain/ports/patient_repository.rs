//! Port for patient persistence.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{BloodType, Email, Patient, PatientId, PhoneNumber};

use super::{Repository, RepositoryError};

/// Patient storage with contact and clinical lookups.
#[async_trait]
pub trait PatientRepository: Repository<Entity = Patient, Id = PatientId> {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Patient>, RepositoryError>;

    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<Patient>, RepositoryError>;

    /// Case-insensitive match on first, last or full name.
    async fn search_by_name(&self, query: &str) -> Result<Vec<Patient>, RepositoryError>;

    /// Patients whose insurance is active and unexpired on `today`.
    async fn find_with_insurance(&self, today: NaiveDate)
    -> Result<Vec<Patient>, RepositoryError>;

    async fn find_by_blood_type(
        &self,
        blood_type: BloodType,
    ) -> Result<Vec<Patient>, RepositoryError>;
}

#[cfg(test)]
mockall::mock! {
    pub PatientStore {}

    #[async_trait]
    impl Repository for PatientStore {
        type Entity = Patient;
        type Id = PatientId;

        async fn find_by_id(&self, id: &PatientId) -> Result<Patient, RepositoryError>;
        async fn save(&self, entity: Patient) -> Result<Patient, RepositoryError>;
        async fn update(&self, entity: Patient) -> Result<Patient, RepositoryError>;
        async fn delete(&self, id: &PatientId) -> Result<bool, RepositoryError>;
        async fn find_all(&self) -> Result<Vec<Patient>, RepositoryError>;
    }

    #[async_trait]
    impl PatientRepository for PatientStore {
        async fn find_by_email(&self, email: &Email) -> Result<Option<Patient>, RepositoryError>;
        async fn find_by_phone(
            &self,
            phone: &PhoneNumber,
        ) -> Result<Option<Patient>, RepositoryError>;
        async fn search_by_name(&self, query: &str) -> Result<Vec<Patient>, RepositoryError>;
        async fn find_with_insurance(
            &self,
            today: NaiveDate,
        ) -> Result<Vec<Patient>, RepositoryError>;
        async fn find_by_blood_type(
            &self,
            blood_type: BloodType,
        ) -> Result<Vec<Patient>, RepositoryError>;
    }
}
