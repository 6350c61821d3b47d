//! Port for doctor persistence.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Doctor, DoctorId, MedicalDepartment};

use super::{Repository, RepositoryError};

#[async_trait]
pub trait DoctorRepository: Repository<Entity = Doctor, Id = DoctorId> {
    async fn find_by_specialization(
        &self,
        department: MedicalDepartment,
    ) -> Result<Vec<Doctor>, RepositoryError>;

    /// Doctors accepting patients with a time slot containing `at`.
    async fn find_available(&self, at: DateTime<Utc>) -> Result<Vec<Doctor>, RepositoryError>;

    async fn find_by_license_number(
        &self,
        license_number: &str,
    ) -> Result<Option<Doctor>, RepositoryError>;
}

#[cfg(test)]
mockall::mock! {
    pub DoctorStore {}

    #[async_trait]
    impl Repository for DoctorStore {
        type Entity = Doctor;
        type Id = DoctorId;

        async fn find_by_id(&self, id: &DoctorId) -> Result<Doctor, RepositoryError>;
        async fn save(&self, entity: Doctor) -> Result<Doctor, RepositoryError>;
        async fn update(&self, entity: Doctor) -> Result<Doctor, RepositoryError>;
        async fn delete(&self, id: &DoctorId) -> Result<bool, RepositoryError>;
        async fn find_all(&self) -> Result<Vec<Doctor>, RepositoryError>;
    }

    #[async_trait]
    impl DoctorRepository for DoctorStore {
        async fn find_by_specialization(
            &self,
            department: MedicalDepartment,
        ) -> Result<Vec<Doctor>, RepositoryError>;
        async fn find_available(&self, at: DateTime<Utc>) -> Result<Vec<Doctor>, RepositoryError>;
        async fn find_by_license_number(
            &self,
            license_number: &str,
        ) -> Result<Option<Doctor>, RepositoryError>;
    }
}
