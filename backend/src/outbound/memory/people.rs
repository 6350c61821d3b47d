//! In-memory patient, doctor and account storage.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::domain::ports::{
    DoctorRepository, PatientRepository, RepositoryError, UserRepository,
};
use crate::domain::{
    BloodType, Doctor, Email, MedicalDepartment, Patient, PhoneNumber, User, UserRole,
};

use super::InMemoryRepository;

fn name_matches(patient: &Patient, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    !query.is_empty()
        && [
            patient.first_name().to_lowercase(),
            patient.last_name().to_lowercase(),
            patient.full_name().to_lowercase(),
        ]
        .iter()
        .any(|name| name.contains(&query))
}

#[async_trait]
impl PatientRepository for InMemoryRepository<Patient> {
    async fn find_by_email(&self, email: &Email) -> Result<Option<Patient>, RepositoryError> {
        Ok(self.first(|p| p.email().matches(email)).await)
    }

    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<Patient>, RepositoryError> {
        Ok(self.first(|p| p.phone() == phone).await)
    }

    async fn search_by_name(&self, query: &str) -> Result<Vec<Patient>, RepositoryError> {
        Ok(self.select(|p| name_matches(p, query)).await)
    }

    async fn find_with_insurance(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<Patient>, RepositoryError> {
        Ok(self.select(|p| p.has_active_insurance(today)).await)
    }

    async fn find_by_blood_type(
        &self,
        blood_type: BloodType,
    ) -> Result<Vec<Patient>, RepositoryError> {
        Ok(self.select(|p| p.blood_type() == blood_type).await)
    }
}

#[async_trait]
impl DoctorRepository for InMemoryRepository<Doctor> {
    async fn find_by_specialization(
        &self,
        specialization: MedicalDepartment,
    ) -> Result<Vec<Doctor>, RepositoryError> {
        Ok(self.select(|d| d.specialization() == specialization).await)
    }

    async fn find_available(&self, at: DateTime<Utc>) -> Result<Vec<Doctor>, RepositoryError> {
        Ok(self
            .select(|d| d.is_accepting_patients() && d.is_available(at))
            .await)
    }

    async fn find_by_license_number(
        &self,
        license_number: &str,
    ) -> Result<Option<Doctor>, RepositoryError> {
        Ok(self.first(|d| d.license_number() == license_number).await)
    }
}

#[async_trait]
impl UserRepository for InMemoryRepository<User> {
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self.first(|u| u.email().matches(email)).await)
    }

    async fn find_by_role(&self, role: UserRole) -> Result<Vec<User>, RepositoryError> {
        Ok(self.select(|u| u.role() == role).await)
    }
}
