//! Port for medical report persistence.

use async_trait::async_trait;

use crate::domain::{AppointmentId, MedicalReport, MedicalReportId, MedicalReportType, PatientId};

use super::{Repository, RepositoryError};

#[async_trait]
pub trait MedicalReportRepository:
    Repository<Entity = MedicalReport, Id = MedicalReportId>
{
    async fn find_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<MedicalReport>, RepositoryError>;

    async fn find_by_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Vec<MedicalReport>, RepositoryError>;

    async fn find_by_type(
        &self,
        record_type: MedicalReportType,
    ) -> Result<Vec<MedicalReport>, RepositoryError>;
}
