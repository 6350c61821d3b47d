//! In-memory medical report storage.

use std::cmp::Reverse;

use async_trait::async_trait;

use crate::domain::ports::{MedicalReportRepository, RepositoryError};
use crate::domain::{AppointmentId, Entity, MedicalReport, MedicalReportType, PatientId};

use super::InMemoryRepository;

#[async_trait]
impl MedicalReportRepository for InMemoryRepository<MedicalReport> {
    async fn find_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<MedicalReport>, RepositoryError> {
        let mut found = self.select(|r| r.patient_id() == patient_id).await;
        found.sort_by_key(|r| Reverse(r.audit().created_at));
        Ok(found)
    }

    async fn find_by_appointment(
        &self,
        appointment_id: &AppointmentId,
    ) -> Result<Vec<MedicalReport>, RepositoryError> {
        Ok(self
            .select(|r| r.appointment_id() == Some(appointment_id))
            .await)
    }

    async fn find_by_type(
        &self,
        record_type: MedicalReportType,
    ) -> Result<Vec<MedicalReport>, RepositoryError> {
        Ok(self.select(|r| r.record_type() == record_type).await)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::{DoctorId, MedicalReportDraft};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 14, 15, 0, 0)
            .single()
            .expect("valid time")
    }

    fn report(
        patient_id: &PatientId,
        appointment_id: Option<AppointmentId>,
        record_type: MedicalReportType,
        recorded: DateTime<Utc>,
    ) -> MedicalReport {
        MedicalReport::create(
            MedicalReportDraft {
                patient_id: patient_id.clone(),
                appointment_id,
                record_type,
                chief_complaint: "Headache".to_owned(),
                diagnosis: "Migraine".to_owned(),
                treatment: "Rest".to_owned(),
                vital_signs: None,
                lab_tests: Vec::new(),
                notes: None,
                follow_up_required: false,
                follow_up_date: None,
                recorded_by: DoctorId::generate(),
            },
            recorded,
        )
        .expect("valid report")
    }

    #[rstest]
    #[tokio::test]
    async fn lookups_filter_by_patient_appointment_and_type() {
        let patient = PatientId::generate();
        let visit = AppointmentId::generate();
        let older = report(&patient, None, MedicalReportType::Emergency, now() - Duration::days(3));
        let newer = report(
            &patient,
            Some(visit.clone()),
            MedicalReportType::Consultation,
            now(),
        );
        let other = report(
            &PatientId::generate(),
            None,
            MedicalReportType::Consultation,
            now(),
        );
        let store = InMemoryRepository::seeded([older.clone(), newer.clone(), other]);

        let history = store.find_by_patient(&patient).await.expect("read succeeds");
        let for_visit = store
            .find_by_appointment(&visit)
            .await
            .expect("read succeeds");
        let emergencies = store
            .find_by_type(MedicalReportType::Emergency)
            .await
            .expect("read succeeds");

        assert_eq!(history, vec![newer.clone(), older.clone()]);
        assert_eq!(for_visit, vec![newer]);
        assert_eq!(emergencies, vec![older]);
    }
}
