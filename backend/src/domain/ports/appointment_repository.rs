//! Port for appointment persistence and slot booking.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Appointment, AppointmentId, AppointmentStatus, DoctorId, PatientId};

use super::{Repository, RepositoryError};

/// Outcome of [`AppointmentRepository::book`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Booking {
    /// The appointment was stored.
    Confirmed(Appointment),
    /// Another appointment of the same doctor already occupies the start time.
    SlotTaken,
}

/// Appointment storage with doctor-availability queries.
#[async_trait]
pub trait AppointmentRepository: Repository<Entity = Appointment, Id = AppointmentId> {
    /// Appointments of a patient, newest first.
    async fn find_by_patient_id(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<Appointment>, RepositoryError>;

    /// Appointments of a doctor, oldest first.
    async fn find_by_doctor_id(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Vec<Appointment>, RepositoryError>;

    /// Appointments scheduled within `[start, end]`.
    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, RepositoryError>;

    async fn find_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, RepositoryError>;

    /// Pending appointments of a patient scheduled after `now`, soonest first.
    async fn find_upcoming(
        &self,
        patient_id: &PatientId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, RepositoryError>;

    /// False when a slot-holding appointment of the doctor covers `at`.
    async fn check_doctor_availability(
        &self,
        doctor_id: &DoctorId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError>;

    /// Check availability and insert in one step.
    async fn book(&self, appointment: Appointment) -> Result<Booking, RepositoryError>;
}

#[cfg(test)]
mockall::mock! {
    pub AppointmentStore {}

    #[async_trait]
    impl Repository for AppointmentStore {
        type Entity = Appointment;
        type Id = AppointmentId;

        async fn find_by_id(&self, id: &AppointmentId) -> Result<Appointment, RepositoryError>;
        async fn save(&self, entity: Appointment) -> Result<Appointment, RepositoryError>;
        async fn update(&self, entity: Appointment) -> Result<Appointment, RepositoryError>;
        async fn delete(&self, id: &AppointmentId) -> Result<bool, RepositoryError>;
        async fn find_all(&self) -> Result<Vec<Appointment>, RepositoryError>;
    }

    #[async_trait]
    impl AppointmentRepository for AppointmentStore {
        async fn find_by_patient_id(
            &self,
            patient_id: &PatientId,
        ) -> Result<Vec<Appointment>, RepositoryError>;
        async fn find_by_doctor_id(
            &self,
            doctor_id: &DoctorId,
        ) -> Result<Vec<Appointment>, RepositoryError>;
        async fn find_by_date_range(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<Appointment>, RepositoryError>;
        async fn find_by_status(
            &self,
            status: AppointmentStatus,
        ) -> Result<Vec<Appointment>, RepositoryError>;
        async fn find_upcoming(
            &self,
            patient_id: &PatientId,
            now: DateTime<Utc>,
        ) -> Result<Vec<Appointment>, RepositoryError>;
        async fn check_doctor_availability(
            &self,
            doctor_id: &DoctorId,
            at: DateTime<Utc>,
        ) -> Result<bool, RepositoryError>;
        async fn book(&self, appointment: Appointment) -> Result<Booking, RepositoryError>;
    }
}
