//! In-memory appointment storage.

use std::cmp::Reverse;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::appointment::slot_is_free;
use crate::domain::ports::{AppointmentRepository, Booking, RepositoryError};
use crate::domain::{Appointment, AppointmentStatus, DoctorId, PatientId};

use super::InMemoryRepository;

#[async_trait]
impl AppointmentRepository for InMemoryRepository<Appointment> {
    async fn find_by_patient_id(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let mut found = self.select(|a| a.patient_id() == patient_id).await;
        found.sort_by_key(|a| Reverse(a.scheduled_time()));
        Ok(found)
    }

    async fn find_by_doctor_id(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let mut found = self.select(|a| a.doctor_id() == doctor_id).await;
        found.sort_by_key(Appointment::scheduled_time);
        Ok(found)
    }

    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let mut found = self
            .select(|a| (start..=end).contains(&a.scheduled_time()))
            .await;
        found.sort_by_key(Appointment::scheduled_time);
        Ok(found)
    }

    async fn find_by_status(
        &self,
        status: AppointmentStatus,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        Ok(self.select(|a| a.status() == status).await)
    }

    async fn find_upcoming(
        &self,
        patient_id: &PatientId,
        now: DateTime<Utc>,
    ) -> Result<Vec<Appointment>, RepositoryError> {
        let mut found = self
            .select(|a| a.patient_id() == patient_id && a.is_upcoming(now))
            .await;
        found.sort_by_key(Appointment::scheduled_time);
        Ok(found)
    }

    async fn check_doctor_availability(
        &self,
        doctor_id: &DoctorId,
        at: DateTime<Utc>,
    ) -> Result<bool, RepositoryError> {
        let records = self.records().read().await;
        Ok(slot_is_free(
            records.values().filter(|a| a.doctor_id() == doctor_id),
            at,
        ))
    }

    async fn book(&self, appointment: Appointment) -> Result<Booking, RepositoryError> {
        let mut records = self.records().write().await;
        if records.contains_key(appointment.id()) {
            return Err(RepositoryError::conflict(format!(
                "Appointment with id {} already exists",
                appointment.id()
            )));
        }
        let free = slot_is_free(
            records
                .values()
                .filter(|a| a.doctor_id() == appointment.doctor_id()),
            appointment.scheduled_time(),
        );
        if !free {
            debug!(
                doctor_id = %appointment.doctor_id(),
                scheduled_time = %appointment.scheduled_time(),
                "booking lost to an existing appointment"
            );
            return Ok(Booking::SlotTaken);
        }
        records.insert(appointment.id().clone(), appointment.clone());
        Ok(Booking::Confirmed(appointment))
    }
}
