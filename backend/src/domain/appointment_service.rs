//! Appointment scheduling and lifecycle services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, info};

use crate::domain::appointment::with_status;
use crate::domain::ports::{
    AppointmentCommand, AppointmentQuery, AppointmentRepository, Booking,
    CancelAppointmentRequest, CompleteAppointmentRequest, DoctorRepository,
    PatientAppointmentsRequest, PatientRepository,
};
use crate::domain::service_support::bounded;
use crate::domain::{
    Appointment, AppointmentDraft, AppointmentId, DomainError, DomainResult, ServicePolicy,
    Specification,
};

const DOCTOR_UNAVAILABLE: &str = "Doctor is not available at the requested time";

/// Appointment service implementing the appointment driving ports.
#[derive(Clone)]
pub struct AppointmentService<A, P, D> {
    appointments: Arc<A>,
    patients: Arc<P>,
    doctors: Arc<D>,
    clock: Arc<dyn Clock>,
    policy: ServicePolicy,
}

impl<A, P, D> AppointmentService<A, P, D> {
    pub fn new(
        appointments: Arc<A>,
        patients: Arc<P>,
        doctors: Arc<D>,
        clock: Arc<dyn Clock>,
        policy: ServicePolicy,
    ) -> Self {
        Self {
            appointments,
            patients,
            doctors,
            clock,
            policy,
        }
    }
}

impl<A, P, D> AppointmentService<A, P, D>
where
    A: AppointmentRepository,
{
    async fn load(&self, id: &AppointmentId) -> DomainResult<Appointment> {
        bounded(
            &self.policy,
            "appointments.find_by_id",
            self.appointments.find_by_id(id),
        )
        .await
    }

    async fn store(&self, appointment: Appointment) -> DomainResult<Appointment> {
        let stored = bounded(
            &self.policy,
            "appointments.update",
            self.appointments.update(appointment),
        )
        .await?;
        debug!(appointment_id = %stored.id(), status = ?stored.status(), "appointment updated");
        Ok(stored)
    }
}

#[async_trait]
impl<A, P, D> AppointmentCommand for AppointmentService<A, P, D>
where
    A: AppointmentRepository,
    P: PatientRepository,
    D: DoctorRepository,
{
    async fn schedule_appointment(&self, draft: AppointmentDraft) -> DomainResult<Appointment> {
        let now = self.clock.utc();
        bounded(
            &self.policy,
            "patients.find_by_id",
            self.patients.find_by_id(&draft.patient_id),
        )
        .await?;
        bounded(
            &self.policy,
            "doctors.find_by_id",
            self.doctors.find_by_id(&draft.doctor_id),
        )
        .await?;

        let available = bounded(
            &self.policy,
            "appointments.check_doctor_availability",
            self.appointments
                .check_doctor_availability(&draft.doctor_id, draft.scheduled_time),
        )
        .await?;
        if !available {
            return Err(DomainError::business_rule(DOCTOR_UNAVAILABLE));
        }

        let appointment = Appointment::schedule(draft, now)?;
        match bounded(
            &self.policy,
            "appointments.book",
            self.appointments.book(appointment),
        )
        .await?
        {
            Booking::Confirmed(booked) => {
                info!(
                    appointment_id = %booked.id(),
                    doctor_id = %booked.doctor_id(),
                    scheduled_time = %booked.scheduled_time(),
                    "appointment scheduled"
                );
                Ok(booked)
            }
            Booking::SlotTaken => Err(DomainError::business_rule(DOCTOR_UNAVAILABLE)),
        }
    }

    async fn confirm_appointment(&self, id: &AppointmentId) -> DomainResult<Appointment> {
        let confirmed = self.load(id).await?.confirm(self.clock.utc())?;
        self.store(confirmed).await
    }

    async fn start_appointment(&self, id: &AppointmentId) -> DomainResult<Appointment> {
        let started = self.load(id).await?.start(self.clock.utc())?;
        self.store(started).await
    }

    async fn complete_appointment(
        &self,
        request: CompleteAppointmentRequest,
    ) -> DomainResult<Appointment> {
        let now = self.clock.utc();
        let current = self.load(&request.appointment_id).await?;
        let mut completed = current.complete(request.diagnosis, request.prescription_id, now)?;
        if let Some(notes) = request.notes {
            completed = completed.with_notes(notes, now);
        }
        self.store(completed).await
    }

    async fn cancel_appointment(
        &self,
        request: CancelAppointmentRequest,
    ) -> DomainResult<Appointment> {
        let cancelled = self
            .load(&request.appointment_id)
            .await?
            .cancel(request.reason, self.clock.utc())?;
        self.store(cancelled).await
    }

    async fn mark_no_show(&self, id: &AppointmentId) -> DomainResult<Appointment> {
        let missed = self.load(id).await?.mark_no_show(self.clock.utc())?;
        self.store(missed).await
    }
}

#[async_trait]
impl<A, P, D> AppointmentQuery for AppointmentService<A, P, D>
where
    A: AppointmentRepository,
    P: PatientRepository,
    D: DoctorRepository,
{
    async fn patient_appointments(
        &self,
        request: PatientAppointmentsRequest,
    ) -> DomainResult<Vec<Appointment>> {
        let PatientAppointmentsRequest {
            patient_id,
            upcoming_only,
            statuses,
        } = request;
        bounded(
            &self.policy,
            "patients.find_by_id",
            self.patients.find_by_id(&patient_id),
        )
        .await?;

        let appointments = if upcoming_only {
            bounded(
                &self.policy,
                "appointments.find_upcoming",
                self.appointments.find_upcoming(&patient_id, self.clock.utc()),
            )
            .await?
        } else {
            bounded(
                &self.policy,
                "appointments.find_by_patient_id",
                self.appointments.find_by_patient_id(&patient_id),
            )
            .await?
        };

        let wanted = with_status(statuses);
        Ok(appointments
            .into_iter()
            .filter(|appointment| wanted.is_satisfied_by(appointment))
            .collect())
    }
}

#[cfg(test)]
#[path = "appointment_service_tests.rs"]
mod tests;
