//! Appointment lifecycle.
//!
//! An appointment moves SCHEDULED → CONFIRMED → IN_PROGRESS → COMPLETED and
//! may be cancelled from any state except COMPLETED. Transitions return a new
//! record and leave the receiver untouched.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::entity::impl_entity;
use super::validation::{Predicate, Specification, spec};
use super::{
    AppointmentId, Audit, DoctorId, DomainError, DomainResult, PatientId, PrescriptionId,
};

/// Shortest bookable slot.
pub const MIN_DURATION_MINUTES: u32 = 15;
/// Longest bookable slot.
pub const MAX_DURATION_MINUTES: u32 = 240;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentType {
    Consultation,
    FollowUp,
    Emergency,
    Surgery,
    CheckUp,
    Vaccination,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AppointmentStatus {
    Scheduled,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
    NoShow,
}

impl AppointmentStatus {
    /// No further transitions are possible.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled | Self::NoShow)
    }

    /// Booked but not yet started.
    pub const fn is_pending(self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed)
    }

    /// Whether an appointment in this state still holds the doctor's time.
    pub const fn holds_slot(self) -> bool {
        !matches!(self, Self::Cancelled | Self::Completed)
    }
}

/// Input payload for [`Appointment::schedule`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentDraft {
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub appointment_type: AppointmentType,
    pub scheduled_time: DateTime<Utc>,
    pub duration_minutes: u32,
    pub reason: String,
}

/// A booked encounter between a patient and a doctor.
///
/// ## Invariants
/// - `duration_minutes` lies in `[15, 240]`.
/// - `reason` is never blank.
/// - `diagnosis` is present once the appointment is COMPLETED.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    id: AppointmentId,
    patient_id: PatientId,
    doctor_id: DoctorId,
    appointment_type: AppointmentType,
    scheduled_time: DateTime<Utc>,
    duration_minutes: u32,
    status: AppointmentStatus,
    reason: String,
    notes: Option<String>,
    diagnosis: Option<String>,
    prescription_id: Option<PrescriptionId>,
    cancellation_reason: Option<String>,
    audit: Audit,
}

impl_entity!(Appointment, AppointmentId, "Appointment");

fn slot_end(start: DateTime<Utc>, duration_minutes: u32) -> Option<DateTime<Utc>> {
    start.checked_add_signed(Duration::minutes(i64::from(duration_minutes)))
}

impl Appointment {
    /// Validate a booking request and produce a SCHEDULED appointment.
    pub fn schedule(draft: AppointmentDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        if draft.scheduled_time < now {
            return Err(DomainError::invalid_field(
                "scheduledTime",
                "Cannot Schedule appointment in the past!",
            ));
        }
        if !(MIN_DURATION_MINUTES..=MAX_DURATION_MINUTES).contains(&draft.duration_minutes) {
            return Err(DomainError::invalid_field(
                "durationMinutes",
                "Duration must be from 15 minutes to 4 hours",
            ));
        }
        if draft.reason.trim().is_empty() {
            return Err(DomainError::invalid_field(
                "reason",
                "Appointment reason is required",
            ));
        }
        if slot_end(draft.scheduled_time, draft.duration_minutes).is_none() {
            return Err(DomainError::invalid_field(
                "scheduledTime",
                "Scheduled time is out of range",
            ));
        }

        Ok(Self {
            id: AppointmentId::generate(),
            patient_id: draft.patient_id,
            doctor_id: draft.doctor_id,
            appointment_type: draft.appointment_type,
            scheduled_time: draft.scheduled_time,
            duration_minutes: draft.duration_minutes,
            status: AppointmentStatus::Scheduled,
            reason: draft.reason.trim().to_owned(),
            notes: None,
            diagnosis: None,
            prescription_id: None,
            cancellation_reason: None,
            audit: Audit::new(now),
        })
    }

    pub fn id(&self) -> &AppointmentId {
        &self.id
    }
    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }
    pub fn doctor_id(&self) -> &DoctorId {
        &self.doctor_id
    }
    pub fn appointment_type(&self) -> AppointmentType {
        self.appointment_type
    }
    pub fn scheduled_time(&self) -> DateTime<Utc> {
        self.scheduled_time
    }
    pub fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }
    pub fn status(&self) -> AppointmentStatus {
        self.status
    }
    pub fn reason(&self) -> &str {
        &self.reason
    }
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
    pub fn diagnosis(&self) -> Option<&str> {
        self.diagnosis.as_deref()
    }
    pub fn prescription_id(&self) -> Option<&PrescriptionId> {
        self.prescription_id.as_ref()
    }
    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// Scheduled start plus duration, saturating at the latest representable instant.
    pub fn end_time(&self) -> DateTime<Utc> {
        slot_end(self.scheduled_time, self.duration_minutes).unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Whether this appointment keeps the doctor busy at `at`.
    ///
    /// The window is half-open: a booking may start exactly when another ends.
    pub fn occupies(&self, at: DateTime<Utc>) -> bool {
        self.status.holds_slot() && self.scheduled_time <= at && at < self.end_time()
    }

    /// Pending and not yet started relative to `now`.
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.status.is_pending() && self.scheduled_time >= now
    }

    pub fn confirm(&self, now: DateTime<Utc>) -> DomainResult<Self> {
        self.transition(
            AppointmentStatus::Scheduled,
            AppointmentStatus::Confirmed,
            "Only scheduled appointments can be confirmed",
            now,
        )
    }

    pub fn start(&self, now: DateTime<Utc>) -> DomainResult<Self> {
        self.transition(
            AppointmentStatus::Confirmed,
            AppointmentStatus::InProgress,
            "Only confirmed appointments can be started",
            now,
        )
    }

    /// Close the encounter with its diagnosis and optional prescription.
    pub fn complete(
        &self,
        diagnosis: impl Into<String>,
        prescription_id: Option<PrescriptionId>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let diagnosis = diagnosis.into();
        if self.status != AppointmentStatus::InProgress {
            return Err(DomainError::business_rule(
                "Only in-progress appointments can be completed",
            ));
        }
        if diagnosis.trim().is_empty() {
            return Err(DomainError::invalid_field("diagnosis", "Diagnosis is required"));
        }
        Ok(Self {
            status: AppointmentStatus::Completed,
            diagnosis: Some(diagnosis),
            prescription_id,
            audit: self.audit.touched(now),
            ..self.clone()
        })
    }

    /// Cancel from any state except COMPLETED.
    pub fn cancel(&self, reason: impl Into<String>, now: DateTime<Utc>) -> DomainResult<Self> {
        if self.status == AppointmentStatus::Completed {
            return Err(DomainError::business_rule(
                "You cannot cancel a completed appointment!",
            ));
        }
        Ok(Self {
            status: AppointmentStatus::Cancelled,
            cancellation_reason: Some(reason.into()),
            audit: self.audit.touched(now),
            ..self.clone()
        })
    }

    /// Record that the patient never arrived once the slot has passed.
    pub fn mark_no_show(&self, now: DateTime<Utc>) -> DomainResult<Self> {
        if !self.status.is_pending() {
            return Err(DomainError::business_rule(
                "Only scheduled or confirmed appointments can be marked as no-show",
            ));
        }
        if now < self.end_time() {
            return Err(DomainError::business_rule(
                "Cannot mark an appointment as no-show before it ends",
            ));
        }
        Ok(Self {
            status: AppointmentStatus::NoShow,
            audit: self.audit.touched(now),
            ..self.clone()
        })
    }

    /// Attach free-text notes.
    pub fn with_notes(&self, notes: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            notes: Some(notes.into()),
            audit: self.audit.touched(now),
            ..self.clone()
        }
    }

    fn transition(
        &self,
        from: AppointmentStatus,
        to: AppointmentStatus,
        message: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if self.status != from {
            return Err(DomainError::business_rule(message));
        }
        Ok(Self {
            status: to,
            audit: self.audit.touched(now),
            ..self.clone()
        })
    }
}

/// Appointments that keep the doctor busy at `at`.
pub fn occupying(at: DateTime<Utc>) -> Predicate<impl Fn(&Appointment) -> bool> {
    spec("Appointment occupies the requested time", move |appointment: &Appointment| {
        appointment.occupies(at)
    })
}

/// Appointments whose status is one of `statuses` (all when empty).
pub fn with_status(
    statuses: Vec<AppointmentStatus>,
) -> Predicate<impl Fn(&Appointment) -> bool> {
    spec("Appointment has a requested status", move |appointment: &Appointment| {
        statuses.is_empty() || statuses.contains(&appointment.status)
    })
}

/// True when no appointment in `existing` blocks `at`.
///
/// Only the requested start instant is tested. This is not an interval
/// overlap check: a long booking starting just before an existing
/// appointment is accepted even though the two windows intersect.
pub fn slot_is_free<'a>(
    existing: impl IntoIterator<Item = &'a Appointment>,
    at: DateTime<Utc>,
) -> bool {
    let blocking = occupying(at);
    !existing
        .into_iter()
        .any(|appointment| blocking.is_satisfied_by(appointment))
}
