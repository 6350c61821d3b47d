//! Prescriptions issued at the end of an appointment.
//!
//! A prescription is PENDING until a pharmacist dispenses it or it is
//! cancelled. Expiry is never stored: it is derived from `valid_until`.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::entity::impl_entity;
use super::validation::{Predicate, Specification, spec};
use super::{
    AppointmentId, Audit, DoctorId, DomainError, DomainResult, PatientId, PrescriptionId, UserId,
};

/// Accepted validity window in days.
pub const VALIDITY_DAYS: std::ops::RangeInclusive<u32> = 1..=365;

/// One prescribed medicine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Medication {
    name: String,
    dosage: String,
    frequency: String,
    duration: String,
    instructions: String,
    quantity: u32,
}

impl Medication {
    pub fn new(
        name: impl Into<String>,
        dosage: impl Into<String>,
        frequency: impl Into<String>,
        duration: impl Into<String>,
        instructions: impl Into<String>,
        quantity: u32,
    ) -> DomainResult<Self> {
        let name = name.into().trim().to_owned();
        if name.is_empty() {
            return Err(DomainError::invalid_field("name", "Medicine name is required"));
        }
        if quantity == 0 {
            return Err(DomainError::invalid_field("quantity", "quantity must be positive"));
        }
        Ok(Self {
            name,
            dosage: dosage.into(),
            frequency: frequency.into(),
            duration: duration.into(),
            instructions: instructions.into(),
            quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn dosage(&self) -> &str {
        &self.dosage
    }
    pub fn frequency(&self) -> &str {
        &self.frequency
    }
    pub fn duration(&self) -> &str {
        &self.duration
    }
    pub fn instructions(&self) -> &str {
        &self.instructions
    }
    pub fn quantity(&self) -> u32 {
        self.quantity
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrescriptionStatus {
    Pending,
    Dispensed,
    Cancelled,
}

/// Input payload for [`Prescription::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrescriptionDraft {
    pub patient_id: PatientId,
    pub doctor_id: DoctorId,
    pub appointment_id: AppointmentId,
    pub medications: Vec<Medication>,
    pub validity_days: u32,
    pub notes: Option<String>,
}

/// Total quantity required for one medicine name across a prescription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MedicationDemand {
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Prescription {
    id: PrescriptionId,
    patient_id: PatientId,
    doctor_id: DoctorId,
    appointment_id: AppointmentId,
    medications: Vec<Medication>,
    status: PrescriptionStatus,
    notes: Option<String>,
    valid_until: DateTime<Utc>,
    dispensed_by: Option<UserId>,
    dispensed_at: Option<DateTime<Utc>>,
    audit: Audit,
}

impl_entity!(Prescription, PrescriptionId, "Prescription");

impl Prescription {
    pub fn create(draft: PrescriptionDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        if draft.medications.is_empty() {
            return Err(DomainError::invalid_field(
                "medications",
                "Prescriptions must have at least one medication",
            ));
        }
        if !VALIDITY_DAYS.contains(&draft.validity_days) {
            return Err(DomainError::invalid_field(
                "validityDays",
                "Validity must be between 1 and 365 day",
            ));
        }
        let valid_until = now
            .checked_add_signed(Duration::days(i64::from(draft.validity_days)))
            .ok_or_else(|| {
                DomainError::invalid_field("validityDays", "Validity ends out of range")
            })?;
        Ok(Self {
            id: PrescriptionId::generate(now),
            patient_id: draft.patient_id,
            doctor_id: draft.doctor_id,
            appointment_id: draft.appointment_id,
            medications: draft.medications,
            status: PrescriptionStatus::Pending,
            notes: draft.notes,
            valid_until,
            dispensed_by: None,
            dispensed_at: None,
            audit: Audit::new(now),
        })
    }

    pub fn id(&self) -> &PrescriptionId {
        &self.id
    }
    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }
    pub fn doctor_id(&self) -> &DoctorId {
        &self.doctor_id
    }
    pub fn appointment_id(&self) -> &AppointmentId {
        &self.appointment_id
    }
    pub fn medications(&self) -> &[Medication] {
        &self.medications
    }
    pub fn status(&self) -> PrescriptionStatus {
        self.status
    }
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
    pub fn valid_until(&self) -> DateTime<Utc> {
        self.valid_until
    }
    pub fn dispensed_by(&self) -> Option<&UserId> {
        self.dispensed_by.as_ref()
    }
    pub fn dispensed_at(&self) -> Option<DateTime<Utc>> {
        self.dispensed_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.valid_until
    }

    pub fn can_be_dispensed(&self, now: DateTime<Utc>) -> bool {
        dispensable_at(now).is_satisfied_by(self)
    }

    /// Quantities per medicine, merging case-insensitive duplicates in
    /// first-seen order.
    pub fn demand(&self) -> Vec<MedicationDemand> {
        let mut demand: Vec<MedicationDemand> = Vec::new();
        for medication in &self.medications {
            match demand
                .iter_mut()
                .find(|entry| entry.name.eq_ignore_ascii_case(medication.name()))
            {
                Some(entry) => entry.quantity = entry.quantity.saturating_add(medication.quantity),
                None => demand.push(MedicationDemand {
                    name: medication.name.clone(),
                    quantity: medication.quantity,
                }),
            }
        }
        demand
    }

    pub fn dispense(&self, pharmacist: UserId, now: DateTime<Utc>) -> DomainResult<Self> {
        if !self.can_be_dispensed(now) {
            return Err(DomainError::business_rule("Prescription cannot be dispended"));
        }
        Ok(Self {
            status: PrescriptionStatus::Dispensed,
            dispensed_by: Some(pharmacist),
            dispensed_at: Some(now),
            audit: self.audit.touched(now),
            ..self.clone()
        })
    }

    pub fn cancel(&self, now: DateTime<Utc>) -> DomainResult<Self> {
        if self.status == PrescriptionStatus::Dispensed {
            return Err(DomainError::business_rule(
                "Cannot cancel a dispensed prescriptions",
            ));
        }
        Ok(Self {
            status: PrescriptionStatus::Cancelled,
            audit: self.audit.touched(now),
            ..self.clone()
        })
    }
}

/// Pending prescriptions that have not yet expired at `now`.
pub fn dispensable_at(
    now: DateTime<Utc>,
) -> impl Specification<Prescription> + Clone {
    let pending: Predicate<_> = spec("Prescription is pending", |p: &Prescription| {
        p.status == PrescriptionStatus::Pending
    });
    let expired = spec("Prescription has expired", move |p: &Prescription| {
        p.is_expired(now)
    });
    pending.and(expired.not())
}
