//! Doctor registry record.

mod time_slot;

pub use time_slot::TimeSlot;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::entity::impl_entity;
use super::{Audit, DoctorId, DomainResult, Email, Money, PhoneNumber, UserId, Validator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicalDepartment {
    Cardiology,
    Neurology,
    Orthopedics,
    Pediatrics,
    GeneralSurgery,
    InternalMedicine,
    Emergency,
    Radiology,
    Laboratory,
    Pharmacy,
}

/// Input payload for [`Doctor::register`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DoctorDraft {
    pub first_name: String,
    pub last_name: String,
    pub specialization: MedicalDepartment,
    pub license_number: String,
    pub qualifications: Vec<String>,
    pub phone: PhoneNumber,
    pub email: Email,
    pub consultation_fee: Money,
    pub years_of_experience: u32,
    #[serde(default)]
    pub available_time_slots: Vec<TimeSlot>,
}

/// Registered doctor.
///
/// ## Invariants
/// - The licence number is non-blank.
/// - At least one qualification is listed.
/// - The consultation fee is strictly positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Doctor {
    id: DoctorId,
    user_id: UserId,
    first_name: String,
    last_name: String,
    specialization: MedicalDepartment,
    license_number: String,
    qualifications: Vec<String>,
    phone: PhoneNumber,
    email: Email,
    consultation_fee: Money,
    years_of_experience: u32,
    available_time_slots: Vec<TimeSlot>,
    accepting_patients: bool,
    audit: Audit,
}

impl_entity!(Doctor, DoctorId, "Doctor");

impl Doctor {
    pub fn register(draft: DoctorDraft, user_id: UserId, now: DateTime<Utc>) -> DomainResult<Self> {
        let doctor = Self {
            id: DoctorId::generate(),
            user_id,
            first_name: draft.first_name.trim().to_owned(),
            last_name: draft.last_name.trim().to_owned(),
            specialization: draft.specialization,
            license_number: draft.license_number.trim().to_owned(),
            qualifications: draft.qualifications,
            phone: draft.phone,
            email: draft.email,
            consultation_fee: draft.consultation_fee,
            years_of_experience: draft.years_of_experience,
            available_time_slots: draft.available_time_slots,
            accepting_patients: true,
            audit: Audit::new(now),
        };

        Validator::new()
            .field_rule("licenseNumber", "License number must not be blank", |d: &Self| {
                !d.license_number.is_empty()
            })
            .field_rule(
                "qualifications",
                "Must have at least one qualification",
                |d: &Self| d.qualifications.iter().any(|q| !q.trim().is_empty()),
            )
            .field_rule("consultationFee", "Consultation fee must be positive", |d: &Self| {
                d.consultation_fee.amount() > Decimal::ZERO
            })
            .validate(doctor)
    }

    pub fn id(&self) -> &DoctorId {
        &self.id
    }
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
    pub fn first_name(&self) -> &str {
        &self.first_name
    }
    pub fn last_name(&self) -> &str {
        &self.last_name
    }
    pub fn specialization(&self) -> MedicalDepartment {
        self.specialization
    }
    pub fn license_number(&self) -> &str {
        &self.license_number
    }
    pub fn qualifications(&self) -> &[String] {
        &self.qualifications
    }
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }
    pub fn email(&self) -> &Email {
        &self.email
    }
    pub fn consultation_fee(&self) -> Money {
        self.consultation_fee
    }
    pub fn years_of_experience(&self) -> u32 {
        self.years_of_experience
    }
    pub fn available_time_slots(&self) -> &[TimeSlot] {
        &self.available_time_slots
    }
    pub fn is_accepting_patients(&self) -> bool {
        self.accepting_patients
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Whether one of the published slots contains `at`.
    pub fn is_available(&self, at: DateTime<Utc>) -> bool {
        self.available_time_slots.iter().any(|slot| slot.contains(at))
    }

    /// Publish another availability window.
    pub fn with_time_slot(&self, slot: TimeSlot, now: DateTime<Utc>) -> Self {
        let mut available_time_slots = self.available_time_slots.clone();
        available_time_slots.push(slot);
        Self {
            available_time_slots,
            audit: self.audit.touched(now),
            ..self.clone()
        }
    }

    pub fn with_accepting_patients(&self, accepting: bool, now: DateTime<Utc>) -> Self {
        Self {
            accepting_patients: accepting,
            audit: self.audit.touched(now),
            ..self.clone()
        }
    }
}
