//! Patient registry record.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::entity::impl_entity;
use super::{
    Address, Audit, DomainError, DomainResult, Email, EmergencyContact, PatientId, PhoneNumber,
    UserId, Validator,
};

/// Oldest age accepted at registration.
pub const MAX_PATIENT_AGE: i32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BloodType {
    APositive,
    ANegative,
    BPositive,
    BNegative,
    AbPositive,
    AbNegative,
    OPositive,
    ONegative,
    #[default]
    Unknown,
}

/// Insurance policy held by a patient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceInfo {
    provider: String,
    policy_number: String,
    group_number: Option<String>,
    coverage_percentage: u8,
    expiry_date: NaiveDate,
    active: bool,
}

impl InsuranceInfo {
    /// Validate and construct an active policy.
    pub fn new(
        provider: impl Into<String>,
        policy_number: impl Into<String>,
        group_number: Option<String>,
        coverage_percentage: u8,
        expiry_date: NaiveDate,
    ) -> DomainResult<Self> {
        if coverage_percentage > 100 {
            return Err(DomainError::invalid_field(
                "coveragePercentage",
                "Coverage Percentage must be from 0 to 100",
            ));
        }
        Ok(Self {
            provider: provider.into(),
            policy_number: policy_number.into(),
            group_number,
            coverage_percentage,
            expiry_date,
            active: true,
        })
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }
    pub fn policy_number(&self) -> &str {
        &self.policy_number
    }
    pub fn group_number(&self) -> Option<&str> {
        self.group_number.as_deref()
    }
    pub fn coverage_percentage(&self) -> u8 {
        self.coverage_percentage
    }
    pub fn expiry_date(&self) -> NaiveDate {
        self.expiry_date
    }
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.expiry_date
    }

    /// Same policy, switched off.
    pub fn deactivated(&self) -> Self {
        Self {
            active: false,
            ..self.clone()
        }
    }
}

/// Input payload for [`Patient::register`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDraft {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub gender: Gender,
    #[serde(default)]
    pub blood_type: BloodType,
    pub phone: PhoneNumber,
    pub email: Email,
    pub address: Address,
    pub emergency_contact: EmergencyContact,
    #[serde(default)]
    pub insurance: Option<InsuranceInfo>,
    #[serde(default)]
    pub allergies: Vec<String>,
}

/// Partial update of the mutable profile fields; `None` keeps the value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfileUpdate {
    pub phone: Option<PhoneNumber>,
    pub address: Option<Address>,
    pub emergency_contact: Option<EmergencyContact>,
    pub insurance: Option<InsuranceInfo>,
    pub allergies: Option<Vec<String>>,
    pub chronic_conditions: Option<Vec<String>>,
    pub current_medications: Option<Vec<String>>,
}

/// Registered patient.
///
/// ## Invariants
/// - First and last names are trimmed and non-blank.
/// - Age at registration lies in `[0, 150]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    id: PatientId,
    user_id: UserId,
    first_name: String,
    last_name: String,
    date_of_birth: NaiveDate,
    gender: Gender,
    blood_type: BloodType,
    phone: PhoneNumber,
    email: Email,
    address: Address,
    emergency_contact: EmergencyContact,
    insurance: Option<InsuranceInfo>,
    allergies: Vec<String>,
    chronic_conditions: Vec<String>,
    current_medications: Vec<String>,
    active: bool,
    audit: Audit,
}

impl_entity!(Patient, PatientId, "Patient");

/// Whole years between `birth` and `today`.
pub fn age_on(birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birth.year();
    if (today.month(), today.day()) < (birth.month(), birth.day()) {
        age -= 1;
    }
    age
}

impl Patient {
    /// Validate a registration and produce an active patient linked to `user_id`.
    pub fn register(draft: PatientDraft, user_id: UserId, now: DateTime<Utc>) -> DomainResult<Self> {
        let today = now.date_naive();
        let patient = Self {
            id: PatientId::generate(),
            user_id,
            first_name: draft.first_name.trim().to_owned(),
            last_name: draft.last_name.trim().to_owned(),
            date_of_birth: draft.date_of_birth,
            gender: draft.gender,
            blood_type: draft.blood_type,
            phone: draft.phone,
            email: draft.email,
            address: draft.address,
            emergency_contact: draft.emergency_contact,
            insurance: draft.insurance,
            allergies: draft.allergies,
            chronic_conditions: Vec::new(),
            current_medications: Vec::new(),
            active: true,
            audit: Audit::new(now),
        };
        Self::validator(today).validate(patient)
    }

    fn validator(today: NaiveDate) -> Validator<Self> {
        Validator::new()
            .field_rule("firstName", "First name must not be blank", |p: &Self| {
                !p.first_name.is_empty()
            })
            .field_rule("lastName", "Last name must not be blank", |p: &Self| {
                !p.last_name.is_empty()
            })
            .field_rule(
                "dateOfBirth",
                "Patient must be at least 0 years old",
                move |p: &Self| age_on(p.date_of_birth, today) >= 0,
            )
            .field_rule(
                "dateOfBirth",
                "Patient cannot be more than 150 years old",
                move |p: &Self| age_on(p.date_of_birth, today) <= MAX_PATIENT_AGE,
            )
    }

    pub fn id(&self) -> &PatientId {
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
    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }
    pub fn gender(&self) -> Gender {
        self.gender
    }
    pub fn blood_type(&self) -> BloodType {
        self.blood_type
    }
    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }
    pub fn email(&self) -> &Email {
        &self.email
    }
    pub fn address(&self) -> &Address {
        &self.address
    }
    pub fn emergency_contact(&self) -> &EmergencyContact {
        &self.emergency_contact
    }
    pub fn insurance(&self) -> Option<&InsuranceInfo> {
        self.insurance.as_ref()
    }
    pub fn allergies(&self) -> &[String] {
        &self.allergies
    }
    pub fn chronic_conditions(&self) -> &[String] {
        &self.chronic_conditions
    }
    pub fn current_medications(&self) -> &[String] {
        &self.current_medications
    }
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn age(&self, today: NaiveDate) -> i32 {
        age_on(self.date_of_birth, today)
    }

    /// Case-insensitive allergy lookup.
    pub fn has_allergy(&self, substance: &str) -> bool {
        let substance = substance.trim();
        self.allergies
            .iter()
            .any(|allergy| allergy.trim().eq_ignore_ascii_case(substance))
    }

    pub fn has_active_insurance(&self, today: NaiveDate) -> bool {
        self.insurance
            .as_ref()
            .is_some_and(|insurance| insurance.is_active() && !insurance.is_expired(today))
    }

    /// Apply the provided profile fields.
    pub fn update_profile(&self, update: PatientProfileUpdate, now: DateTime<Utc>) -> Self {
        let current = self.clone();
        Self {
            phone: update.phone.unwrap_or(current.phone),
            address: update.address.unwrap_or(current.address),
            emergency_contact: update.emergency_contact.unwrap_or(current.emergency_contact),
            insurance: update.insurance.or(current.insurance),
            allergies: update.allergies.unwrap_or(current.allergies),
            chronic_conditions: update
                .chronic_conditions
                .unwrap_or(current.chronic_conditions),
            current_medications: update
                .current_medications
                .unwrap_or(current.current_medications),
            audit: current.audit.touched(now),
            ..current
        }
    }

    pub fn deactivate(&self, now: DateTime<Utc>) -> Self {
        Self {
            active: false,
            audit: self.audit.touched(now),
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests;
