//! Tests for patient registration and profile maintenance.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 9, 0, 0)
        .single()
        .expect("valid fixture time")
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn phone() -> PhoneNumber {
    PhoneNumber::new("+201001234567").expect("phone")
}

#[fixture]
fn draft() -> PatientDraft {
    PatientDraft {
        first_name: "  Nour ".to_owned(),
        last_name: "Hassan".to_owned(),
        date_of_birth: date(1990, 6, 16),
        gender: Gender::Female,
        blood_type: BloodType::OPositive,
        phone: phone(),
        email: Email::new("nour@example.com").expect("email"),
        address: Address {
            street: "5 Tahrir Sq".into(),
            city: "Cairo".into(),
            state: "Cairo".into(),
            zip_code: "11511".into(),
            country: "Egypt".into(),
        },
        emergency_contact: EmergencyContact {
            name: "Omar Hassan".into(),
            relationship: "Brother".into(),
            phone: phone(),
        },
        insurance: None,
        allergies: vec!["Penicillin".to_owned()],
    }
}

fn user_id(now: DateTime<Utc>) -> UserId {
    UserId::generate(now)
}

#[rstest]
fn register_trims_names_and_activates(draft: PatientDraft, now: DateTime<Utc>) {
    let patient = Patient::register(draft, user_id(now), now).expect("valid patient");
    assert_eq!(patient.first_name(), "Nour");
    assert_eq!(patient.full_name(), "Nour Hassan");
    assert!(patient.is_active());
    assert!(PatientId::new(patient.id().as_str()).is_ok());
}

#[rstest]
fn age_counts_completed_years(draft: PatientDraft, now: DateTime<Utc>) {
    let patient = Patient::register(draft, user_id(now), now).expect("valid patient");
    assert_eq!(patient.age(now.date_naive()), 35, "birthday is tomorrow");
    assert_eq!(patient.age(date(2026, 6, 16)), 36);
}

#[rstest]
#[case::blank_first("  ", "Hassan", date(1990, 1, 1), "First name must not be blank")]
#[case::blank_last("Nour", "", date(1990, 1, 1), "Last name must not be blank")]
#[case::unborn("Nour", "Hassan", date(2027, 1, 1), "Patient must be at least 0 years old")]
#[case::too_old("Nour", "Hassan", date(1870, 1, 1), "Patient cannot be more than 150 years old")]
fn register_rejects_invalid_patients(
    draft: PatientDraft,
    now: DateTime<Utc>,
    #[case] first: &str,
    #[case] last: &str,
    #[case] born: NaiveDate,
    #[case] message: &str,
) {
    let invalid = PatientDraft {
        first_name: first.to_owned(),
        last_name: last.to_owned(),
        date_of_birth: born,
        ..draft
    };
    let err = Patient::register(invalid, user_id(now), now).expect_err("invalid patient");
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(err.message(), message);
}

#[rstest]
#[case("penicillin", true)]
#[case(" PENICILLIN ", true)]
#[case("latex", false)]
fn allergy_lookup_ignores_case(
    draft: PatientDraft,
    now: DateTime<Utc>,
    #[case] substance: &str,
    #[case] expected: bool,
) {
    let patient = Patient::register(draft, user_id(now), now).expect("valid patient");
    assert_eq!(patient.has_allergy(substance), expected);
}

#[rstest]
fn insurance_coverage_is_bounded() {
    let err = InsuranceInfo::new("Allianz", "P-1", None, 101, date(2030, 1, 1))
        .expect_err("over 100 percent");
    assert_eq!(err.field(), Some("coveragePercentage"));
    assert!(InsuranceInfo::new("Allianz", "P-1", None, 100, date(2030, 1, 1)).is_ok());
}

#[rstest]
fn active_insurance_requires_an_unexpired_active_policy(draft: PatientDraft, now: DateTime<Utc>) {
    let policy = InsuranceInfo::new("Allianz", "P-1", None, 80, date(2026, 12, 31)).expect("policy");
    let insured = PatientDraft {
        insurance: Some(policy.clone()),
        ..draft
    };
    let patient = Patient::register(insured, user_id(now), now).expect("valid patient");
    let today = now.date_naive();

    assert!(patient.has_active_insurance(today));
    assert!(!patient.has_active_insurance(date(2027, 1, 1)));

    let lapsed = patient.update_profile(
        PatientProfileUpdate {
            insurance: Some(policy.deactivated()),
            ..PatientProfileUpdate::default()
        },
        now,
    );
    assert!(!lapsed.has_active_insurance(today));
}

#[rstest]
fn profile_update_keeps_unspecified_fields(draft: PatientDraft, now: DateTime<Utc>) {
    let patient = Patient::register(draft, user_id(now), now).expect("valid patient");
    let later = now + chrono::Duration::hours(1);
    let updated = patient.update_profile(
        PatientProfileUpdate {
            chronic_conditions: Some(vec!["Asthma".to_owned()]),
            ..PatientProfileUpdate::default()
        },
        later,
    );

    assert_eq!(updated.chronic_conditions(), ["Asthma".to_owned()]);
    assert_eq!(updated.allergies(), patient.allergies());
    assert_eq!(updated.phone(), patient.phone());
    assert_eq!(updated.id(), patient.id());
}
