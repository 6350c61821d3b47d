//! Tests for the domain user model.

use chrono::{DateTime, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;

#[fixture]
fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 8, 8, 0, 0)
        .single()
        .expect("valid fixture time")
}

#[fixture]
fn email() -> Email {
    Email::new("pharmacist@hospital.example").expect("valid email")
}

#[rstest]
fn create_hashes_the_password(email: Email, now: DateTime<Utc>) {
    let user = User::create(email, "Secret1", UserRole::Pharmacist, now).expect("valid user");

    assert_eq!(user.role(), UserRole::Pharmacist);
    assert!(user.is_active());
    assert_ne!(user.password_hash().as_str(), "Secret1");
    assert_eq!(user.password_hash().as_str().len(), 64);
    assert!(user.verify_password("Secret1"));
    assert!(!user.verify_password("secret1"));
}

#[rstest]
#[case("Ab1", "Password must be at least 6 characters")]
#[case("secret1", "Password must contain uppercases")]
#[case("Secrets", "Password must contain digits")]
fn create_enforces_password_rules(
    email: Email,
    now: DateTime<Utc>,
    #[case] password: &str,
    #[case] message: &str,
) {
    let err = User::create(email, password, UserRole::Patient, now).expect_err("weak password");
    assert_eq!(err.code(), ErrorCode::ValidationError);
    assert_eq!(err.message(), message);
    assert_eq!(err.field(), Some("password"));
}

#[rstest]
fn hashes_are_salted_per_user(email: Email, now: DateTime<Utc>) {
    let first = User::create(email.clone(), "Secret1", UserRole::Doctor, now).expect("user");
    let second = User::create(email, "Secret1", UserRole::Doctor, now).expect("user");
    if first.id() != second.id() {
        assert_ne!(first.password_hash(), second.password_hash());
    }
}

#[rstest]
fn serialised_user_omits_the_hash(email: Email, now: DateTime<Utc>) {
    let user = User::create(email, "Secret1", UserRole::Admin, now).expect("user");
    let value = serde_json::to_value(&user).expect("serialise");
    assert!(value.get("passwordHash").is_none());
    assert_eq!(value["role"], "ADMIN");
}
