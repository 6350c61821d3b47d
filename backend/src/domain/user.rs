//! Login accounts behind patients, doctors and staff.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::entity::impl_entity;
use super::{Audit, DomainResult, Email, UserId, Validator};

/// Minimum allowed password length.
pub const PASSWORD_MIN: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Patient,
    Doctor,
    Nurse,
    Pharmacist,
    Receptionist,
    Admin,
}

/// Salted SHA-256 digest of a password, hex encoded.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    fn digest(salt: &UserId, password: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_str().as_bytes());
        hasher.update(b":");
        hasher.update(password.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

fn password_validator() -> Validator<String> {
    Validator::new()
        .field_rule(
            "password",
            "Password must be at least 6 characters",
            |p: &String| p.chars().count() >= PASSWORD_MIN,
        )
        .field_rule("password", "Password must contain uppercases", |p: &String| {
            p.chars().any(char::is_uppercase)
        })
        .field_rule("password", "Password must contain digits", |p: &String| {
            p.chars().any(|c| c.is_ascii_digit())
        })
}

/// Account record. The plain password never leaves [`User::create`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    email: Email,
    #[serde(skip)]
    password_hash: PasswordHash,
    role: UserRole,
    active: bool,
    audit: Audit,
}

impl_entity!(User, UserId, "User");

impl User {
    /// Check the password rules, hash the password and create an active account.
    pub fn create(
        email: Email,
        password: &str,
        role: UserRole,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        let password = password_validator().validate(password.to_owned())?;
        let id = UserId::generate(now);
        let password_hash = PasswordHash::digest(&id, &password);
        Ok(Self {
            id,
            email,
            password_hash,
            role,
            active: true,
            audit: Audit::new(now),
        })
    }

    pub fn id(&self) -> &UserId {
        &self.id
    }
    pub fn email(&self) -> &Email {
        &self.email
    }
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }
    pub fn role(&self) -> UserRole {
        self.role
    }
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn verify_password(&self, candidate: &str) -> bool {
        PasswordHash::digest(&self.id, candidate) == self.password_hash
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
