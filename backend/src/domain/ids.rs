//! Prefixed identity newtypes.
//!
//! Clinical identities carry a fixed number of random digits after their
//! prefix. Operational identities (prescriptions, invoices, payments, users,
//! stock items, reports) are opaque: prefix, millisecond timestamp and a
//! random suffix.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use rand::Rng;
use regex::Regex;

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern)
        .unwrap_or_else(|error| panic!("identifier regex {pattern} failed to compile: {error}"))
}

fn random_digits(count: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut digits = String::with_capacity(count);
    // Leading digit is non-zero so the width never shrinks when parsed as a number.
    digits.push(char::from(b'1' + rng.gen_range(0..9)));
    for _ in 1..count {
        digits.push(char::from(b'0' + rng.gen_range(0..10)));
    }
    digits
}

fn timestamped(prefix: &str, now: DateTime<Utc>) -> String {
    format!(
        "{prefix}{}{}",
        now.timestamp_millis().max(0),
        random_digits(4)
    )
}

macro_rules! define_id {
    (@common $(#[$meta:meta])* $name:ident, $entity:literal, $pattern:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Validate and construct the identifier.
            pub fn new(value: impl Into<String>) -> $crate::domain::DomainResult<Self> {
                Self::from_owned(value.into())
            }

            fn from_owned(value: String) -> $crate::domain::DomainResult<Self> {
                static PATTERN: OnceLock<Regex> = OnceLock::new();
                if PATTERN.get_or_init(|| compile($pattern)).is_match(&value) {
                    Ok(Self(value))
                } else {
                    Err($crate::domain::DomainError::invalid_field(
                        "id",
                        format!("{} id must match {}: got {value:?}", $entity, $pattern),
                    ))
                }
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::domain::DomainError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::from_owned(value)
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::DomainError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::new(value)
            }
        }
    };

    ($(#[$meta:meta])* $name:ident, entity = $entity:literal, prefix = $prefix:literal, digits = $digits:literal, pattern = $pattern:literal) => {
        define_id!(@common $(#[$meta])* $name, $entity, $pattern);

        impl $name {
            /// Fresh identifier with random digits.
            pub fn generate() -> Self {
                Self(format!("{}{}", $prefix, random_digits($digits)))
            }
        }
    };

    ($(#[$meta:meta])* $name:ident, entity = $entity:literal, prefix = $prefix:literal, pattern = $pattern:literal) => {
        define_id!(@common $(#[$meta])* $name, $entity, $pattern);

        impl $name {
            /// Fresh identifier stamped with `now`.
            pub fn generate(now: DateTime<Utc>) -> Self {
                Self(timestamped($prefix, now))
            }
        }
    };
}

define_id!(
    /// Patient identity: `PAT` followed by eight digits.
    PatientId, entity = "Patient", prefix = "PAT", digits = 8, pattern = r"^PAT\d{8}$"
);
define_id!(
    /// Doctor identity: `DOC` followed by ten digits.
    DoctorId, entity = "Doctor", prefix = "DOC", digits = 10, pattern = r"^DOC\d{10}$"
);
define_id!(
    /// Appointment identity: `APT` followed by ten digits.
    AppointmentId, entity = "Appointment", prefix = "APT", digits = 10, pattern = r"^APT\d{10}$"
);
define_id!(
    PrescriptionId, entity = "Prescription", prefix = "RX", pattern = r"^RX[0-9A-Za-z]+$"
);
define_id!(InvoiceId, entity = "Invoice", prefix = "INV", pattern = r"^INV[0-9A-Za-z]+$");
define_id!(PaymentId, entity = "Payment", prefix = "PAY", pattern = r"^PAY[0-9A-Za-z]+$");
define_id!(UserId, entity = "User", prefix = "USR", pattern = r"^USR[0-9A-Za-z]+$");
define_id!(
    /// Pharmacy stock item identity.
    InventoryItemId, entity = "InventoryItem", prefix = "ITM", pattern = r"^ITM[0-9A-Za-z]+$"
);
define_id!(
    MedicalReportId, entity = "MedicalReport", prefix = "MR", pattern = r"^MR[0-9A-Za-z]+$"
);
