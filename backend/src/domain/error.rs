//! Domain-level error taxonomy.
//!
//! These errors are transport agnostic. Every fallible domain operation and
//! every use-case service returns [`DomainResult`], and callers decide how to
//! render a failure. Adapters never leak their own error types past the
//! service boundary: services map them into one of the variants below.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used across entities, ports and services.
///
/// # Examples
/// ```
/// use healthcore::domain::{DomainError, DomainResult};
///
/// fn lookup() -> DomainResult<u32> {
///     Err(DomainError::not_found("Patient", "PAT12345678"))
/// }
///
/// assert!(lookup().is_err());
/// ```
pub type DomainResult<T> = Result<T, DomainError>;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed input or a construction-time invariant breach.
    ValidationError,
    /// A legal state where the requested transition or action is forbidden.
    BusinessRuleViolation,
    /// The referenced identity does not exist.
    NotFound,
    /// Authentication or authorisation failed.
    Unauthorized,
    /// Duplicate identity, duplicate sub-resource or stale write.
    Conflict,
    /// An unexpected collaborator fault.
    SystemError,
}

impl ErrorCode {
    /// Wire representation of the code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::BusinessRuleViolation => "BUSINESS_RULE_VIOLATION",
            Self::NotFound => "NOT_FOUND",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Conflict => "CONFLICT",
            Self::SystemError => "SYSTEM_ERROR",
        }
    }
}

/// Closed set of domain failures.
///
/// ## Invariants
/// - Every variant carries a human-readable message (see [`Self::message`]).
/// - `NotFound` renders its message from `entity` and `id`.
///
/// # Examples
/// ```
/// use healthcore::domain::{DomainError, ErrorCode};
///
/// let err = DomainError::not_found("Appointment", "APT0000000001");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "Appointment with id APT0000000001 not found");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Input failed validation.
    #[error("{message}")]
    Validation {
        message: String,
        field: Option<String>,
    },
    /// The entity is in a state that forbids the requested action.
    #[error("{message}")]
    BusinessRule { message: String },
    /// The identity could not be resolved.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: String, id: String },
    /// The caller is not allowed to perform the action.
    #[error("{message}")]
    Unauthorized { message: String },
    /// Duplicate identity or stale revision.
    #[error("{message}")]
    Conflict { message: String },
    /// A collaborator failed unexpectedly.
    #[error("{message}")]
    System {
        message: String,
        cause: Option<String>,
    },
}

impl DomainError {
    /// Convenience constructor for [`ErrorCode::ValidationError`].
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: None,
        }
    }

    /// Validation failure attributed to a named input field.
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Convenience constructor for [`ErrorCode::BusinessRuleViolation`].
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::BusinessRule {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ErrorCode::Conflict`].
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// Convenience constructor for [`ErrorCode::SystemError`].
    pub fn system(message: impl Into<String>) -> Self {
        Self::System {
            message: message.into(),
            cause: None,
        }
    }

    /// System failure wrapping the collaborator's own error.
    pub fn system_caused_by(message: impl Into<String>, cause: &dyn std::error::Error) -> Self {
        Self::System {
            message: message.into(),
            cause: Some(cause.to_string()),
        }
    }

    /// Stable machine-readable error code.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::ValidationError,
            Self::BusinessRule { .. } => ErrorCode::BusinessRuleViolation,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Unauthorized { .. } => ErrorCode::Unauthorized,
            Self::Conflict { .. } => ErrorCode::Conflict,
            Self::System { .. } => ErrorCode::SystemError,
        }
    }

    /// Human-readable message returned to callers.
    pub fn message(&self) -> String {
        self.to_string()
    }

    /// Offending field for validation failures, when known.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Validation { field, .. } => field.as_deref(),
            _ => None,
        }
    }

    /// Underlying collaborator fault for system failures, when captured.
    pub fn cause(&self) -> Option<&str> {
        match self {
            Self::System { cause, .. } => cause.as_deref(),
            _ => None,
        }
    }

    /// Serialisable payload for presentation layers.
    pub fn payload(&self) -> ErrorPayload {
        let (entity, id) = match self {
            Self::NotFound { entity, id } => (Some(entity.clone()), Some(id.clone())),
            _ => (None, None),
        };
        ErrorPayload {
            code: self.code(),
            message: self.message(),
            field: self.field().map(str::to_owned),
            entity,
            id,
        }
    }
}

/// Flat representation of a [`DomainError`] for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl Serialize for DomainError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.payload().serialize(serializer)
    }
}

/// Consumption helpers mirroring the two-way outcome vocabulary.
///
/// `map` and `and_then` come from [`Result`] itself; `and_then` over an
/// `Err` returns that same error untouched.
pub trait DomainResultExt<T> {
    /// Collapse the outcome into a single value.
    fn fold<R>(self, on_success: impl FnOnce(T) -> R, on_failure: impl FnOnce(DomainError) -> R)
    -> R;

    /// Return the success value or compute a fallback.
    fn get_or_else(self, default: impl FnOnce() -> T) -> T;
}

impl<T> DomainResultExt<T> for DomainResult<T> {
    fn fold<R>(
        self,
        on_success: impl FnOnce(T) -> R,
        on_failure: impl FnOnce(DomainError) -> R,
    ) -> R {
        match self {
            Ok(value) => on_success(value),
            Err(error) => on_failure(error),
        }
    }

    fn get_or_else(self, default: impl FnOnce() -> T) -> T {
        self.unwrap_or_else(|_| default())
    }
}
