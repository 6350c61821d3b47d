//! Internal helpers shared by the domain services.

use std::future::Future;
use std::time::Duration;

use tracing::{debug, warn};

use crate::domain::ports::RepositoryError;
use crate::domain::{Currency, DomainError, DomainResult};

/// Tunables applied by every service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePolicy {
    /// Upper bound on a single repository call.
    pub repository_timeout: Duration,
    /// Invoice due date offset when a request gives none.
    pub invoice_due_days: i64,
    /// Prescription validity when a request gives none.
    pub prescription_validity_days: u32,
    /// Currency the statistics totals are reported in.
    pub reporting_currency: Currency,
}

impl Default for ServicePolicy {
    fn default() -> Self {
        Self {
            repository_timeout: Duration::from_millis(5_000),
            invoice_due_days: 30,
            prescription_validity_days: 30,
            reporting_currency: Currency::Egp,
        }
    }
}

pub(crate) fn map_repository_error(error: RepositoryError) -> DomainError {
    match &error {
        RepositoryError::NotFound { entity, id } => {
            DomainError::not_found(entity.as_str(), id.as_str())
        }
        RepositoryError::Conflict { message } => DomainError::conflict(message.as_str()),
        RepositoryError::Connection { .. } => {
            DomainError::system_caused_by("Repository unavailable", &error)
        }
        RepositoryError::Query { .. } => {
            DomainError::system_caused_by("Repository query failed", &error)
        }
    }
}

/// Await a repository call under the policy's deadline.
///
/// Adapter errors are mapped with [`map_repository_error`]; an elapsed
/// deadline becomes [`DomainError::System`].
pub(crate) async fn bounded<T>(
    policy: &ServicePolicy,
    operation: &'static str,
    call: impl Future<Output = Result<T, RepositoryError>>,
) -> DomainResult<T> {
    match tokio::time::timeout(policy.repository_timeout, call).await {
        Ok(Ok(value)) => Ok(value),
        Ok(Err(error)) => {
            debug!(operation, %error, "repository call failed");
            Err(map_repository_error(error))
        }
        Err(_elapsed) => {
            let timeout_ms = policy.repository_timeout.as_millis();
            warn!(operation, timeout_ms, "repository call timed out");
            Err(DomainError::system(format!(
                "{operation} timed out after {timeout_ms} ms"
            )))
        }
    }
}
