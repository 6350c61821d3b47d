//! Service tunables loaded via OrthoConfig.
//!
//! Values layer defaults, a configuration file, `HEALTHCORE_*` environment
//! variables and command-line flags, and convert into the domain
//! [`ServicePolicy`].

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::prescription::VALIDITY_DAYS;
use crate::domain::{Currency, ServicePolicy};

const DEFAULT_REPOSITORY_TIMEOUT_MS: u64 = 5_000;
const DEFAULT_INVOICE_DUE_DAYS: i64 = 30;
const DEFAULT_PRESCRIPTION_VALIDITY_DAYS: u32 = 30;
const DEFAULT_REPORTING_CURRENCY: Currency = Currency::Egp;

/// Settings that cannot be turned into a [`ServicePolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("{field} must be positive")]
    NotPositive { field: &'static str },
    #[error("prescription validity must be between 1 and 365 days, got {days}")]
    ValidityOutOfRange { days: u32 },
    #[error("unsupported reporting currency {code:?}")]
    UnknownCurrency { code: String },
}

fn default_reporting_currency() -> String {
    DEFAULT_REPORTING_CURRENCY.code().to_owned()
}

/// Configuration values applied by every service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "HEALTHCORE")]
pub struct HealthcoreSettings {
    /// Upper bound on one repository call, in milliseconds.
    #[ortho_config(default = DEFAULT_REPOSITORY_TIMEOUT_MS)]
    pub repository_timeout_ms: u64,
    /// Days until an invoice falls due when a request gives none.
    #[ortho_config(default = DEFAULT_INVOICE_DUE_DAYS)]
    pub invoice_due_days: i64,
    /// Prescription validity in days when a request gives none.
    #[ortho_config(default = DEFAULT_PRESCRIPTION_VALIDITY_DAYS)]
    pub prescription_validity_days: u32,
    /// ISO 4217 code of the statistics reporting currency.
    #[ortho_config(default = default_reporting_currency())]
    pub reporting_currency: String,
}

impl Default for HealthcoreSettings {
    fn default() -> Self {
        Self {
            repository_timeout_ms: DEFAULT_REPOSITORY_TIMEOUT_MS,
            invoice_due_days: DEFAULT_INVOICE_DUE_DAYS,
            prescription_validity_days: DEFAULT_PRESCRIPTION_VALIDITY_DAYS,
            reporting_currency: default_reporting_currency(),
        }
    }
}

impl HealthcoreSettings {
    pub fn repository_timeout(&self) -> Duration {
        Duration::from_millis(self.repository_timeout_ms)
    }

    pub fn reporting_currency(&self) -> Result<Currency, SettingsError> {
        self.reporting_currency
            .parse()
            .map_err(|_| SettingsError::UnknownCurrency {
                code: self.reporting_currency.clone(),
            })
    }

    /// Validate the settings and build the policy handed to services.
    pub fn service_policy(&self) -> Result<ServicePolicy, SettingsError> {
        let repository_timeout = self.repository_timeout();
        if repository_timeout.is_zero() {
            return Err(SettingsError::NotPositive {
                field: "repository_timeout_ms",
            });
        }
        let invoice_due_days = self.invoice_due_days;
        if invoice_due_days <= 0 {
            return Err(SettingsError::NotPositive {
                field: "invoice_due_days",
            });
        }
        let prescription_validity_days = self.prescription_validity_days;
        if !VALIDITY_DAYS.contains(&prescription_validity_days) {
            return Err(SettingsError::ValidityOutOfRange {
                days: prescription_validity_days,
            });
        }
        Ok(ServicePolicy {
            repository_timeout,
            invoice_due_days,
            prescription_validity_days,
            reporting_currency: self.reporting_currency()?,
        })
    }
}
