//! Hospital domain core.
//!
//! `domain` holds entities, value objects, ports and the use-case services;
//! `outbound::memory` provides in-process repository adapters; `config`
//! loads the service tunables.

pub mod config;
pub mod domain;
pub mod outbound;

pub use config::{HealthcoreSettings, SettingsError};
