//! Identity and audit metadata shared by stored entities.

use std::fmt::Display;
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation and modification bookkeeping.
///
/// ## Invariants
/// - `revision` starts at 1 and only the repository bumps it.
/// - `updated_at` is never earlier than `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub revision: u32,
}

impl Audit {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            revision: 1,
        }
    }

    /// Record a modification at `now`.
    pub fn touched(self, now: DateTime<Utc>) -> Self {
        Self {
            updated_at: now.max(self.created_at),
            ..self
        }
    }

    /// Next revision after a successful write.
    pub fn bumped(self) -> Self {
        Self {
            revision: self.revision.saturating_add(1),
            ..self
        }
    }
}

/// Stored record with a stable identity.
pub trait Entity: Clone + Send + Sync + 'static {
    type Id: Clone + Eq + Hash + Display + Send + Sync + 'static;

    /// Name used in not-found and conflict messages.
    const NAME: &'static str;

    fn id(&self) -> &Self::Id;

    fn audit(&self) -> &Audit;

    /// Replace the audit metadata, keeping every other field.
    fn with_audit(self, audit: Audit) -> Self;

    fn revision(&self) -> u32 {
        self.audit().revision
    }
}

/// Implement [`Entity`] for a struct with `id` and `audit` fields.
macro_rules! impl_entity {
    ($ty:ty, $id:ty, $name:literal) => {
        impl $crate::domain::Entity for $ty {
            type Id = $id;

            const NAME: &'static str = $name;

            fn id(&self) -> &Self::Id {
                &self.id
            }

            fn audit(&self) -> &$crate::domain::Audit {
                &self.audit
            }

            fn with_audit(self, audit: $crate::domain::Audit) -> Self {
                Self { audit, ..self }
            }
        }
    };
}

pub(crate) use impl_entity;
