//! Driving port for the hospital dashboard figures.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{DomainResult, Money};

/// Point-in-time dashboard counters and totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HospitalStatistics {
    pub total_patients: usize,
    /// Appointments scheduled on the local calendar day.
    pub today_appointments: usize,
    pub completed_today: usize,
    /// Scheduled or confirmed, across all dates.
    pub pending_appointments: usize,
    /// Sum of paid invoice totals.
    pub total_revenue: Money,
    /// Sum of outstanding balances on open invoices.
    pub outstanding_payments: Money,
}

#[async_trait]
pub trait StatisticsQuery: Send + Sync {
    async fn hospital_statistics(&self) -> DomainResult<HospitalStatistics>;
}
