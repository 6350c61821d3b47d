//! In-memory invoice storage and revenue reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::ports::{InvoiceRepository, RepositoryError};
use crate::domain::{Currency, Invoice, InvoiceStatus, Money, PatientId};

use super::InMemoryRepository;

#[async_trait]
impl InvoiceRepository for InMemoryRepository<Invoice> {
    async fn find_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<Invoice>, RepositoryError> {
        Ok(self.select(|i| i.patient_id() == patient_id).await)
    }

    async fn find_by_status(
        &self,
        status: InvoiceStatus,
    ) -> Result<Vec<Invoice>, RepositoryError> {
        Ok(self.select(|i| i.status() == status).await)
    }

    async fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Invoice>, RepositoryError> {
        Ok(self.select(|i| i.is_overdue(now)).await)
    }

    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Invoice>, RepositoryError> {
        let mut found = self
            .select(|i| (start..=end).contains(&i.created_at()))
            .await;
        found.sort_by_key(Invoice::created_at);
        Ok(found)
    }

    async fn get_total_revenue(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        currency: Currency,
    ) -> Result<Money, RepositoryError> {
        let paid = self
            .select(|i| {
                i.status() == InvoiceStatus::Paid && (start..=end).contains(&i.created_at())
            })
            .await;
        paid.iter()
            .try_fold(Money::zero(currency), |total, invoice| {
                total.plus(&invoice.total_amount())
            })
            .map_err(|error| RepositoryError::query(error.to_string()))
    }
}
