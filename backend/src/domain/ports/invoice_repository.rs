//! Port for invoice persistence and revenue reads.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{Currency, Invoice, InvoiceId, InvoiceStatus, Money, PatientId};

use super::{Repository, RepositoryError};

#[async_trait]
pub trait InvoiceRepository: Repository<Entity = Invoice, Id = InvoiceId> {
    async fn find_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<Invoice>, RepositoryError>;

    async fn find_by_status(&self, status: InvoiceStatus)
    -> Result<Vec<Invoice>, RepositoryError>;

    /// Pending invoices past their due date at `now`.
    async fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Invoice>, RepositoryError>;

    /// Invoices created within `[start, end]`.
    async fn find_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<Invoice>, RepositoryError>;

    /// Sum of paid invoice totals created within `[start, end]`.
    ///
    /// Invoices in another currency fail the read with `Query`.
    async fn get_total_revenue(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        currency: Currency,
    ) -> Result<Money, RepositoryError>;
}

#[cfg(test)]
mockall::mock! {
    pub InvoiceStore {}

    #[async_trait]
    impl Repository for InvoiceStore {
        type Entity = Invoice;
        type Id = InvoiceId;

        async fn find_by_id(&self, id: &InvoiceId) -> Result<Invoice, RepositoryError>;
        async fn save(&self, entity: Invoice) -> Result<Invoice, RepositoryError>;
        async fn update(&self, entity: Invoice) -> Result<Invoice, RepositoryError>;
        async fn delete(&self, id: &InvoiceId) -> Result<bool, RepositoryError>;
        async fn find_all(&self) -> Result<Vec<Invoice>, RepositoryError>;
    }

    #[async_trait]
    impl InvoiceRepository for InvoiceStore {
        async fn find_by_patient(
            &self,
            patient_id: &PatientId,
        ) -> Result<Vec<Invoice>, RepositoryError>;
        async fn find_by_status(
            &self,
            status: InvoiceStatus,
        ) -> Result<Vec<Invoice>, RepositoryError>;
        async fn find_overdue(&self, now: DateTime<Utc>) -> Result<Vec<Invoice>, RepositoryError>;
        async fn find_by_date_range(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
        ) -> Result<Vec<Invoice>, RepositoryError>;
        async fn get_total_revenue(
            &self,
            start: DateTime<Utc>,
            end: DateTime<Utc>,
            currency: Currency,
        ) -> Result<Money, RepositoryError>;
    }
}
