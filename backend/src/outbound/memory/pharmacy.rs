//! In-memory prescription and pharmacy stock storage.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::debug;

use crate::domain::prescription::dispensable_at;
use crate::domain::ports::{InventoryRepository, PrescriptionRepository, RepositoryError};
use crate::domain::{DoctorId, InventoryItem, PatientId, Prescription, Specification};

use super::InMemoryRepository;
use super::store::checked_update;

#[async_trait]
impl PrescriptionRepository for InMemoryRepository<Prescription> {
    async fn find_by_patient(
        &self,
        patient_id: &PatientId,
    ) -> Result<Vec<Prescription>, RepositoryError> {
        Ok(self.select(|p| p.patient_id() == patient_id).await)
    }

    async fn find_by_doctor(
        &self,
        doctor_id: &DoctorId,
    ) -> Result<Vec<Prescription>, RepositoryError> {
        Ok(self.select(|p| p.doctor_id() == doctor_id).await)
    }

    async fn find_pending_for_dispensing(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Prescription>, RepositoryError> {
        let dispensable = dispensable_at(now);
        Ok(self.select(|p| dispensable.is_satisfied_by(p)).await)
    }

    async fn find_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<Prescription>, RepositoryError> {
        Ok(self.select(|p| p.is_expired(now)).await)
    }
}

#[async_trait]
impl InventoryRepository for InMemoryRepository<InventoryItem> {
    async fn find_by_name(&self, name: &str) -> Result<Option<InventoryItem>, RepositoryError> {
        Ok(self.first(|item| item.is_named(name)).await)
    }

    async fn find_low_stock(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        Ok(self.select(InventoryItem::is_low_stock).await)
    }

    async fn find_expiring_soon(
        &self,
        days: u32,
        now: DateTime<Utc>,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        Ok(self.select(|item| item.expires_within(days, now)).await)
    }

    async fn find_expired(
        &self,
        now: DateTime<Utc>,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        Ok(self.select(|item| item.is_expired(now)).await)
    }

    async fn search_medications(
        &self,
        query: &str,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        Ok(self.select(|item| item.matches_query(query)).await)
    }

    async fn update_all(
        &self,
        items: Vec<InventoryItem>,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        let mut records = self.records().write().await;
        let staged = items
            .into_iter()
            .map(|item| checked_update(&records, item))
            .collect::<Result<Vec<_>, _>>()?;
        for item in &staged {
            records.insert(item.id().clone(), item.clone());
        }
        debug!(items = staged.len(), "inventory batch committed");
        Ok(staged)
    }
}
