//! Hospital dashboard aggregation.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    AppointmentRepository, HospitalStatistics, InvoiceRepository, PatientRepository,
    StatisticsQuery,
};
use crate::domain::service_support::bounded;
use crate::domain::{
    AppointmentStatus, Currency, DomainError, DomainResult, InvoiceStatus, Money, ServicePolicy,
};

/// Statistics service implementing the dashboard driving port.
#[derive(Clone)]
pub struct StatisticsService<P, A, V> {
    patients: Arc<P>,
    appointments: Arc<A>,
    invoices: Arc<V>,
    clock: Arc<dyn Clock>,
    policy: ServicePolicy,
}

impl<P, A, V> StatisticsService<P, A, V> {
    pub fn new(
        patients: Arc<P>,
        appointments: Arc<A>,
        invoices: Arc<V>,
        clock: Arc<dyn Clock>,
        policy: ServicePolicy,
    ) -> Self {
        Self {
            patients,
            appointments,
            invoices,
            clock,
            policy,
        }
    }
}

fn total(currency: Currency, mut amounts: impl Iterator<Item = Money>) -> DomainResult<Money> {
    amounts.try_fold(Money::zero(currency), |acc, next| acc.plus(&next))
}

#[async_trait]
impl<P, A, V> StatisticsQuery for StatisticsService<P, A, V>
where
    P: PatientRepository,
    A: AppointmentRepository,
    V: InvoiceRepository,
{
    async fn hospital_statistics(&self) -> DomainResult<HospitalStatistics> {
        let (patients, appointments, invoices) = tokio::try_join!(
            bounded(&self.policy, "patients.find_all", self.patients.find_all()),
            bounded(
                &self.policy,
                "appointments.find_all",
                self.appointments.find_all()
            ),
            bounded(&self.policy, "invoices.find_all", self.invoices.find_all()),
        )?;

        let currency = self.policy.reporting_currency;
        if let Some(foreign) = invoices.iter().find(|i| i.currency() != currency) {
            return Err(DomainError::invalid_field(
                "currency",
                format!(
                    "Invoice {} is in {} but statistics are reported in {currency}",
                    foreign.id(),
                    foreign.currency()
                ),
            ));
        }

        let local = self.clock.local();
        let today = local.date_naive();
        let zone = local.timezone();
        let (today_appointments, completed_today) = appointments
            .iter()
            .filter(|a| a.scheduled_time().with_timezone(&zone).date_naive() == today)
            .fold((0, 0), |(all, done), a| {
                (all + 1, done + usize::from(a.status() == AppointmentStatus::Completed))
            });
        let pending_appointments = appointments
            .iter()
            .filter(|a| {
                matches!(
                    a.status(),
                    AppointmentStatus::Scheduled | AppointmentStatus::Confirmed
                )
            })
            .count();

        let total_revenue = total(
            currency,
            invoices
                .iter()
                .filter(|i| i.status() == InvoiceStatus::Paid)
                .map(|i| i.total_amount()),
        )?;
        let outstanding_payments = total(
            currency,
            invoices
                .iter()
                .filter(|i| i.status().is_open())
                .map(|i| i.outstanding_balance()),
        )?;

        let statistics = HospitalStatistics {
            total_patients: patients.len(),
            today_appointments,
            completed_today,
            pending_appointments,
            total_revenue,
            outstanding_payments,
        };
        debug!(?statistics, "hospital statistics aggregated");
        Ok(statistics)
    }
}
