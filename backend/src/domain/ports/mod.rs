//! Domain ports for the hexagonal boundary.
//!
//! Driven ports ([`Repository`] and its entity-specific extensions) are
//! implemented by adapters under `outbound`. Driving ports (`*Command`,
//! `*Query`) are implemented by the domain services.

mod macros;
pub(crate) use macros::define_port_error;

mod appointment_command;
mod appointment_repository;
mod billing_command;
mod doctor_repository;
mod inventory_command;
mod inventory_repository;
mod invoice_repository;
mod medical_report_repository;
mod patient_command;
mod patient_repository;
mod prescription_command;
mod prescription_repository;
mod repository;
mod statistics_query;
mod user_repository;

pub use appointment_command::{
    AppointmentCommand, AppointmentQuery, CancelAppointmentRequest, CompleteAppointmentRequest,
    PatientAppointmentsRequest,
};
#[cfg(test)]
pub use appointment_repository::MockAppointmentStore;
pub use appointment_repository::{AppointmentRepository, Booking};
pub use billing_command::{
    AddInsuranceClaimRequest, BillingCommand, GenerateInvoiceRequest, ProcessPaymentRequest,
};
pub use doctor_repository::DoctorRepository;
#[cfg(test)]
pub use doctor_repository::MockDoctorStore;
pub use inventory_command::InventoryCommand;
pub use inventory_repository::InventoryRepository;
#[cfg(test)]
pub use inventory_repository::MockInventoryStore;
pub use invoice_repository::InvoiceRepository;
#[cfg(test)]
pub use invoice_repository::MockInvoiceStore;
pub use medical_report_repository::MedicalReportRepository;
pub use patient_command::{
    PatientCommand, PatientQuery, RegisterPatientRequest, RegisteredPatient,
    UpdatePatientProfileRequest,
};
#[cfg(test)]
pub use patient_repository::MockPatientStore;
pub use patient_repository::PatientRepository;
pub use prescription_command::{
    CreatePrescriptionRequest, DispensePrescriptionRequest, PrescriptionCommand,
};
#[cfg(test)]
pub use prescription_repository::MockPrescriptionStore;
pub use prescription_repository::PrescriptionRepository;
pub use repository::{Repository, RepositoryError};
pub use statistics_query::{HospitalStatistics, StatisticsQuery};
#[cfg(test)]
pub use user_repository::MockUserStore;
pub use user_repository::UserRepository;
