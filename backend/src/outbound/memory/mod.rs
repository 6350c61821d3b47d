//! In-memory adapters for the repository ports.
//!
//! One generic [`InMemoryRepository`] implements the CRUD contract for every
//! entity; each entity-specific port is implemented on its instantiation.
//! Used by the walkthrough binary and the integration tests.

mod appointments;
mod billing;
mod medical_reports;
mod people;
mod pharmacy;
mod store;

pub use store::InMemoryRepository;

use crate::domain::{
    Appointment, Doctor, InventoryItem, Invoice, MedicalReport, Patient, Prescription, User,
};

pub type InMemoryAppointmentRepository = InMemoryRepository<Appointment>;
pub type InMemoryDoctorRepository = InMemoryRepository<Doctor>;
pub type InMemoryInventoryRepository = InMemoryRepository<InventoryItem>;
pub type InMemoryInvoiceRepository = InMemoryRepository<Invoice>;
pub type InMemoryMedicalReportRepository = InMemoryRepository<MedicalReport>;
pub type InMemoryPatientRepository = InMemoryRepository<Patient>;
pub type InMemoryPrescriptionRepository = InMemoryRepository<Prescription>;
pub type InMemoryUserRepository = InMemoryRepository<User>;
