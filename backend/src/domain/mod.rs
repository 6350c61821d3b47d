//! Clinical and billing domain.
//!
//! Purpose: Define the hospital's entities, value objects and use-case
//! services. Entities are immutable: every transition takes `&self` plus an
//! explicit `now` and returns a new record or a [`DomainError`].
//!
//! Public surface:
//! - Error model: [`DomainError`], [`ErrorCode`], [`DomainResult`].
//! - Value objects: prefixed ids, [`Money`], [`Email`], [`PhoneNumber`].
//! - Entities: [`Patient`], [`Doctor`], [`Appointment`], [`Prescription`],
//!   [`InventoryItem`], [`Invoice`], [`User`], [`MedicalReport`].
//! - Services implementing the driving ports in [`ports`].

pub mod appointment;
pub mod contact;
pub mod doctor;
pub mod entity;
pub mod error;
pub mod ids;
pub mod inventory;
pub mod invoice;
pub mod medical_report;
pub mod money;
pub mod patient;
pub mod ports;
pub mod prescription;
pub mod user;
pub mod validation;

mod appointment_service;
mod billing_service;
mod inventory_service;
mod patient_service;
mod prescription_service;
mod service_support;
#[cfg(test)]
mod service_fixtures;
mod statistics_service;

pub use self::appointment::{
    Appointment, AppointmentDraft, AppointmentStatus, AppointmentType, MAX_DURATION_MINUTES,
    MIN_DURATION_MINUTES,
};
pub use self::contact::{Address, Email, EmergencyContact, PhoneNumber};
pub use self::doctor::{Doctor, DoctorDraft, MedicalDepartment, TimeSlot};
pub use self::entity::{Audit, Entity};
pub use self::error::{DomainError, DomainResult, DomainResultExt, ErrorCode, ErrorPayload};
pub use self::ids::{
    AppointmentId, DoctorId, InventoryItemId, InvoiceId, MedicalReportId, PatientId, PaymentId,
    PrescriptionId, UserId,
};
pub use self::inventory::{InventoryItem, InventoryItemDraft};
pub use self::invoice::{
    InsuranceClaim, InsuranceClaimStatus, Invoice, InvoiceDraft, InvoiceLineItem, InvoiceStatus,
    Payment, PaymentMethod,
};
pub use self::medical_report::{
    LabTest, MedicalReport, MedicalReportDraft, MedicalReportType, VitalSigns,
};
pub use self::money::{Currency, Money};
pub use self::patient::{
    BloodType, Gender, InsuranceInfo, Patient, PatientDraft, PatientProfileUpdate,
};
pub use self::prescription::{
    Medication, MedicationDemand, Prescription, PrescriptionDraft, PrescriptionStatus,
};
pub use self::user::{PasswordHash, User, UserRole};
pub use self::validation::{Specification, Validator, satisfy, spec};

pub use self::appointment_service::AppointmentService;
pub use self::billing_service::BillingService;
pub use self::inventory_service::InventoryService;
pub use self::patient_service::PatientService;
pub use self::prescription_service::PrescriptionService;
pub use self::service_support::ServicePolicy;
pub use self::statistics_service::StatisticsService;
