//! Builders shared by the service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Address, Appointment, AppointmentDraft, AppointmentType, BloodType, Currency, Doctor,
    DoctorDraft, Email, EmergencyContact, Gender, InventoryItem, InventoryItemDraft,
    MedicalDepartment, Medication, Money, Patient, PatientDraft, PhoneNumber, Prescription,
    PrescriptionDraft, UserId,
};

/// Clock frozen at one instant.
pub(crate) struct FixtureClock {
    pub(crate) utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 5, 9, 0, 0)
        .single()
        .expect("valid fixture time")
}

pub(crate) fn clock_at(utc_now: DateTime<Utc>) -> Arc<dyn Clock> {
    Arc::new(FixtureClock { utc_now })
}

fn phone() -> PhoneNumber {
    PhoneNumber::new("+201001234567").expect("valid phone")
}

pub(crate) fn patient_draft(email: &str) -> PatientDraft {
    PatientDraft {
        first_name: "Salma".to_owned(),
        last_name: "Fathy".to_owned(),
        date_of_birth: NaiveDate::from_ymd_opt(1988, 3, 14).expect("valid date"),
        gender: Gender::Female,
        blood_type: BloodType::APositive,
        phone: phone(),
        email: Email::new(email).expect("valid email"),
        address: Address {
            street: "12 Corniche".into(),
            city: "Alexandria".into(),
            state: "Alexandria".into(),
            zip_code: "21500".into(),
            country: "Egypt".into(),
        },
        emergency_contact: EmergencyContact {
            name: "Hany Fathy".into(),
            relationship: "Husband".into(),
            phone: phone(),
        },
        insurance: None,
        allergies: Vec::new(),
    }
}

pub(crate) fn patient(now: DateTime<Utc>) -> Patient {
    Patient::register(patient_draft("salma@example.com"), UserId::generate(now), now)
        .expect("valid patient")
}

pub(crate) fn doctor(now: DateTime<Utc>) -> Doctor {
    Doctor::register(
        DoctorDraft {
            first_name: "Karim".to_owned(),
            last_name: "Mansour".to_owned(),
            specialization: MedicalDepartment::Cardiology,
            license_number: "EG-CARD-0042".to_owned(),
            qualifications: vec!["MBBCh".to_owned()],
            phone: phone(),
            email: Email::new("karim@hospital.example").expect("valid email"),
            consultation_fee: Money::from_units(500, Currency::Egp),
            years_of_experience: 12,
            available_time_slots: Vec::new(),
        },
        UserId::generate(now),
        now,
    )
    .expect("valid doctor")
}

pub(crate) fn appointment_draft(
    patient: &Patient,
    doctor: &Doctor,
    at: DateTime<Utc>,
) -> AppointmentDraft {
    AppointmentDraft {
        patient_id: patient.id().clone(),
        doctor_id: doctor.id().clone(),
        appointment_type: AppointmentType::Consultation,
        scheduled_time: at,
        duration_minutes: 30,
        reason: "Chest tightness".to_owned(),
    }
}

/// Appointment booked a day before `at` for the slot starting at `at`.
pub(crate) fn appointment_at(
    patient: &Patient,
    doctor: &Doctor,
    at: DateTime<Utc>,
) -> Appointment {
    Appointment::schedule(appointment_draft(patient, doctor, at), at - Duration::days(1))
        .expect("valid appointment")
}

/// Appointment walked through to COMPLETED at its own start time.
pub(crate) fn completed_appointment(
    patient: &Patient,
    doctor: &Doctor,
    at: DateTime<Utc>,
) -> Appointment {
    appointment_at(patient, doctor, at)
        .confirm(at)
        .and_then(|a| a.start(at))
        .and_then(|a| a.complete("Angina", None, at))
        .expect("valid lifecycle")
}

pub(crate) fn medication(name: &str, quantity: u32) -> Medication {
    Medication::new(name, "500mg", "twice daily", "7 days", "after meals", quantity)
        .expect("valid medication")
}

pub(crate) fn stock(name: &str, quantity: u32, now: DateTime<Utc>) -> InventoryItem {
    InventoryItem::create(
        InventoryItemDraft {
            medication_name: name.to_owned(),
            generic_name: name.to_owned(),
            manufacturer: "EIPICO".to_owned(),
            batch_number: "B-2026-10".to_owned(),
            expiry_date: now + Duration::days(365),
            quantity,
            unit_price: Money::from_units(20, Currency::Egp),
            reorder_level: 5,
            location: "Pharmacy A1".to_owned(),
        },
        now,
    )
    .expect("valid stock item")
}

pub(crate) fn prescription_for(
    appointment: &Appointment,
    medications: Vec<Medication>,
    now: DateTime<Utc>,
) -> Prescription {
    Prescription::create(
        PrescriptionDraft {
            patient_id: appointment.patient_id().clone(),
            doctor_id: appointment.doctor_id().clone(),
            appointment_id: appointment.id().clone(),
            medications,
            validity_days: 30,
            notes: None,
        },
        now,
    )
    .expect("valid prescription")
}
