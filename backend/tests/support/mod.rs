//! Shared wiring and builders for the in-memory integration tests.

use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use mockable::Clock;

use healthcore::domain::ports::{
    AppointmentCommand, CompleteAppointmentRequest, InventoryCommand, Repository,
};
use healthcore::domain::{
    Address, Appointment, AppointmentDraft, AppointmentService, AppointmentType, BillingService,
    BloodType, Currency, Doctor, DoctorDraft, DomainResult, Email, EmergencyContact, Gender,
    InventoryItem, InventoryItemDraft, InventoryService, MedicalDepartment, Medication, Money,
    Patient, PatientDraft, PhoneNumber, PrescriptionService, ServicePolicy, UserId,
};
use healthcore::outbound::memory::{
    InMemoryAppointmentRepository, InMemoryDoctorRepository, InMemoryInventoryRepository,
    InMemoryInvoiceRepository, InMemoryPatientRepository, InMemoryPrescriptionRepository,
};

/// Clock pinned to one instant.
pub struct FrozenClock(pub DateTime<Utc>);

impl Clock for FrozenClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

pub fn ward_round() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 12, 8, 0, 0)
        .single()
        .expect("valid test time")
}

/// Tomorrow at `hour:minute` relative to [`ward_round`].
pub fn tomorrow_at(hour: u32, minute: u32) -> DateTime<Utc> {
    (ward_round() + Duration::days(1))
        .date_naive()
        .and_hms_opt(hour, minute, 0)
        .expect("valid slot")
        .and_utc()
}

fn phone(digits: &str) -> PhoneNumber {
    PhoneNumber::new(format!("+2012{digits}")).expect("valid phone")
}

pub fn patient_draft(first_name: &str) -> PatientDraft {
    PatientDraft {
        first_name: first_name.to_owned(),
        last_name: "Soliman".to_owned(),
        date_of_birth: NaiveDate::from_ymd_opt(1984, 1, 30).expect("valid date"),
        gender: Gender::Male,
        blood_type: BloodType::AbPositive,
        phone: phone("30405060"),
        email: Email::new(format!("{}@example.com", first_name.to_lowercase()))
            .expect("valid email"),
        address: Address {
            street: "21 Port Said Street".into(),
            city: "Mansoura".into(),
            state: "Dakahlia".into(),
            zip_code: "35511".into(),
            country: "Egypt".into(),
        },
        emergency_contact: EmergencyContact {
            name: "Rania Soliman".into(),
            relationship: "Wife".into(),
            phone: phone("60504030"),
        },
        insurance: None,
        allergies: Vec::new(),
    }
}

pub fn patient(first_name: &str) -> Patient {
    Patient::register(
        patient_draft(first_name),
        UserId::generate(ward_round()),
        ward_round(),
    )
    .expect("valid patient")
}

pub fn doctor(fee: u64) -> Doctor {
    Doctor::register(
        DoctorDraft {
            first_name: "Mostafa".to_owned(),
            last_name: "Kamel".to_owned(),
            specialization: MedicalDepartment::InternalMedicine,
            license_number: "EG-IM-3301".to_owned(),
            qualifications: vec!["MBBCh".to_owned(), "MSc Internal Medicine".to_owned()],
            phone: phone("11223344"),
            email: Email::new("mostafa.kamel@hospital.example").expect("valid email"),
            consultation_fee: Money::from_units(fee, Currency::Egp),
            years_of_experience: 15,
            available_time_slots: Vec::new(),
        },
        UserId::generate(ward_round()),
        ward_round(),
    )
    .expect("valid doctor")
}

pub fn medication(name: &str, quantity: u32) -> Medication {
    Medication::new(name, "250mg", "three times daily", "5 days", "with water", quantity)
        .expect("valid medication")
}

pub fn stock_draft(name: &str, quantity: u32) -> InventoryItemDraft {
    InventoryItemDraft {
        medication_name: name.to_owned(),
        generic_name: name.to_owned(),
        manufacturer: "Minapharm".to_owned(),
        batch_number: "MP-26-10".to_owned(),
        expiry_date: ward_round() + Duration::days(400),
        quantity,
        unit_price: Money::from_units(8, Currency::Egp),
        reorder_level: 2,
        location: "Pharmacy C3".to_owned(),
    }
}

/// Services wired to fresh in-memory adapters and a frozen clock.
pub struct Hospital {
    pub patients: Arc<InMemoryPatientRepository>,
    pub doctors: Arc<InMemoryDoctorRepository>,
    pub appointments: AppointmentService<
        InMemoryAppointmentRepository,
        InMemoryPatientRepository,
        InMemoryDoctorRepository,
    >,
    pub prescriptions: PrescriptionService<
        InMemoryPrescriptionRepository,
        InMemoryAppointmentRepository,
        InMemoryInventoryRepository,
    >,
    pub inventory: InventoryService<InMemoryInventoryRepository>,
    pub billing: BillingService<
        InMemoryInvoiceRepository,
        InMemoryAppointmentRepository,
        InMemoryDoctorRepository,
    >,
    pub stock: Arc<InMemoryInventoryRepository>,
    pub prescription_store: Arc<InMemoryPrescriptionRepository>,
}

impl Hospital {
    pub fn open() -> Self {
        let clock: Arc<dyn Clock> = Arc::new(FrozenClock(ward_round()));
        let policy = ServicePolicy::default();
        let patients = Arc::new(InMemoryPatientRepository::new());
        let doctors = Arc::new(InMemoryDoctorRepository::new());
        let appointments = Arc::new(InMemoryAppointmentRepository::new());
        let prescription_store = Arc::new(InMemoryPrescriptionRepository::new());
        let stock = Arc::new(InMemoryInventoryRepository::new());
        let invoices = Arc::new(InMemoryInvoiceRepository::new());

        Self {
            appointments: AppointmentService::new(
                Arc::clone(&appointments),
                Arc::clone(&patients),
                Arc::clone(&doctors),
                Arc::clone(&clock),
                policy,
            ),
            prescriptions: PrescriptionService::new(
                Arc::clone(&prescription_store),
                Arc::clone(&appointments),
                Arc::clone(&stock),
                Arc::clone(&clock),
                policy,
            ),
            inventory: InventoryService::new(Arc::clone(&stock), Arc::clone(&clock), policy),
            billing: BillingService::new(
                invoices,
                appointments,
                Arc::clone(&doctors),
                clock,
                policy,
            ),
            patients,
            doctors,
            stock,
            prescription_store,
        }
    }

    pub async fn admit(&self, patient: Patient) -> Patient {
        self.patients.save(patient).await.expect("patient stored")
    }

    pub async fn hire(&self, doctor: Doctor) -> Doctor {
        self.doctors.save(doctor).await.expect("doctor stored")
    }

    pub async fn shelve(&self, name: &str, quantity: u32) -> InventoryItem {
        self.inventory
            .add_inventory_item(stock_draft(name, quantity))
            .await
            .expect("stock added")
    }

    pub async fn book(
        &self,
        patient: &Patient,
        doctor: &Doctor,
        at: DateTime<Utc>,
    ) -> DomainResult<Appointment> {
        self.appointments
            .schedule_appointment(AppointmentDraft {
                patient_id: patient.id().clone(),
                doctor_id: doctor.id().clone(),
                appointment_type: AppointmentType::Consultation,
                scheduled_time: at,
                duration_minutes: 30,
                reason: "Recurring fever".to_owned(),
            })
            .await
    }

    /// Book, confirm, start and complete one visit.
    pub async fn finished_visit(&self, patient: &Patient, doctor: &Doctor) -> Appointment {
        let booked = self
            .book(patient, doctor, tomorrow_at(9, 0))
            .await
            .expect("slot is free");
        self.appointments
            .confirm_appointment(booked.id())
            .await
            .expect("confirmable");
        self.appointments
            .start_appointment(booked.id())
            .await
            .expect("startable");
        self.appointments
            .complete_appointment(CompleteAppointmentRequest {
                appointment_id: booked.id().clone(),
                diagnosis: "Typhoid fever".to_owned(),
                prescription_id: None,
                notes: None,
            })
            .await
            .expect("completable")
    }
}
