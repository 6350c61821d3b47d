//! Walkthrough binary: wires the in-memory adapters into the services and
//! drives one outpatient visit from registration to a settled invoice.

use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::{Clock, DefaultClock};
use ortho_config::OrthoConfig;
use rust_decimal::Decimal;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use healthcore::HealthcoreSettings;
use healthcore::domain::ports::{
    AppointmentCommand, BillingCommand, CompleteAppointmentRequest, CreatePrescriptionRequest,
    DispensePrescriptionRequest, GenerateInvoiceRequest, InventoryCommand, PatientCommand,
    PrescriptionCommand, ProcessPaymentRequest, RegisterPatientRequest, Repository,
    StatisticsQuery,
};
use healthcore::domain::{
    Address, AppointmentDraft, AppointmentService, AppointmentType, BillingService, BloodType,
    Doctor, DoctorDraft, Email, EmergencyContact, Gender, InventoryItemDraft,
    InventoryService, InvoiceLineItem, MedicalDepartment, Medication, Money, PatientDraft,
    PatientService, PaymentMethod, PhoneNumber, PrescriptionService, ServicePolicy,
    StatisticsService, UserId,
};
use healthcore::outbound::memory::{
    InMemoryAppointmentRepository, InMemoryDoctorRepository, InMemoryInventoryRepository,
    InMemoryInvoiceRepository, InMemoryPatientRepository, InMemoryPrescriptionRepository,
    InMemoryUserRepository,
};

struct Hospital {
    patients: PatientService<InMemoryUserRepository, InMemoryPatientRepository>,
    appointments: AppointmentService<
        InMemoryAppointmentRepository,
        InMemoryPatientRepository,
        InMemoryDoctorRepository,
    >,
    prescriptions: PrescriptionService<
        InMemoryPrescriptionRepository,
        InMemoryAppointmentRepository,
        InMemoryInventoryRepository,
    >,
    inventory: InventoryService<InMemoryInventoryRepository>,
    billing: BillingService<
        InMemoryInvoiceRepository,
        InMemoryAppointmentRepository,
        InMemoryDoctorRepository,
    >,
    statistics: StatisticsService<
        InMemoryPatientRepository,
        InMemoryAppointmentRepository,
        InMemoryInvoiceRepository,
    >,
    doctors: Arc<InMemoryDoctorRepository>,
    clock: Arc<dyn Clock>,
}

impl Hospital {
    fn in_memory(policy: ServicePolicy) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let users = Arc::new(InMemoryUserRepository::new());
        let patients = Arc::new(InMemoryPatientRepository::new());
        let doctors = Arc::new(InMemoryDoctorRepository::new());
        let appointments = Arc::new(InMemoryAppointmentRepository::new());
        let prescriptions = Arc::new(InMemoryPrescriptionRepository::new());
        let inventory = Arc::new(InMemoryInventoryRepository::new());
        let invoices = Arc::new(InMemoryInvoiceRepository::new());

        Self {
            patients: PatientService::new(
                Arc::clone(&users),
                Arc::clone(&patients),
                Arc::clone(&clock),
                policy,
            ),
            appointments: AppointmentService::new(
                Arc::clone(&appointments),
                Arc::clone(&patients),
                Arc::clone(&doctors),
                Arc::clone(&clock),
                policy,
            ),
            prescriptions: PrescriptionService::new(
                prescriptions,
                Arc::clone(&appointments),
                Arc::clone(&inventory),
                Arc::clone(&clock),
                policy,
            ),
            inventory: InventoryService::new(inventory, Arc::clone(&clock), policy),
            billing: BillingService::new(
                Arc::clone(&invoices),
                Arc::clone(&appointments),
                Arc::clone(&doctors),
                Arc::clone(&clock),
                policy,
            ),
            statistics: StatisticsService::new(
                patients,
                appointments,
                invoices,
                Arc::clone(&clock),
                policy,
            ),
            doctors,
            clock,
        }
    }
}

fn phone(digits: &str) -> Result<PhoneNumber> {
    Ok(PhoneNumber::new(format!("+2010{digits}"))?)
}

fn patient_draft() -> Result<PatientDraft> {
    Ok(PatientDraft {
        first_name: "Yasmin".to_owned(),
        last_name: "Adel".to_owned(),
        date_of_birth: NaiveDate::from_ymd_opt(1991, 5, 23)
            .ok_or_else(|| eyre!("invalid birth date"))?,
        gender: Gender::Female,
        blood_type: BloodType::BPositive,
        phone: phone("22334455")?,
        email: Email::new("yasmin.adel@example.com")?,
        address: Address {
            street: "7 El Nasr Road".into(),
            city: "Cairo".into(),
            state: "Cairo".into(),
            zip_code: "11371".into(),
            country: "Egypt".into(),
        },
        emergency_contact: EmergencyContact {
            name: "Adel Hamed".into(),
            relationship: "Father".into(),
            phone: phone("99887766")?,
        },
        insurance: None,
        allergies: vec!["Penicillin".to_owned()],
    })
}

async fn onboard_doctor(hospital: &Hospital, fee: Money) -> Result<Doctor> {
    let now = hospital.clock.utc();
    let doctor = Doctor::register(
        DoctorDraft {
            first_name: "Hoda".to_owned(),
            last_name: "Ibrahim".to_owned(),
            specialization: MedicalDepartment::InternalMedicine,
            license_number: "EG-GM-1107".to_owned(),
            qualifications: vec!["MBBCh".to_owned()],
            phone: phone("55667788")?,
            email: Email::new("hoda.ibrahim@hospital.example")?,
            consultation_fee: fee,
            years_of_experience: 9,
            available_time_slots: Vec::new(),
        },
        UserId::generate(now),
        now,
    )?;
    let doctor = hospital
        .doctors
        .save(doctor)
        .await
        .wrap_err("failed to store doctor")?;
    info!(doctor_id = %doctor.id(), "doctor onboarded");
    Ok(doctor)
}

async fn walkthrough(hospital: &Hospital, policy: ServicePolicy) -> Result<()> {
    let currency = policy.reporting_currency;
    let registered = hospital
        .patients
        .register_patient(RegisterPatientRequest {
            patient: patient_draft()?,
            password: "Walkthrough1".to_owned(),
        })
        .await?;
    let patient = registered.patient;
    let doctor = onboard_doctor(hospital, Money::from_units(450, currency)).await?;

    let now = hospital.clock.utc();
    let slot = (now + Duration::days(1))
        .date_naive()
        .and_hms_opt(10, 0, 0)
        .ok_or_else(|| eyre!("invalid slot time"))?
        .and_utc();
    let appointment = hospital
        .appointments
        .schedule_appointment(AppointmentDraft {
            patient_id: patient.id().clone(),
            doctor_id: doctor.id().clone(),
            appointment_type: AppointmentType::Consultation,
            scheduled_time: slot,
            duration_minutes: 30,
            reason: "Persistent cough".to_owned(),
        })
        .await?;
    hospital
        .appointments
        .confirm_appointment(appointment.id())
        .await?;
    hospital
        .appointments
        .start_appointment(appointment.id())
        .await?;
    let visit = hospital
        .appointments
        .complete_appointment(CompleteAppointmentRequest {
            appointment_id: appointment.id().clone(),
            diagnosis: "Acute bronchitis".to_owned(),
            prescription_id: None,
            notes: Some("Review in two weeks".to_owned()),
        })
        .await?;
    info!(appointment_id = %visit.id(), status = ?visit.status(), "visit finished");

    hospital
        .inventory
        .add_inventory_item(InventoryItemDraft {
            medication_name: "Azithromycin".to_owned(),
            generic_name: "Azithromycin dihydrate".to_owned(),
            manufacturer: "Pharco".to_owned(),
            batch_number: "AZ-2611".to_owned(),
            expiry_date: now + Duration::days(540),
            quantity: 60,
            unit_price: Money::from_units(15, currency),
            reorder_level: 10,
            location: "Pharmacy B2".to_owned(),
        })
        .await?;

    let prescription = hospital
        .prescriptions
        .create_prescription(CreatePrescriptionRequest {
            appointment_id: visit.id().clone(),
            patient_id: patient.id().clone(),
            doctor_id: doctor.id().clone(),
            medications: vec![Medication::new(
                "Azithromycin",
                "500mg",
                "once daily",
                "3 days",
                "one hour before food",
                3,
            )?],
            validity_days: None,
            notes: None,
        })
        .await?;
    let dispensed = hospital
        .prescriptions
        .dispense_prescription(DispensePrescriptionRequest {
            prescription_id: prescription.id().clone(),
            pharmacist_id: UserId::generate(hospital.clock.utc()),
        })
        .await?;
    info!(prescription_id = %dispensed.id(), status = ?dispensed.status(), "medicines handed over");

    let invoice = hospital
        .billing
        .generate_invoice(GenerateInvoiceRequest {
            appointment_id: visit.id().clone(),
            additional_charges: vec![InvoiceLineItem::new(
                "Chest X-ray",
                1,
                Money::from_units(300, currency),
                Decimal::from(10),
            )?],
            due_in_days: None,
            notes: None,
        })
        .await?;
    let settled = hospital
        .billing
        .process_payment(ProcessPaymentRequest {
            invoice_id: invoice.id().clone(),
            amount: invoice.outstanding_balance(),
            method: PaymentMethod::CreditCard,
            transaction_id: Some("TXN-WALK-1".to_owned()),
            notes: None,
        })
        .await?;
    info!(
        invoice_id = %settled.id(),
        total = %settled.total_amount(),
        status = ?settled.status(),
        "invoice settled"
    );

    let statistics = hospital.statistics.hospital_statistics().await?;
    info!(
        total_patients = statistics.total_patients,
        pending_appointments = statistics.pending_appointments,
        total_revenue = %statistics.total_revenue,
        outstanding_payments = %statistics.outstanding_payments,
        "hospital statistics"
    );
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = HealthcoreSettings::load_from_iter(std::env::args_os())
        .map_err(|e| eyre!("failed to load settings: {e}"))?;
    let policy = settings
        .service_policy()
        .wrap_err("invalid service settings")?;
    info!(
        repository_timeout_ms = policy.repository_timeout.as_millis(),
        reporting_currency = %policy.reporting_currency,
        "settings loaded"
    );

    let hospital = Hospital::in_memory(policy);
    walkthrough(&hospital, policy).await
}
