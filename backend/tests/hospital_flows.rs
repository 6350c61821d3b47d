//! End-to-end visit flows over the in-memory adapters.

use rust_decimal::Decimal;
use rstest::{fixture, rstest};

use healthcore::domain::ports::{
    BillingCommand, CreatePrescriptionRequest, DispensePrescriptionRequest,
    GenerateInvoiceRequest, InventoryRepository, PrescriptionCommand, ProcessPaymentRequest,
    Repository,
};
use healthcore::domain::{
    Appointment, Currency, Doctor, ErrorCode, InvoiceLineItem, InvoiceStatus, Medication, Money,
    Patient, PaymentMethod, Prescription, PrescriptionStatus, UserId,
};

mod support;

use support::{Hospital, doctor, medication, patient, tomorrow_at, ward_round};

struct Visit {
    hospital: Hospital,
    doctor: Doctor,
    appointment: Appointment,
}

#[fixture]
async fn visit() -> Visit {
    let hospital = Hospital::open();
    let patient = hospital.admit(patient("Tarek")).await;
    let doctor = hospital.hire(doctor(500)).await;
    let appointment = hospital.finished_visit(&patient, &doctor).await;
    Visit {
        hospital,
        doctor,
        appointment,
    }
}

async fn prescribe(visit: &Visit, medications: Vec<Medication>) -> Prescription {
    visit
        .hospital
        .prescriptions
        .create_prescription(CreatePrescriptionRequest {
            appointment_id: visit.appointment.id().clone(),
            patient_id: visit.appointment.patient_id().clone(),
            doctor_id: visit.doctor.id().clone(),
            medications,
            validity_days: None,
            notes: None,
        })
        .await
        .expect("prescription created")
}

fn dispense_request(prescription: &Prescription) -> DispensePrescriptionRequest {
    DispensePrescriptionRequest {
        prescription_id: prescription.id().clone(),
        pharmacist_id: UserId::generate(ward_round()),
    }
}

async fn on_hand(hospital: &Hospital, name: &str) -> u32 {
    hospital
        .stock
        .find_by_name(name)
        .await
        .expect("read succeeds")
        .expect("stocked")
        .quantity()
}

#[rstest]
#[tokio::test]
async fn overlapping_slot_is_refused_and_the_next_one_is_free() {
    let hospital = Hospital::open();
    let first: Patient = hospital.admit(patient("Hassan")).await;
    let second = hospital.admit(patient("Nour")).await;
    let doctor = hospital.hire(doctor(400)).await;

    hospital
        .book(&first, &doctor, tomorrow_at(10, 0))
        .await
        .expect("slot is free");
    let clash = hospital
        .book(&second, &doctor, tomorrow_at(10, 15))
        .await
        .expect_err("inside the first visit");
    let next = hospital.book(&second, &doctor, tomorrow_at(10, 30)).await;

    assert_eq!(clash.code(), ErrorCode::BusinessRuleViolation);
    assert_eq!(clash.message(), "Doctor is not available at the requested time");
    assert!(next.is_ok());
}

#[rstest]
#[tokio::test]
async fn discounted_charge_is_billed_and_settled(#[future] visit: Visit) {
    let visit = visit.await;
    let lab_work = InvoiceLineItem::new(
        "Blood culture",
        2,
        Money::from_units(100, Currency::Egp),
        Decimal::from(10),
    )
    .expect("valid line");
    assert_eq!(lab_work.total(), Money::from_units(180, Currency::Egp));

    let invoice = visit
        .hospital
        .billing
        .generate_invoice(GenerateInvoiceRequest {
            appointment_id: visit.appointment.id().clone(),
            additional_charges: vec![lab_work],
            due_in_days: None,
            notes: None,
        })
        .await
        .expect("invoice generated");
    assert_eq!(invoice.total_amount(), Money::from_units(680, Currency::Egp));

    let paid = visit
        .hospital
        .billing
        .process_payment(ProcessPaymentRequest {
            invoice_id: invoice.id().clone(),
            amount: Money::from_units(680, Currency::Egp),
            method: PaymentMethod::Cash,
            transaction_id: None,
            notes: None,
        })
        .await
        .expect("payment accepted");

    assert_eq!(paid.status(), InvoiceStatus::Paid);
    assert!(paid.outstanding_balance().is_zero());
}

#[rstest]
#[tokio::test]
async fn dispensing_more_than_stocked_is_refused(#[future] visit: Visit) {
    let visit = visit.await;
    visit.hospital.shelve("Ciprofloxacin", 5).await;
    let prescription = prescribe(&visit, vec![medication("Ciprofloxacin", 10)]).await;

    let err = visit
        .hospital
        .prescriptions
        .dispense_prescription(dispense_request(&prescription))
        .await
        .expect_err("not enough stock");

    assert_eq!(err.code(), ErrorCode::BusinessRuleViolation);
    assert_eq!(
        err.message(),
        "Insufficient stock for Ciprofloxacin. Required: 10, Available: 5"
    );
    assert_eq!(on_hand(&visit.hospital, "Ciprofloxacin").await, 5);
}

#[rstest]
#[tokio::test]
async fn a_later_shortage_leaves_earlier_lines_untouched(#[future] visit: Visit) {
    let visit = visit.await;
    visit.hospital.shelve("Paracetamol", 50).await;
    visit.hospital.shelve("Ceftriaxone", 1).await;
    let prescription = prescribe(
        &visit,
        vec![medication("Paracetamol", 20), medication("Ceftriaxone", 2)],
    )
    .await;

    let err = visit
        .hospital
        .prescriptions
        .dispense_prescription(dispense_request(&prescription))
        .await
        .expect_err("second line is short");

    assert_eq!(err.code(), ErrorCode::BusinessRuleViolation);
    assert_eq!(on_hand(&visit.hospital, "Paracetamol").await, 50);
    let stored = visit
        .hospital
        .prescription_store
        .find_by_id(prescription.id())
        .await
        .expect("still stored");
    assert_eq!(stored.status(), PrescriptionStatus::Pending);
}

#[rstest]
#[tokio::test]
async fn concurrent_dispenses_never_oversell(#[future] visit: Visit) {
    let visit = visit.await;
    visit.hospital.shelve("Metronidazole", 10).await;
    let first = prescribe(&visit, vec![medication("Metronidazole", 8)]).await;
    let second = prescribe(&visit, vec![medication("Metronidazole", 8)]).await;

    let (left, right) = tokio::join!(
        visit
            .hospital
            .prescriptions
            .dispense_prescription(dispense_request(&first)),
        visit
            .hospital
            .prescriptions
            .dispense_prescription(dispense_request(&second)),
    );

    assert_eq!(
        [left.is_ok(), right.is_ok()]
            .iter()
            .filter(|done| **done)
            .count(),
        1
    );
    assert_eq!(on_hand(&visit.hospital, "Metronidazole").await, 2);
}

#[rstest]
#[tokio::test]
async fn dispensing_twice_is_refused(#[future] visit: Visit) {
    let visit = visit.await;
    visit.hospital.shelve("Omeprazole", 30).await;
    let prescription = prescribe(&visit, vec![medication("Omeprazole", 14)]).await;

    let dispensed = visit
        .hospital
        .prescriptions
        .dispense_prescription(dispense_request(&prescription))
        .await
        .expect("first dispense");
    let again = visit
        .hospital
        .prescriptions
        .dispense_prescription(dispense_request(&prescription))
        .await
        .expect_err("already dispensed");

    assert_eq!(dispensed.status(), PrescriptionStatus::Dispensed);
    assert_eq!(again.code(), ErrorCode::BusinessRuleViolation);
    assert_eq!(on_hand(&visit.hospital, "Omeprazole").await, 16);
}
