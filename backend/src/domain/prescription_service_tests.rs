//! Tests for prescription creation, dispensing and cancellation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mockall::Sequence;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{
    MockAppointmentStore, MockInventoryStore, MockPrescriptionStore, RepositoryError,
};
use crate::domain::service_fixtures::{
    appointment_at, clock_at, completed_appointment, doctor, fixed_now, medication, patient,
    prescription_for, stock,
};
use crate::domain::{Appointment, ErrorCode, PrescriptionStatus, UserId};

type Service = PrescriptionService<MockPrescriptionStore, MockAppointmentStore, MockInventoryStore>;

fn service(
    prescriptions: MockPrescriptionStore,
    appointments: MockAppointmentStore,
    inventory: MockInventoryStore,
) -> Service {
    PrescriptionService::new(
        Arc::new(prescriptions),
        Arc::new(appointments),
        Arc::new(inventory),
        clock_at(fixed_now()),
        ServicePolicy::default(),
    )
}

#[fixture]
fn visit() -> Appointment {
    let earlier = fixed_now() - Duration::hours(2);
    completed_appointment(&patient(earlier), &doctor(earlier), earlier)
}

fn pharmacist() -> UserId {
    UserId::generate(fixed_now())
}

fn shelf(items: &[(&str, u32)], now: DateTime<Utc>) -> MockInventoryStore {
    let by_name: HashMap<String, InventoryItem> = items
        .iter()
        .map(|(name, quantity)| (name.to_lowercase(), stock(name, *quantity, now)))
        .collect();
    let mut inventory = MockInventoryStore::new();
    inventory
        .expect_find_by_name()
        .returning(move |name| Ok(by_name.get(&name.to_lowercase()).cloned()));
    inventory
}

fn stored(prescription: Prescription) -> MockPrescriptionStore {
    let mut prescriptions = MockPrescriptionStore::new();
    prescriptions
        .expect_find_by_id()
        .return_once(move |_| Ok(prescription));
    prescriptions
}

fn dispense_request(prescription: &Prescription) -> DispensePrescriptionRequest {
    DispensePrescriptionRequest {
        prescription_id: prescription.id().clone(),
        pharmacist_id: pharmacist(),
    }
}

#[rstest]
#[tokio::test]
async fn dispense_decrements_every_line_then_marks_dispensed(visit: Appointment) {
    let now = fixed_now();
    let rx = prescription_for(
        &visit,
        vec![medication("Aspirin", 10), medication("Atorvastatin", 30)],
        now,
    );
    let request = dispense_request(&rx);
    let mut prescriptions = stored(rx);
    prescriptions
        .expect_update()
        .times(1)
        .withf(|p| p.status() == PrescriptionStatus::Dispensed)
        .returning(Ok);
    let mut inventory = shelf(&[("Aspirin", 50), ("Atorvastatin", 30)], now);
    inventory
        .expect_update_all()
        .times(1)
        .withf(|items| {
            items.iter().map(InventoryItem::quantity).collect::<Vec<_>>() == vec![40, 0]
        })
        .returning(Ok);

    let dispensed = service(prescriptions, MockAppointmentStore::new(), inventory)
        .dispense_prescription(request)
        .await
        .expect("stock suffices");

    assert_eq!(dispensed.status(), PrescriptionStatus::Dispensed);
    assert_eq!(dispensed.dispensed_at(), Some(now));
}

#[rstest]
#[tokio::test]
async fn shortage_on_a_later_line_writes_nothing(visit: Appointment) {
    let now = fixed_now();
    let rx = prescription_for(
        &visit,
        vec![medication("Aspirin", 10), medication("Insulin", 3)],
        now,
    );
    let request = dispense_request(&rx);
    let mut prescriptions = stored(rx);
    prescriptions.expect_update().times(0);
    let mut inventory = shelf(&[("Aspirin", 50), ("Insulin", 0)], now);
    inventory.expect_update_all().times(0);

    let err = service(prescriptions, MockAppointmentStore::new(), inventory)
        .dispense_prescription(request)
        .await
        .expect_err("insulin is out of stock");

    assert_eq!(err.code(), ErrorCode::BusinessRuleViolation);
    assert_eq!(
        err.message(),
        "Insufficient stock for Insulin. Required: 3, Available: 0"
    );
}

#[rstest]
#[tokio::test]
async fn repeated_medicines_are_summed_before_checking(visit: Appointment) {
    let now = fixed_now();
    let rx = prescription_for(
        &visit,
        vec![medication("Aspirin", 6), medication("aspirin", 6)],
        now,
    );
    let request = dispense_request(&rx);
    let mut inventory = shelf(&[("Aspirin", 10)], now);
    inventory.expect_update_all().times(0);

    let err = service(stored(rx), MockAppointmentStore::new(), inventory)
        .dispense_prescription(request)
        .await
        .expect_err("12 requested, 10 held");

    assert_eq!(
        err.message(),
        "Insufficient stock for Aspirin. Required: 12, Available: 10"
    );
}

#[rstest]
#[tokio::test]
async fn unknown_medicines_are_not_found(visit: Appointment) {
    let now = fixed_now();
    let rx = prescription_for(&visit, vec![medication("Unobtainium", 1)], now);
    let request = dispense_request(&rx);

    let err = service(stored(rx), MockAppointmentStore::new(), shelf(&[], now))
        .dispense_prescription(request)
        .await
        .expect_err("not stocked");

    assert_eq!(err.code(), ErrorCode::NotFound);
    assert_eq!(err.message(), "InventoryItem with id Unobtainium not found");
}

#[rstest]
#[tokio::test]
async fn expired_prescriptions_are_rejected_before_touching_stock(visit: Appointment) {
    let issued = fixed_now() - Duration::days(40);
    let rx = prescription_for(&visit, vec![medication("Aspirin", 1)], issued);
    let request = dispense_request(&rx);
    let mut inventory = MockInventoryStore::new();
    inventory.expect_find_by_name().times(0);

    let err = service(stored(rx), MockAppointmentStore::new(), inventory)
        .dispense_prescription(request)
        .await
        .expect_err("expired");

    assert_eq!(err.message(), "Prescription cannot be dispended");
}

#[rstest]
#[tokio::test]
async fn failed_prescription_write_returns_the_stock(visit: Appointment) {
    let now = fixed_now();
    let rx = prescription_for(&visit, vec![medication("Aspirin", 10)], now);
    let request = dispense_request(&rx);
    let mut prescriptions = stored(rx);
    prescriptions
        .expect_update()
        .return_once(|_| Err(RepositoryError::query("disk full")));
    let mut inventory = shelf(&[("Aspirin", 50)], now);
    let mut seq = Sequence::new();
    inventory
        .expect_update_all()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|items| items.iter().all(|item| item.quantity() == 40))
        .returning(Ok);
    inventory
        .expect_update_all()
        .times(1)
        .in_sequence(&mut seq)
        .withf(|items| items.iter().all(|item| item.quantity() == 50))
        .returning(Ok);

    let err = service(prescriptions, MockAppointmentStore::new(), inventory)
        .dispense_prescription(request)
        .await
        .expect_err("prescription write fails");

    assert_eq!(err.code(), ErrorCode::SystemError);
}

#[rstest]
#[tokio::test]
async fn create_uses_the_configured_validity(visit: Appointment) {
    let request = CreatePrescriptionRequest {
        appointment_id: visit.id().clone(),
        patient_id: visit.patient_id().clone(),
        doctor_id: visit.doctor_id().clone(),
        medications: vec![medication("Aspirin", 30)],
        validity_days: None,
        notes: None,
    };
    let mut appointments = MockAppointmentStore::new();
    appointments
        .expect_find_by_id()
        .return_once(move |_| Ok(visit));
    let mut prescriptions = MockPrescriptionStore::new();
    prescriptions.expect_save().times(1).returning(Ok);

    let created = service(prescriptions, appointments, MockInventoryStore::new())
        .create_prescription(request)
        .await
        .expect("completed appointment");

    assert_eq!(created.status(), PrescriptionStatus::Pending);
    assert_eq!(created.valid_until(), fixed_now() + Duration::days(30));
}

#[rstest]
#[tokio::test]
async fn create_requires_a_completed_appointment() {
    let now = fixed_now();
    let open = appointment_at(&patient(now), &doctor(now), now + Duration::hours(3));
    let request = CreatePrescriptionRequest {
        appointment_id: open.id().clone(),
        patient_id: open.patient_id().clone(),
        doctor_id: open.doctor_id().clone(),
        medications: vec![medication("Aspirin", 30)],
        validity_days: Some(10),
        notes: None,
    };
    let mut appointments = MockAppointmentStore::new();
    appointments
        .expect_find_by_id()
        .return_once(move |_| Ok(open));
    let mut prescriptions = MockPrescriptionStore::new();
    prescriptions.expect_save().times(0);

    let err = service(prescriptions, appointments, MockInventoryStore::new())
        .create_prescription(request)
        .await
        .expect_err("scheduled appointment");

    assert_eq!(
        err.message(),
        "Cannot create prescription for an appointment that is not completed"
    );
}

#[rstest]
#[tokio::test]
async fn create_rejects_a_foreign_patient(visit: Appointment) {
    let request = CreatePrescriptionRequest {
        appointment_id: visit.id().clone(),
        patient_id: patient(fixed_now()).id().clone(),
        doctor_id: visit.doctor_id().clone(),
        medications: vec![medication("Aspirin", 30)],
        validity_days: None,
        notes: None,
    };
    let mut appointments = MockAppointmentStore::new();
    appointments
        .expect_find_by_id()
        .return_once(move |_| Ok(visit));

    let err = service(MockPrescriptionStore::new(), appointments, MockInventoryStore::new())
        .create_prescription(request)
        .await
        .expect_err("patient mismatch");

    assert_eq!(err.code(), ErrorCode::BusinessRuleViolation);
}

#[rstest]
#[tokio::test]
async fn dispensed_prescriptions_cannot_be_cancelled(visit: Appointment) {
    let now = fixed_now();
    let rx = prescription_for(&visit, vec![medication("Aspirin", 1)], now)
        .dispense(pharmacist(), now)
        .expect("dispensable");
    let id = rx.id().clone();
    let mut prescriptions = stored(rx);
    prescriptions.expect_update().times(0);

    let err = service(prescriptions, MockAppointmentStore::new(), MockInventoryStore::new())
        .cancel_prescription(&id)
        .await
        .expect_err("already dispensed");

    assert_eq!(err.message(), "Cannot cancel a dispensed prescriptions");
}
