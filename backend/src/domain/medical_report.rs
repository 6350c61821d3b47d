//! Clinical notes recorded by a doctor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::entity::impl_entity;
use super::{
    AppointmentId, Audit, DoctorId, DomainError, DomainResult, MedicalReportId, PatientId,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MedicalReportType {
    Consultation,
    Emergency,
    Surgery,
    Laboratory,
    Radiology,
    DischargeSummary,
}

/// Bedside measurements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VitalSigns {
    pub blood_pressure_systolic: u16,
    pub blood_pressure_diastolic: u16,
    pub heart_rate: u16,
    pub temperature_celsius: f64,
    pub respiratory_rate: u16,
    pub oxygen_saturation: u8,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub recorded_at: DateTime<Utc>,
}

impl VitalSigns {
    /// Body mass index; `None` when height is not positive.
    pub fn bmi(&self) -> Option<f64> {
        let metres = self.height_cm / 100.0;
        (metres > 0.0).then(|| self.weight_kg / (metres * metres))
    }

    pub fn is_normal_blood_pressure(&self) -> bool {
        (90..=120).contains(&self.blood_pressure_systolic)
            && (60..=80).contains(&self.blood_pressure_diastolic)
    }

    pub fn is_normal_heart_rate(&self) -> bool {
        (60..=100).contains(&self.heart_rate)
    }

    pub fn is_normal_temperature(&self) -> bool {
        (36.1..=37.5).contains(&self.temperature_celsius)
    }
}

/// One laboratory result attached to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabTest {
    pub test_name: String,
    pub category: String,
    pub result: String,
    pub normal_range: String,
    pub unit: String,
    pub abnormal: bool,
    pub performed_at: DateTime<Utc>,
    pub reported_by: String,
}

/// Input payload for [`MedicalReport::create`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalReportDraft {
    pub patient_id: PatientId,
    pub appointment_id: Option<AppointmentId>,
    pub record_type: MedicalReportType,
    pub chief_complaint: String,
    pub diagnosis: String,
    pub treatment: String,
    pub vital_signs: Option<VitalSigns>,
    #[serde(default)]
    pub lab_tests: Vec<LabTest>,
    pub notes: Option<String>,
    #[serde(default)]
    pub follow_up_required: bool,
    pub follow_up_date: Option<DateTime<Utc>>,
    pub recorded_by: DoctorId,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MedicalReport {
    id: MedicalReportId,
    patient_id: PatientId,
    appointment_id: Option<AppointmentId>,
    record_type: MedicalReportType,
    chief_complaint: String,
    diagnosis: String,
    treatment: String,
    vital_signs: Option<VitalSigns>,
    lab_tests: Vec<LabTest>,
    notes: Option<String>,
    follow_up_required: bool,
    follow_up_date: Option<DateTime<Utc>>,
    recorded_by: DoctorId,
    audit: Audit,
}

impl_entity!(MedicalReport, MedicalReportId, "MedicalReport");

impl MedicalReport {
    pub fn create(draft: MedicalReportDraft, now: DateTime<Utc>) -> DomainResult<Self> {
        if draft.chief_complaint.trim().is_empty() {
            return Err(DomainError::invalid_field(
                "chiefComplaint",
                "Chief complaint is required",
            ));
        }
        if draft.diagnosis.trim().is_empty() {
            return Err(DomainError::invalid_field("diagnosis", "Diagnosis is required"));
        }
        if draft.follow_up_required && draft.follow_up_date.is_none() {
            return Err(DomainError::invalid_field(
                "followUpDate",
                "Follow-up date is required when follow-up is needed",
            ));
        }
        Ok(Self {
            id: MedicalReportId::generate(now),
            patient_id: draft.patient_id,
            appointment_id: draft.appointment_id,
            record_type: draft.record_type,
            chief_complaint: draft.chief_complaint,
            diagnosis: draft.diagnosis,
            treatment: draft.treatment,
            vital_signs: draft.vital_signs,
            lab_tests: draft.lab_tests,
            notes: draft.notes,
            follow_up_required: draft.follow_up_required,
            follow_up_date: draft.follow_up_date,
            recorded_by: draft.recorded_by,
            audit: Audit::new(now),
        })
    }

    pub fn id(&self) -> &MedicalReportId {
        &self.id
    }
    pub fn patient_id(&self) -> &PatientId {
        &self.patient_id
    }
    pub fn appointment_id(&self) -> Option<&AppointmentId> {
        self.appointment_id.as_ref()
    }
    pub fn record_type(&self) -> MedicalReportType {
        self.record_type
    }
    pub fn chief_complaint(&self) -> &str {
        &self.chief_complaint
    }
    pub fn diagnosis(&self) -> &str {
        &self.diagnosis
    }
    pub fn treatment(&self) -> &str {
        &self.treatment
    }
    pub fn vital_signs(&self) -> Option<&VitalSigns> {
        self.vital_signs.as_ref()
    }
    pub fn lab_tests(&self) -> &[LabTest] {
        &self.lab_tests
    }
    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
    pub fn follow_up_required(&self) -> bool {
        self.follow_up_required
    }
    pub fn follow_up_date(&self) -> Option<DateTime<Utc>> {
        self.follow_up_date
    }
    pub fn recorded_by(&self) -> &DoctorId {
        &self.recorded_by
    }

    /// Whether any attached lab result is flagged abnormal.
    pub fn has_abnormal_results(&self) -> bool {
        self.lab_tests.iter().any(|test| test.abnormal)
    }
}
