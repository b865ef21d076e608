//! FHIR resource fixtures.
//!
//! Patient `Patient/42` (pid 7) owns a small record: medications, a condition
//! with a narrative, and an observation. Patient `Patient/other` (pid 8) owns an
//! unrelated medication so reference scoping can be checked.

use serde_json::{Value, json};

/// Internal identity of `Patient/42`.
pub const PATIENT_PID: i64 = 7;

/// Logical id of the main patient.
pub const PATIENT_ID: &str = "42";

/// Internal identity of `Patient/other`.
pub const OTHER_PATIENT_PID: i64 = 8;

/// Logical id of the second patient.
pub const OTHER_PATIENT_ID: &str = "other";

/// A resource fixture with its internal identity and reference targets.
#[derive(Debug, Clone)]
pub struct ResourceFixture {
    /// Internal identity.
    pub pid: i64,
    /// FHIR JSON.
    pub resource: Value,
    /// Internal identities referenced by the resource.
    pub links: Vec<i64>,
}

impl ResourceFixture {
    /// Creates a fixture.
    pub fn new(pid: i64, resource: Value, links: Vec<i64>) -> Self {
        Self {
            pid,
            resource,
            links,
        }
    }
}

fn medication_statement(id: &str, patient: &str, display: &str, dosage: &str) -> Value {
    json!({
        "resourceType": "MedicationStatement",
        "id": id,
        "status": "active",
        "subject": {"reference": format!("Patient/{}", patient)},
        "medicationCodeableConcept": {
            "coding": [{
                "system": "http://www.nlm.nih.gov/research/umls/rxnorm",
                "display": display
            }]
        },
        "dosage": [{"text": dosage}]
    })
}

/// Aspirin taken by the main patient.
pub fn aspirin() -> ResourceFixture {
    ResourceFixture::new(
        100,
        medication_statement("med-aspirin", PATIENT_ID, "Aspirin", "Take daily"),
        vec![PATIENT_PID],
    )
}

/// Ibuprofen taken by the main patient.
pub fn ibuprofen() -> ResourceFixture {
    ResourceFixture::new(
        101,
        medication_statement("med-ibuprofen", PATIENT_ID, "Ibuprofen", "As needed for pain"),
        vec![PATIENT_PID],
    )
}

/// A condition with a narrative, recorded for the main patient.
pub fn migraine() -> ResourceFixture {
    ResourceFixture::new(
        102,
        json!({
            "resourceType": "Condition",
            "id": "cond-migraine",
            "text": {
                "status": "generated",
                "div": "<div xmlns=\"http://www.w3.org/1999/xhtml\">Chronic <b>migraine</b> since 2019</div>"
            },
            "subject": {"reference": format!("Patient/{}", PATIENT_ID)},
            "code": {"text": "Migraine"},
            "note": [{"text": "Headache worse in the morning"}]
        }),
        vec![PATIENT_PID],
    )
}

/// A blood pressure observation for the main patient.
pub fn blood_pressure() -> ResourceFixture {
    ResourceFixture::new(
        103,
        json!({
            "resourceType": "Observation",
            "id": "obs-bp",
            "status": "final",
            "subject": {"reference": format!("Patient/{}", PATIENT_ID)},
            "code": {"text": "Blood pressure"},
            "valueString": "High blood pressure, recheck in a week"
        }),
        vec![PATIENT_PID],
    )
}

/// Aspirin taken by the second patient.
pub fn other_aspirin() -> ResourceFixture {
    ResourceFixture::new(
        200,
        medication_statement("med-other", OTHER_PATIENT_ID, "Aspirin", "Take daily"),
        vec![OTHER_PATIENT_PID],
    )
}

/// Every fixture.
pub fn all_fixtures() -> Vec<ResourceFixture> {
    vec![aspirin(), ibuprofen(), migraine(), blood_pressure(), other_aspirin()]
}
