//! Shared fixtures for unit tests.

use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

use crate::domain::{PrescriptionRecord, Severity};

/// Build a record with the given symptoms flagged as 1.
pub fn record(disease: &str, symptoms: &[&str], age: i64, gender: &str, drug: &str) -> PrescriptionRecord {
    let symptoms: HashMap<String, i64> = symptoms.iter().map(|s| ((*s).to_string(), 1)).collect();
    PrescriptionRecord {
        disease: disease.to_string(),
        symptoms,
        age,
        gender: gender.to_string(),
        drug: drug.to_string(),
        severity: Some(Severity::Normal),
    }
}

/// Diseases with distinct symptom patterns, two records each.
pub const DISEASES: [(&str, &[&str]); 12] = [
    ("Peptic Ulcer", &["acidity", "indigestion", "abdominal_pain", "nausea"]),
    ("Gastritis", &["acidity", "indigestion", "vomiting"]),
    ("Migraine", &["headache", "visual_disturbances", "nausea", "irritability"]),
    ("Diabetes", &["excessive_hunger", "Fatigue", "blurred_and_distorted_vision"]),
    ("Cervical Spondylosis", &["stiff_neck", "headache", "muscle_weakness"]),
    ("Arthritis", &["swelling_joints", "movement_stiffness", "painful_walking"]),
    ("Depression", &["depression", "irritability", "Fatigue"]),
    ("Dysentery", &["abdominal_pain", "blood_in_mucus", "cramping"]),
    ("Gastroenteritis", &["vomiting", "nausea", "Dehydration", "cramping"]),
    ("Typhoid", &["Fever", "Fatigue", "headache", "loss_of_appetite"]),
    ("Flu", &["Fever", "Fatigue", "headache", "muscle_weakness"]),
    ("Malaria", &["Fever", "vomiting", "headache", "nausea"]),
];

/// A small prescription dataset covering every disease in [`DISEASES`].
pub fn sample_records() -> Vec<PrescriptionRecord> {
    let mut records = Vec::new();
    for (i, (disease, symptoms)) in DISEASES.iter().enumerate() {
        let age = 20 + (i as i64 * 3);
        records.push(record(disease, symptoms, age, "male", &format!("{disease} herb M")));
        records.push(record(disease, symptoms, age + 10, "female", &format!("{disease} herb F")));
    }
    records
}


/// In-memory log sink for asserting on formatted tracing output.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

impl LogCapture {
    /// Run `f` with a fmt subscriber writing into this capture.
    pub fn run<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(self.clone())
            .finish();
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn output(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("Lock failed")).into_owned()
    }
}

impl Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().expect("Lock failed").extend_from_slice(buf);
        Ok(buf.len())
    }
    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogCapture {
    type Writer = LogCapture;
    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
