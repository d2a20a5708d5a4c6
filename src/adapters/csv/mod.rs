//! CSV adapter: Loads the prescription dataset.
//!
//! The file has a header row with at least `disease`, `age`, `gender` and
//! `drug`. `severity` is optional. Every other column is read as a symptom
//! flag; cells that are not integers are dropped, so they read as flag 0.

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

use ::csv::{ReaderBuilder, StringRecord, Trim};

use crate::domain::{PrescriptionRecord, Severity};

const DISEASE_COLUMN: &str = "disease";
const AGE_COLUMN: &str = "age";
const GENDER_COLUMN: &str = "gender";
const DRUG_COLUMN: &str = "drug";
const SEVERITY_COLUMN: &str = "severity";

/// Error type for dataset loading.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Dataset not found at {0}")]
    NotFound(PathBuf),

    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("Invalid {column} on line {line}: {value:?}")]
    InvalidValue {
        line: u64,
        column: &'static str,
        value: String,
    },
}

/// Column positions resolved from the header row.
struct Columns {
    disease: usize,
    age: usize,
    gender: usize,
    drug: usize,
    severity: Option<usize>,
    flags: Vec<(usize, String)>,
}

impl Columns {
    fn resolve(headers: &StringRecord) -> Result<Self, DatasetError> {
        let find = |name: &'static str| headers.iter().position(|h| h == name);
        let require = |name: &'static str| find(name).ok_or(DatasetError::MissingColumn(name));

        let disease = require(DISEASE_COLUMN)?;
        let age = require(AGE_COLUMN)?;
        let gender = require(GENDER_COLUMN)?;
        let drug = require(DRUG_COLUMN)?;
        let severity = find(SEVERITY_COLUMN);

        let fixed = [Some(disease), Some(age), Some(gender), Some(drug), severity];
        let flags = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| !fixed.contains(&Some(*i)))
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        Ok(Self {
            disease,
            age,
            gender,
            drug,
            severity,
            flags,
        })
    }
}

/// Load prescription records from a CSV file.
///
/// # Errors
/// Returns error if the file is missing, unreadable, lacks a required column,
/// or has a non-integer age.
pub fn load_prescriptions(path: &Path) -> Result<Vec<PrescriptionRecord>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    let file = std::fs::File::open(path).map_err(::csv::Error::from)?;
    let records = read_prescriptions(file)?;
    tracing::info!("Loaded {} prescription records from {:?}", records.len(), path);
    Ok(records)
}

/// Read prescription records from any CSV source.
///
/// # Errors
/// Same as [`load_prescriptions`], minus the missing-file case.
pub fn read_prescriptions<R: Read>(reader: R) -> Result<Vec<PrescriptionRecord>, DatasetError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let columns = Columns::resolve(reader.headers()?)?;

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        records.push(parse_row(&row, &columns)?);
    }
    Ok(records)
}

fn parse_row(row: &StringRecord, columns: &Columns) -> Result<PrescriptionRecord, DatasetError> {
    let line = row.position().map(|p| p.line()).unwrap_or(0);

    let age_raw = cell(row, columns.age);
    let age = parse_integer(age_raw).ok_or_else(|| DatasetError::InvalidValue {
        line,
        column: AGE_COLUMN,
        value: age_raw.to_string(),
    })?;

    let symptoms: HashMap<String, i64> = columns
        .flags
        .iter()
        .filter_map(|(idx, name)| parse_integer(cell(row, *idx)).map(|v| (name.clone(), v)))
        .collect();

    Ok(PrescriptionRecord {
        disease: cell(row, columns.disease).to_string(),
        symptoms,
        age,
        gender: cell(row, columns.gender).to_string(),
        drug: cell(row, columns.drug).to_string(),
        severity: columns.severity.and_then(|idx| Severity::from_label(cell(row, idx))),
    })
}

fn cell(row: &StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("")
}

/// Parse an integer cell, accepting integral floats such as `1.0`.
fn parse_integer(raw: &str) -> Option<i64> {
    if let Ok(v) = raw.parse::<i64>() {
        return Some(v);
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 => Some(v as i64),
        _ => None,
    }
}
