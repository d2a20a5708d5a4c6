//! Prescription dataset records and the demographic enums used to query them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Symptom severity as entered on the assessment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Level 1
    Low,
    /// Level 2
    Normal,
    /// Level 3
    High,
}

impl Severity {
    /// All severities in ascending order.
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Normal, Severity::High];

    /// Map a form level (1, 2 or 3) to a severity.
    #[must_use]
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            1 => Some(Self::Low),
            2 => Some(Self::Normal),
            3 => Some(Self::High),
            _ => None,
        }
    }

    /// Form level (1, 2 or 3).
    #[must_use]
    pub fn level(&self) -> u8 {
        match self {
            Self::Low => 1,
            Self::Normal => 2,
            Self::High => 3,
        }
    }

    /// Label used by the prescription dataset.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Normal => "NORMAL",
            Self::High => "HIGH",
        }
    }

    /// Parse a dataset label, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "LOW" => Some(Self::Low),
            "NORMAL" => Some(Self::Normal),
            "HIGH" => Some(Self::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Gender as entered on the assessment form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    /// Only reachable through the matcher; the form offers M and F.
    Other,
}

impl Gender {
    /// Parse a form code (`M`, `F` or `O`).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "M" => Some(Self::Male),
            "F" => Some(Self::Female),
            "O" => Some(Self::Other),
            _ => None,
        }
    }

    /// Form code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Male => "M",
            Self::Female => "F",
            Self::Other => "O",
        }
    }

    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Male => "Male",
            Self::Female => "Female",
            Self::Other => "Other",
        }
    }

    /// Normalized form stored in the dataset's `gender` column.
    #[must_use]
    pub fn dataset_value(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
        }
    }
}

impl std::fmt::Display for Gender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dataset_value())
    }
}

/// One row of the prescription dataset.
///
/// A disease usually appears on several rows with different demographics and
/// drugs. Symptom flags are kept as read; names that were absent or not an
/// integer in the source simply have no entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrescriptionRecord {
    pub disease: String,
    pub symptoms: HashMap<String, i64>,
    pub age: i64,
    /// Normalized gender as written in the dataset (`male`, `female`, ...)
    pub gender: String,
    pub drug: String,
    pub severity: Option<Severity>,
}

impl PrescriptionRecord {
    /// Raw flag value for a symptom; absent flags read as 0.
    #[must_use]
    pub fn flag(&self, symptom: &str) -> i64 {
        self.symptoms.get(symptom).copied().unwrap_or(0)
    }

    /// Whether the record marks the symptom as present (flag exactly 1).
    #[must_use]
    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.flag(symptom) == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_levels() {
        assert_eq!(Severity::from_level(1), Some(Severity::Low));
        assert_eq!(Severity::from_level(2), Some(Severity::Normal));
        assert_eq!(Severity::from_level(3), Some(Severity::High));
        assert_eq!(Severity::from_level(0), None);
        assert_eq!(Severity::from_level(4), None);

        for severity in Severity::ALL {
            assert_eq!(Severity::from_level(severity.level()), Some(severity));
        }
    }

    #[test]
    fn test_severity_labels() {
        assert_eq!(Severity::from_label(" normal "), Some(Severity::Normal));
        assert_eq!(Severity::High.to_string(), "HIGH");
        assert_eq!(Severity::from_label("severe"), None);
    }

    #[test]
    fn test_gender_normalization() {
        assert_eq!(Gender::from_code("M").map(|g| g.dataset_value()), Some("male"));
        assert_eq!(Gender::from_code("F").map(|g| g.dataset_value()), Some("female"));
        assert_eq!(Gender::from_code("O").map(|g| g.dataset_value()), Some("other"));
        assert!(Gender::from_code("X").is_none());
        assert!(Gender::from_code("male").is_none());
    }

    #[test]
    fn test_missing_flag_reads_as_zero() {
        let mut symptoms = HashMap::new();
        symptoms.insert("Fever".to_string(), 1);
        symptoms.insert("nausea".to_string(), 2);
        let record = PrescriptionRecord {
            disease: "Flu".to_string(),
            symptoms,
            age: 30,
            gender: "male".to_string(),
            drug: "Tulsi ark".to_string(),
            severity: Some(Severity::Low),
        };

        assert!(record.has_symptom("Fever"));
        assert!(!record.has_symptom("nausea"));
        assert_eq!(record.flag("headache"), 0);
    }
}
