//! Symptom pattern table derived from the prescription dataset.
//!
//! One row per distinct disease. The pattern for a disease comes from the
//! first record of that disease in input order; later records never change
//! it, even when their flags disagree.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::{PrescriptionRecord, SymptomVocabulary};
use crate::AyurdxError;

/// A disease label with its binary symptom pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternRow {
    /// One entry per vocabulary symptom, each 0 or 1
    pub features: Vec<u8>,
    pub label: String,
}

/// Training table: one [`PatternRow`] per distinct disease.
#[derive(Debug, Clone)]
pub struct PatternTable {
    vocabulary: SymptomVocabulary,
    rows: Vec<PatternRow>,
}

impl PatternTable {
    /// Derive the table from raw prescription records.
    ///
    /// # Errors
    /// Returns `EmptyDataset` if `records` is empty.
    pub fn derive(
        records: &[PrescriptionRecord],
        vocabulary: &SymptomVocabulary,
    ) -> Result<Self, AyurdxError> {
        if records.is_empty() {
            return Err(AyurdxError::EmptyDataset);
        }

        let mut seen: HashSet<&str> = HashSet::new();
        let mut rows = Vec::new();

        for record in records {
            if !seen.insert(record.disease.as_str()) {
                continue;
            }
            let features = vocabulary
                .names()
                .iter()
                .map(|symptom| u8::from(record.has_symptom(symptom)))
                .collect();
            rows.push(PatternRow {
                features,
                label: record.disease.clone(),
            });
        }

        tracing::info!(
            "Derived {} disease patterns from {} prescription records",
            rows.len(),
            records.len()
        );

        Ok(Self {
            vocabulary: vocabulary.clone(),
            rows,
        })
    }

    /// Build a table directly from rows (for tests and tooling).
    ///
    /// # Errors
    /// Returns `InvalidInput` if a row's width differs from the vocabulary or a
    /// label repeats.
    pub fn from_rows(vocabulary: SymptomVocabulary, rows: Vec<PatternRow>) -> Result<Self, AyurdxError> {
        let mut labels = HashSet::new();
        for row in &rows {
            if row.features.len() != vocabulary.len() {
                return Err(AyurdxError::InvalidInput(format!(
                    "Pattern for {} has {} features, expected {}",
                    row.label,
                    row.features.len(),
                    vocabulary.len()
                )));
            }
            if !labels.insert(row.label.as_str()) {
                return Err(AyurdxError::InvalidInput(format!(
                    "Duplicate disease in pattern table: {}",
                    row.label
                )));
            }
        }
        Ok(Self { vocabulary, rows })
    }

    #[must_use]
    pub fn vocabulary(&self) -> &SymptomVocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub fn rows(&self) -> &[PatternRow] {
        &self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Disease labels in table order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|r| r.label.as_str())
    }
}
