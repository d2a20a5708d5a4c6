//! Symptom vocabulary and feature encoding.
//!
//! The vocabulary order defines the feature-vector layout. The same value is
//! handed to the pattern-table derivation and to the encoder, so training and
//! inference always agree on indexing.

use std::collections::HashMap;
use std::sync::Arc;

use crate::AyurdxError;

/// Symptom columns recognized in the prescription dataset, in feature order.
pub const DEFAULT_SYMPTOMS: [&str; 22] = [
    "acidity",
    "indigestion",
    "headache",
    "blurred_and_distorted_vision",
    "excessive_hunger",
    "muscle_weakness",
    "stiff_neck",
    "swelling_joints",
    "movement_stiffness",
    "depression",
    "irritability",
    "visual_disturbances",
    "painful_walking",
    "abdominal_pain",
    "nausea",
    "vomiting",
    "blood_in_mucus",
    "Fatigue",
    "Fever",
    "Dehydration",
    "loss_of_appetite",
    "cramping",
];

/// Fixed, ordered set of symptom names.
///
/// Cheap to clone; clones share the same names.
#[derive(Debug, Clone)]
pub struct SymptomVocabulary {
    names: Arc<[String]>,
    index: Arc<HashMap<String, usize>>,
}

impl SymptomVocabulary {
    /// Build a vocabulary from an ordered list of names.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the list is empty or contains a duplicate.
    pub fn new<I, S>(names: I) -> Result<Self, AyurdxError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).collect();
        if names.is_empty() {
            return Err(AyurdxError::InvalidInput(
                "Symptom vocabulary cannot be empty".to_string(),
            ));
        }

        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(AyurdxError::InvalidInput(format!(
                    "Duplicate symptom in vocabulary: {name}"
                )));
            }
        }

        Ok(Self {
            names: names.into(),
            index: Arc::new(index),
        })
    }

    /// The 22-symptom vocabulary of the prescription dataset.
    #[must_use]
    pub fn standard() -> Self {
        let names: Vec<String> = DEFAULT_SYMPTOMS.iter().map(|s| (*s).to_string()).collect();
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            names: names.into(),
            index: Arc::new(index),
        }
    }

    /// Symptom names in feature order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Feature index of a symptom (case-sensitive).
    #[must_use]
    pub fn index_of(&self, symptom: &str) -> Option<usize> {
        self.index.get(symptom).copied()
    }

    #[must_use]
    pub fn contains(&self, symptom: &str) -> bool {
        self.index.contains_key(symptom)
    }

    /// Encode a symptom selection as a binary feature vector.
    ///
    /// Names outside the vocabulary are skipped without error. Order and
    /// duplicates in `selected` do not matter.
    #[must_use]
    pub fn encode<S: AsRef<str>>(&self, selected: &[S]) -> Vec<u8> {
        let mut features = vec![0u8; self.len()];
        for symptom in selected {
            if let Some(idx) = self.index_of(symptom.as_ref()) {
                features[idx] = 1;
            }
        }
        features
    }
}

impl Default for SymptomVocabulary {
    fn default() -> Self {
        Self::standard()
    }
}
