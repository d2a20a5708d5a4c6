//! Prediction result types and confidence estimation.
//!
//! The reported confidence is not the raw classifier probability. It is
//! damped by how many symptoms were submitted and never exceeds
//! [`CONFIDENCE_CAP`].

use serde::{Deserialize, Serialize};

/// Fewer submitted symptoms than this always yield [`LOW_CONFIDENCE`].
pub const MIN_SYMPTOMS: usize = 3;

/// Confidence returned for selections smaller than [`MIN_SYMPTOMS`].
pub const LOW_CONFIDENCE: f64 = 0.3;

/// Symptom count at which the probability is used at full weight.
pub const FULL_WEIGHT_SYMPTOMS: usize = 7;

/// Upper bound on any reported confidence.
pub const CONFIDENCE_CAP: f64 = 0.95;

/// Class probability distribution over the training-time label set.
///
/// Labels are kept in sorted order, which is also the tie-break order for
/// [`ClassProbabilities::top`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassProbabilities {
    entries: Vec<(String, f64)>,
}

impl ClassProbabilities {
    /// Build from `(label, probability)` pairs already in class order.
    #[must_use]
    pub fn new(entries: Vec<(String, f64)>) -> Self {
        Self { entries }
    }

    /// Probability of a label; labels outside the training set read as 0.
    #[must_use]
    pub fn get(&self, label: &str) -> f64 {
        self.entries
            .iter()
            .find(|(l, _)| l == label)
            .map(|(_, p)| *p)
            .unwrap_or(0.0)
    }

    /// Most probable label. Ties go to the earliest label in class order.
    #[must_use]
    pub fn top(&self) -> Option<(&str, f64)> {
        let mut best: Option<(&str, f64)> = None;
        for (label, p) in &self.entries {
            match best {
                Some((_, bp)) if *p <= bp => {}
                _ => best = Some((label.as_str(), *p)),
            }
        }
        best
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(l, p)| (l.as_str(), *p))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }
}

/// Estimate the reported confidence for a prediction.
///
/// * fewer than [`MIN_SYMPTOMS`] symptoms: [`LOW_CONFIDENCE`], whatever the model says
/// * otherwise: `p(label) * min(1, count / 7)`
///
/// The result is capped at [`CONFIDENCE_CAP`].
#[must_use]
pub fn estimate_confidence(symptom_count: usize, label: &str, probabilities: &ClassProbabilities) -> f64 {
    let confidence = if symptom_count < MIN_SYMPTOMS {
        LOW_CONFIDENCE
    } else {
        let base = probabilities.get(label);
        let weight = (symptom_count as f64 / FULL_WEIGHT_SYMPTOMS as f64).min(1.0);
        base * weight
    };

    confidence.min(CONFIDENCE_CAP)
}

/// Top-1 prediction with its damped confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub disease: String,
    /// Damped confidence in `[0, 0.95]`
    pub confidence: f64,
}

impl Prediction {
    #[must_use]
    pub fn new(disease: impl Into<String>, confidence: f64) -> Self {
        Self {
            disease: disease.into(),
            confidence,
        }
    }

    /// Confidence as a percentage string with two decimals, e.g. `42.86%`.
    #[must_use]
    pub fn confidence_percent(&self) -> String {
        format!("{:.2}%", self.confidence * 100.0)
    }
}
