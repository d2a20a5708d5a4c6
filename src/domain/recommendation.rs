//! Recommendation bundle returned alongside a prediction.

use serde::{Deserialize, Serialize};

/// Herb list used when no prescription record matches.
pub const FALLBACK_HERB: &str = "General Ayurvedic herbs";

/// Lifestyle advice, identical for every bundle.
pub const LIFESTYLE_ADVICE: [&str; 3] = ["Regular exercise", "Proper rest", "Balanced diet"];

/// Dietary guidelines, identical for every bundle.
pub const DIET_GUIDELINES: [&str; 3] = [
    "Avoid triggering foods",
    "Stay hydrated",
    "Eat fresh fruits and vegetables",
];

/// Herbs, lifestyle and diet recommendations for one assessment.
///
/// Only `herbs` depends on the matched record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendationBundle {
    pub herbs: Vec<String>,
    pub lifestyle: Vec<String>,
    pub diet: Vec<String>,
}

impl RecommendationBundle {
    /// Bundle recommending a single matched drug.
    #[must_use]
    pub fn for_drug(drug: impl Into<String>) -> Self {
        Self::with_herbs(vec![drug.into()])
    }

    /// Generic bundle for when nothing matched.
    #[must_use]
    pub fn fallback() -> Self {
        Self::with_herbs(vec![FALLBACK_HERB.to_string()])
    }

    fn with_herbs(herbs: Vec<String>) -> Self {
        Self {
            herbs,
            lifestyle: LIFESTYLE_ADVICE.iter().map(|s| (*s).to_string()).collect(),
            diet: DIET_GUIDELINES.iter().map(|s| (*s).to_string()).collect(),
        }
    }

    #[must_use]
    pub fn is_fallback(&self) -> bool {
        self.herbs.len() == 1 && self.herbs[0] == FALLBACK_HERB
    }
}
