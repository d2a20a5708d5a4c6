//! Assessment record: one submission with its prediction and recommendations.

use serde::{Deserialize, Serialize};

use super::{Gender, Prediction, RecommendationBundle, Severity};

/// Complete assessment record including metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    /// Prediction id assigned by storage (`None` until saved)
    pub id: Option<i64>,

    pub age: u32,

    pub gender: Gender,

    /// Symptoms exactly as submitted
    pub symptoms: Vec<String>,

    pub severity: Severity,

    pub prediction: Prediction,

    pub recommendations: RecommendationBundle,

    /// Timestamp of the assessment
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Assessment {
    /// Create an unsaved assessment stamped with the current time.
    #[must_use]
    pub fn new(
        age: u32,
        gender: Gender,
        symptoms: Vec<String>,
        severity: Severity,
        prediction: Prediction,
        recommendations: RecommendationBundle,
    ) -> Self {
        Self {
            id: None,
            age,
            gender,
            symptoms,
            severity,
            prediction,
            recommendations,
            created_at: chrono::Utc::now(),
        }
    }

    #[must_use]
    pub fn is_saved(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assessment_creation() {
        let assessment = Assessment::new(
            30,
            Gender::Male,
            vec!["Fever".to_string()],
            Severity::Normal,
            Prediction::new("Flu", 0.3),
            RecommendationBundle::fallback(),
        );

        assert!(!assessment.is_saved());
        assert_eq!(assessment.prediction.disease, "Flu");
        assert!(assessment.created_at <= chrono::Utc::now());
    }
}
