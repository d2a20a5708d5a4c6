//! Disease predictor: the trained model plus the data it answers from.
//!
//! Built once at startup from the prescription records. Afterwards it is
//! read-only and can be shared behind an `Arc`.

use crate::adapters::tree::{self, DecisionTreeClassifier, TrainingReport, TreeParams};
use crate::application::recommend::match_recommendation;
use crate::domain::{
    estimate_confidence, Gender, PatternTable, Prediction, PrescriptionRecord, RecommendationBundle, Severity,
    SymptomVocabulary,
};
use crate::ports::SymptomClassifier;
use crate::{AyurdxError, Result};

/// Symptom-based disease predictor.
pub struct DiseasePredictor<C: SymptomClassifier = DecisionTreeClassifier> {
    classifier: C,
    vocabulary: SymptomVocabulary,
    records: Vec<PrescriptionRecord>,
    report: Option<TrainingReport>,
}

impl DiseasePredictor<DecisionTreeClassifier> {
    /// Derive the pattern table and train a decision tree on it.
    ///
    /// # Errors
    /// Returns `EmptyDataset` for no records, or `Training` if the training
    /// partition ends up empty.
    pub fn train(records: Vec<PrescriptionRecord>, vocabulary: SymptomVocabulary, seed: u64) -> Result<Self> {
        let table = PatternTable::derive(&records, &vocabulary)?;

        let (classifier, report) = tree::train(&table, seed, &TreeParams::default())?;

        Ok(Self {
            classifier,
            vocabulary,
            records,
            report: Some(report),
        })
    }
}

impl<C: SymptomClassifier> DiseasePredictor<C> {
    /// Wrap an already trained classifier.
    #[must_use]
    pub fn with_classifier(classifier: C, vocabulary: SymptomVocabulary, records: Vec<PrescriptionRecord>) -> Self {
        Self {
            classifier,
            vocabulary,
            records,
            report: None,
        }
    }

    /// Predict the most likely disease for a symptom selection.
    ///
    /// `severity` is validated; neither it nor the age influences the result.
    /// Unknown symptom names are ignored for the features; the confidence
    /// damping counts every submitted entry.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an empty selection, a severity outside
    /// 1..=3, or an unknown gender code.
    pub fn predict<S: AsRef<str>>(&self, symptoms: &[S], _age: u32, severity: u8, gender: &str) -> Result<Prediction> {
        if symptoms.is_empty() {
            return Err(AyurdxError::InvalidInput("select at least one symptom".to_string()));
        }
        parse_severity(severity)?;
        parse_gender(gender)?;

        let features = self.vocabulary.encode(symptoms);
        let probabilities = self.classifier.predict_probabilities(&features);
        let (label, _) = probabilities
            .top()
            .ok_or_else(|| AyurdxError::Training("classifier has no labels".to_string()))?;

        let confidence = estimate_confidence(symptoms.len(), label, &probabilities);
        tracing::debug!(
            "Predicted from {} submitted symptoms ({} recognized)",
            symptoms.len(),
            features.iter().filter(|&&f| f == 1).count()
        );

        Ok(Prediction::new(label, confidence))
    }

    /// Recommendations for a predicted disease.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an unknown gender code or a severity
    /// outside 1..=3.
    pub fn get_recommendations(
        &self,
        disease: &str,
        age: u32,
        gender: &str,
        severity: u8,
    ) -> Result<RecommendationBundle> {
        let gender = parse_gender(gender)?;
        let severity = parse_severity(severity)?;
        Ok(match_recommendation(disease, age, gender, severity, &self.records))
    }

    #[must_use]
    pub fn vocabulary(&self) -> &SymptomVocabulary {
        &self.vocabulary
    }

    #[must_use]
    pub fn labels(&self) -> &[String] {
        self.classifier.labels()
    }

    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Partition sizes and accuracies, when trained through [`DiseasePredictor::train`].
    #[must_use]
    pub fn training_report(&self) -> Option<&TrainingReport> {
        self.report.as_ref()
    }
}

fn parse_gender(code: &str) -> Result<Gender> {
    Gender::from_code(code).ok_or_else(|| AyurdxError::InvalidInput(format!("unknown gender code {code:?}")))
}

fn parse_severity(level: u8) -> Result<Severity> {
    Severity::from_level(level).ok_or_else(|| AyurdxError::InvalidInput(format!("severity must be 1-3, got {level}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::tree::DEFAULT_SEED;
    use crate::domain::{CONFIDENCE_CAP, LOW_CONFIDENCE};
    use crate::test_support::{sample_records, LogCapture};

    fn predictor() -> DiseasePredictor {
        DiseasePredictor::train(sample_records(), SymptomVocabulary::standard(), DEFAULT_SEED)
            .expect("Should train")
    }

    #[test]
    fn test_end_to_end_confidence() {
        let predictor = predictor();
        let symptoms = ["Fever", "Fatigue", "headache"];

        let prediction = predictor.predict(&symptoms, 30, 2, "M").expect("Should predict");

        let features = predictor.vocabulary().encode(&symptoms);
        let probabilities = predictor.classifier().predict_probabilities(&features);
        let base = probabilities.get(&prediction.disease);
        let expected = (base * 3.0 / 7.0).min(CONFIDENCE_CAP);

        assert!((prediction.confidence - expected).abs() < 1e-12);
        assert!(predictor.labels().contains(&prediction.disease));
    }

    #[test]
    fn test_training_logs_pattern_count_once() {
        let capture = LogCapture::default();
        capture.run(predictor);
        assert_eq!(capture.output().matches("disease patterns").count(), 1);
    }

    #[test]
    fn test_prediction_deterministic() {
        let a = predictor();
        let b = predictor();
        let symptoms = ["acidity", "indigestion", "vomiting", "nausea"];
        assert_eq!(
            a.predict(&symptoms, 50, 1, "F").expect("Should predict"),
            b.predict(&symptoms, 50, 1, "F").expect("Should predict")
        );
    }

    #[test]
    fn test_age_and_severity_do_not_matter() {
        let predictor = predictor();
        let symptoms = ["stiff_neck", "headache", "muscle_weakness"];
        let base = predictor.predict(&symptoms, 20, 1, "M").expect("Should predict");
        let other = predictor.predict(&symptoms, 90, 3, "F").expect("Should predict");
        assert_eq!(base, other);
    }

    #[test]
    fn test_few_symptoms_low_confidence() {
        let prediction = predictor().predict(&["headache"], 30, 2, "M").expect("Should predict");
        assert_eq!(prediction.confidence, LOW_CONFIDENCE);
    }

    #[test]
    fn test_unknown_symptoms_ignored_but_counted() {
        let predictor = predictor();
        let known = ["Fever", "Fatigue", "headache"];
        let padded = ["Fever", "Fatigue", "headache", "glowing", "levitation", "hiccups", "sneezing"];

        let a = predictor.predict(&known, 30, 2, "M").expect("Should predict");
        let b = predictor.predict(&padded, 30, 2, "M").expect("Should predict");
        assert_eq!(a.disease, b.disease);
        assert!(b.confidence >= a.confidence);
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        let predictor = predictor();
        let empty: [&str; 0] = [];
        assert!(matches!(predictor.predict(&empty, 30, 2, "M"), Err(AyurdxError::InvalidInput(_))));
        assert!(matches!(
            predictor.predict(&["headache"], 30, 0, "M"),
            Err(AyurdxError::InvalidInput(_))
        ));
        assert!(matches!(
            predictor.predict(&["headache"], 30, 2, "X"),
            Err(AyurdxError::InvalidInput(_))
        ));
        assert!(matches!(
            predictor.get_recommendations("Flu", 30, "X", 2),
            Err(AyurdxError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_recommendations_from_records() {
        let predictor = predictor();
        let bundle = predictor
            .get_recommendations("Migraine", 35, "F", 2)
            .expect("Should recommend");
        assert_eq!(bundle.herbs, vec!["Migraine herb F".to_string()]);

        let fallback = predictor
            .get_recommendations("Dengue", 35, "F", 2)
            .expect("Should recommend");
        assert!(fallback.is_fallback());
    }

    #[test]
    fn test_training_report_present() {
        let predictor = predictor();
        let report = predictor.training_report().expect("Should have report");
        assert_eq!(report.labels, report.train_size);
        assert_eq!(report.train_size + report.validation_size + report.test_size, 12);
    }

    #[test]
    fn test_empty_dataset() {
        assert!(matches!(
            DiseasePredictor::train(Vec::new(), SymptomVocabulary::standard(), DEFAULT_SEED),
            Err(AyurdxError::EmptyDataset)
        ));
    }
}
