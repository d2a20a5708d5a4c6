//! Classifier port: Trait for symptom-to-disease prediction.
//!
//! Implementations are trained once and are read-only afterwards, so a single
//! instance can serve any number of concurrent callers.

use crate::domain::ClassProbabilities;

/// Trained classifier over binary symptom feature vectors.
pub trait SymptomClassifier: Send + Sync {
    /// Label set observed at training time, in class order.
    fn labels(&self) -> &[String];

    /// Probability distribution over [`SymptomClassifier::labels`].
    ///
    /// `features` must have one entry per vocabulary symptom.
    fn predict_probabilities(&self, features: &[u8]) -> ClassProbabilities;

    /// Most probable label, ties resolved by class order.
    ///
    /// # Returns
    /// `None` only if the classifier has no labels.
    fn predict_label(&self, features: &[u8]) -> Option<String> {
        self.predict_probabilities(features)
            .top()
            .map(|(label, _)| label.to_string())
    }
}
