//! Assessment service: predict, recommend, persist.

use std::sync::Arc;

use crate::adapters::StorageError;
use crate::application::DiseasePredictor;
use crate::domain::{Assessment, Gender, Severity};
use crate::ports::{Storage, SymptomClassifier};
use crate::{AyurdxError, Result};

/// One submission from the assessment form.
#[derive(Debug, Clone, PartialEq)]
pub struct AssessmentRequest {
    pub symptoms: Vec<String>,
    pub age: u32,
    pub severity: Severity,
    pub gender: Gender,
}

/// Service running a full assessment against a shared predictor.
pub struct AssessmentService<C, S>
where
    C: SymptomClassifier,
    S: Storage,
{
    predictor: Arc<DiseasePredictor<C>>,
    storage: Arc<S>,
}

impl<C, S> AssessmentService<C, S>
where
    C: SymptomClassifier,
    S: Storage,
    S::Error: Into<StorageError>,
{
    pub fn new(predictor: Arc<DiseasePredictor<C>>, storage: Arc<S>) -> Self {
        Self { predictor, storage }
    }

    /// Run an assessment and try to save it.
    ///
    /// A failed save is logged and leaves `id` as `None`; the assessment is
    /// still returned.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the prediction rejects the request.
    pub fn assess(&self, request: AssessmentRequest) -> Result<Assessment> {
        let severity = request.severity.level();
        let gender = request.gender.code();

        let prediction = self
            .predictor
            .predict(&request.symptoms, request.age, severity, gender)?;
        let recommendations =
            self.predictor
                .get_recommendations(&prediction.disease, request.age, gender, severity)?;

        let mut assessment = Assessment::new(
            request.age,
            request.gender,
            request.symptoms,
            request.severity,
            prediction,
            recommendations,
        );

        match self.storage.save_assessment(&assessment) {
            Ok(id) => {
                assessment.id = Some(id);
                tracing::info!("Assessment saved");
            }
            Err(e) => {
                let e: StorageError = e.into();
                tracing::warn!("Failed to save assessment: {}", e);
            }
        }

        Ok(assessment)
    }

    /// Most recent saved assessments, newest first.
    ///
    /// # Errors
    /// Returns error if storage fails.
    pub fn recent(&self, limit: usize) -> Result<Vec<Assessment>> {
        self.storage
            .load_recent_assessments(limit)
            .map_err(|e| AyurdxError::Storage(e.into()))
    }

    /// # Errors
    /// Returns error if storage fails.
    pub fn count(&self) -> Result<usize> {
        self.storage
            .count_assessments()
            .map_err(|e| AyurdxError::Storage(e.into()))
    }

    /// # Errors
    /// Returns error if storage fails.
    pub fn load(&self, id: i64) -> Result<Option<Assessment>> {
        self.storage
            .load_assessment(id)
            .map_err(|e| AyurdxError::Storage(e.into()))
    }

    #[must_use]
    pub fn predictor(&self) -> &DiseasePredictor<C> {
        &self.predictor
    }
}
