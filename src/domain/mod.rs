//! Domain layer: Core business types and logic.
//!
//! This module contains pure Rust types with no I/O. Everything here is a
//! deterministic function of its inputs.

mod assessment;
mod pattern;
mod prediction;
mod prescription;
mod recommendation;
mod vocabulary;

pub use assessment::Assessment;
pub use pattern::{PatternRow, PatternTable};
pub use prediction::{estimate_confidence, ClassProbabilities, Prediction};
pub use prediction::{CONFIDENCE_CAP, FULL_WEIGHT_SYMPTOMS, LOW_CONFIDENCE, MIN_SYMPTOMS};
pub use prescription::{Gender, PrescriptionRecord, Severity};
pub use recommendation::{RecommendationBundle, DIET_GUIDELINES, FALLBACK_HERB, LIFESTYLE_ADVICE};
pub use vocabulary::{SymptomVocabulary, DEFAULT_SYMPTOMS};
