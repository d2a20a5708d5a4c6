//! Application layer: Use cases and services.
//!
//! This module orchestrates domain logic with ports to implement
//! the core use cases of the application.

mod assessment;
mod predictor;
mod recommend;
pub mod report;

pub use assessment::{AssessmentRequest, AssessmentService};
pub use predictor::DiseasePredictor;
pub use recommend::match_recommendation;
pub use report::{export_report, generate_report, DISCLAIMER};
