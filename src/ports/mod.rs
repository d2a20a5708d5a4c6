//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the application and its collaborators (the trained model and
//! assessment storage).

mod classifier;
mod storage;

pub use classifier::SymptomClassifier;
pub use storage::{AssessmentPage, Storage};
