//! # Ayurdx
//!
//! Symptom-based disease prediction with Ayurvedic recommendations.
//!
//! This crate provides:
//! - Derivation of a one-row-per-disease symptom pattern table from a
//!   prescription dataset
//! - A shallow decision tree trained once at startup on that table
//! - Dampened confidence scoring and nearest-age recommendation matching
//! - Local SQLite persistence of assessments and a terminal UI
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (records, vocabulary, pattern table, confidence)
//! - `ports`: Trait definitions for the classifier and storage boundaries
//! - `adapters`: Concrete implementations (CSV dataset, decision tree, SQLite)
//! - `application`: Use cases orchestrating domain and ports
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

#[cfg(test)]
pub(crate) mod test_support;

pub use domain::{Assessment, Gender, Prediction, RecommendationBundle, Severity, SymptomVocabulary};

/// Result type for Ayurdx operations
pub type Result<T> = std::result::Result<T, AyurdxError>;

/// Main error type for Ayurdx
#[derive(Debug, thiserror::Error)]
pub enum AyurdxError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] adapters::DatasetError),

    #[error("Storage operation failed: {0}")]
    Storage(#[from] adapters::StorageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Prescription dataset is empty")]
    EmptyDataset,

    #[error("Training failed: {0}")]
    Training(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
