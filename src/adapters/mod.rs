//! Adapters layer: Concrete implementations of ports.
//!
//! These modules contain the actual integration with external libraries:
//! - `csv`: prescription dataset loading
//! - `tree`: decision tree classifier and seeded dataset splits
//! - `sqlite`: SQLite for local storage
//! - `sanitize`: demographic redaction for logs

pub mod csv;
pub mod sanitize;
pub mod sqlite;
pub mod tree;

// Re-export adapter errors for lib.rs
pub use self::csv::DatasetError;
pub use self::sqlite::StorageError;
