//! Storage port: Trait for persistent storage operations.
//!
//! This trait abstracts the storage backend (SQLite) from the application logic.

use crate::domain::Assessment;

/// A page of assessments with pagination metadata.
#[derive(Debug, Clone)]
pub struct AssessmentPage {
    /// Assessments in this page
    pub items: Vec<Assessment>,
    /// Total count of all assessments
    pub total_count: usize,
    /// Current page offset
    pub offset: usize,
    /// Page size limit
    pub limit: usize,
    /// Whether there are more pages
    pub has_more: bool,
}

impl AssessmentPage {
    /// Create a new assessment page.
    #[must_use]
    pub fn new(items: Vec<Assessment>, total_count: usize, offset: usize, limit: usize) -> Self {
        let has_more = offset + items.len() < total_count;
        Self {
            items,
            total_count,
            offset,
            limit,
            has_more,
        }
    }

    /// Get the next page offset.
    #[must_use]
    pub fn next_offset(&self) -> Option<usize> {
        if self.has_more {
            Some(self.offset + self.limit)
        } else {
            None
        }
    }

    /// Get the previous page offset.
    #[must_use]
    pub fn prev_offset(&self) -> Option<usize> {
        if self.offset > 0 {
            Some(self.offset.saturating_sub(self.limit))
        } else {
            None
        }
    }
}

/// Trait for local storage of assessments.
///
/// Each saved assessment is three linked records: the user's demographics,
/// the prediction referencing the user, and the recommendations referencing
/// the prediction. The prediction id identifies the assessment.
pub trait Storage: Send + Sync {
    /// Error type for storage operations.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Save an assessment atomically.
    ///
    /// # Returns
    /// The new prediction id.
    ///
    /// # Errors
    /// Returns error if storage operation fails; nothing is written in that case.
    fn save_assessment(&self, assessment: &Assessment) -> Result<i64, Self::Error>;

    /// Load one assessment by prediction id.
    ///
    /// # Returns
    /// `None` if no such prediction exists.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_assessment(&self, id: i64) -> Result<Option<Assessment>, Self::Error>;

    /// Load recent assessments (newest first, up to `limit`).
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_recent_assessments(&self, limit: usize) -> Result<Vec<Assessment>, Self::Error>;

    /// Load assessments with pagination (newest first).
    ///
    /// # Arguments
    /// * `offset` - Starting position (0-indexed)
    /// * `limit` - Maximum number of items to return
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn load_assessments_paginated(&self, offset: usize, limit: usize) -> Result<AssessmentPage, Self::Error>;

    /// Get the total count of assessments.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn count_assessments(&self) -> Result<usize, Self::Error>;

    /// Delete an assessment and its linked records.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn delete_assessment(&self, id: i64) -> Result<(), Self::Error>;

    /// Clear all data.
    ///
    /// # Errors
    /// Returns error if storage operation fails.
    fn clear_all(&self) -> Result<(), Self::Error>;
}
