//! SQLite adapter: Implementation of Storage.
//!
//! Provides local persistence for assessments as three linked tables:
//! `users` (demographics), `predictions` (symptoms, severity, outcome) and
//! `recommendations` (herbs, lifestyle, diet). List columns hold JSON arrays.
//!
//! # Mutex Behavior
//!
//! Database connection is protected by `Mutex`. A poisoned mutex (from panic
//! in another thread) will cause panic. Fail-fast keeps a half-written
//! assessment from being observed.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::domain::{Assessment, Gender, Prediction, RecommendationBundle, Severity};
use crate::ports::{AssessmentPage, Storage};

/// Error type for storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

const SELECT_ASSESSMENT: &str = r"
    SELECT p.id, u.age, u.gender, p.symptoms, p.severity,
           p.predicted_disease, p.confidence_score, p.created_at,
           r.herbs, r.lifestyle, r.diet
    FROM predictions p
    JOIN users u ON u.id = p.user_id
    JOIN recommendations r ON r.prediction_id = p.id
";

/// SQLite storage adapter.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

impl SqliteStorage {
    /// Create a new SQLite storage with the given database path.
    ///
    /// # Errors
    /// Returns error if database cannot be opened or initialized.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StorageError> {
        let conn = Connection::open(path)?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Create an in-memory SQLite database (for testing).
    ///
    /// # Errors
    /// Returns error if database cannot be created.
    pub fn in_memory() -> Result<Self, StorageError> {
        let conn = Connection::open_in_memory()?;
        let storage = Self {
            conn: Mutex::new(conn),
        };
        storage.init_schema()?;
        Ok(storage)
    }

    /// Initialize the database schema.
    fn init_schema(&self) -> Result<(), StorageError> {
        let conn = self.conn.lock().expect("Lock failed");

        conn.execute_batch(
            r"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                age INTEGER NOT NULL,
                gender TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS predictions (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER NOT NULL REFERENCES users(id),
                symptoms TEXT NOT NULL,
                severity INTEGER NOT NULL,
                predicted_disease TEXT NOT NULL,
                confidence_score REAL NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS recommendations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                prediction_id INTEGER NOT NULL REFERENCES predictions(id),
                herbs TEXT NOT NULL,
                lifestyle TEXT NOT NULL,
                diet TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_predictions_created
                ON predictions(created_at DESC);
            ",
        )?;

        Ok(())
    }

    fn to_json(list: &[String]) -> Result<String, StorageError> {
        serde_json::to_string(list).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Read a JSON array column.
    fn json_list(row: &Row<'_>, idx: usize) -> rusqlite::Result<Vec<String>> {
        let raw: String = row.get(idx)?;
        serde_json::from_str(&raw)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    }

    /// Map a row of [`SELECT_ASSESSMENT`] to an assessment.
    fn row_to_assessment(row: &Row<'_>) -> rusqlite::Result<Assessment> {
        let id: i64 = row.get(0)?;
        let age: i64 = row.get(1)?;
        let gender_code: String = row.get(2)?;
        let symptoms = Self::json_list(row, 3)?;
        let severity_level: i64 = row.get(4)?;
        let disease: String = row.get(5)?;
        let confidence: f64 = row.get(6)?;
        let created_at_str: String = row.get(7)?;

        let gender = Gender::from_code(&gender_code).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                2,
                Type::Text,
                format!("unknown gender code {gender_code:?}").into(),
            )
        })?;
        let severity = u8::try_from(severity_level)
            .ok()
            .and_then(Severity::from_level)
            .ok_or(rusqlite::Error::IntegralValueOutOfRange(4, severity_level))?;
        let age = u32::try_from(age).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(1, age))?;

        let created_at = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map(|dt| dt.with_timezone(&chrono::Utc))
            .unwrap_or_else(|_| chrono::Utc::now());

        Ok(Assessment {
            id: Some(id),
            age,
            gender,
            symptoms,
            severity,
            prediction: Prediction::new(disease, confidence),
            recommendations: RecommendationBundle {
                herbs: Self::json_list(row, 8)?,
                lifestyle: Self::json_list(row, 9)?,
                diet: Self::json_list(row, 10)?,
            },
            created_at,
        })
    }
}

impl Storage for SqliteStorage {
    type Error = StorageError;

    fn save_assessment(&self, assessment: &Assessment) -> Result<i64, Self::Error> {
        let symptoms = Self::to_json(&assessment.symptoms)?;
        let herbs = Self::to_json(&assessment.recommendations.herbs)?;
        let lifestyle = Self::to_json(&assessment.recommendations.lifestyle)?;
        let diet = Self::to_json(&assessment.recommendations.diet)?;
        let created_at = assessment
            .created_at
            .to_rfc3339_opts(chrono::SecondsFormat::Micros, true);

        let mut conn = self.conn.lock().expect("Lock failed");
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO users (age, gender, created_at) VALUES (?1, ?2, ?3)",
            params![assessment.age, assessment.gender.code(), created_at],
        )?;
        let user_id = tx.last_insert_rowid();

        tx.execute(
            r"
            INSERT INTO predictions (
                user_id, symptoms, severity, predicted_disease,
                confidence_score, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
            params![
                user_id,
                symptoms,
                assessment.severity.level(),
                assessment.prediction.disease,
                assessment.prediction.confidence,
                created_at,
            ],
        )?;
        let prediction_id = tx.last_insert_rowid();

        tx.execute(
            r"
            INSERT INTO recommendations (prediction_id, herbs, lifestyle, diet, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ",
            params![prediction_id, herbs, lifestyle, diet, created_at],
        )?;

        tx.commit()?;

        tracing::debug!("Saved assessment {} to storage", prediction_id);
        Ok(prediction_id)
    }

    fn load_assessment(&self, id: i64) -> Result<Option<Assessment>, Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");
        let sql = format!("{SELECT_ASSESSMENT} WHERE p.id = ?1");
        let assessment = conn
            .query_row(&sql, params![id], Self::row_to_assessment)
            .optional()?;
        Ok(assessment)
    }

    fn load_recent_assessments(&self, limit: usize) -> Result<Vec<Assessment>, Self::Error> {
        Ok(self.load_assessments_paginated(0, limit)?.items)
    }

    fn load_assessments_paginated(&self, offset: usize, limit: usize) -> Result<AssessmentPage, Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");

        let total_count: i64 = conn.query_row("SELECT COUNT(*) FROM predictions", [], |row| row.get(0))?;

        let sql = format!("{SELECT_ASSESSMENT} ORDER BY p.created_at DESC, p.id DESC LIMIT ?1 OFFSET ?2");
        let mut stmt = conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![limit as i64, offset as i64], Self::row_to_assessment)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AssessmentPage::new(items, total_count as usize, offset, limit))
    }

    fn count_assessments(&self) -> Result<usize, Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");

        let count: i64 = conn.query_row("SELECT COUNT(*) FROM predictions", [], |row| row.get(0))?;

        Ok(count as usize)
    }

    fn delete_assessment(&self, id: i64) -> Result<(), Self::Error> {
        let mut conn = self.conn.lock().expect("Lock failed");
        let tx = conn.transaction()?;

        let user_id: i64 = tx
            .query_row("SELECT user_id FROM predictions WHERE id = ?1", params![id], |row| row.get(0))
            .optional()?
            .ok_or_else(|| StorageError::NotFound(format!("assessment {id}")))?;

        tx.execute("DELETE FROM recommendations WHERE prediction_id = ?1", params![id])?;
        tx.execute("DELETE FROM predictions WHERE id = ?1", params![id])?;
        tx.execute("DELETE FROM users WHERE id = ?1", params![user_id])?;
        tx.commit()?;
        Ok(())
    }

    fn clear_all(&self) -> Result<(), Self::Error> {
        let conn = self.conn.lock().expect("Lock failed");
        conn.execute_batch("DELETE FROM recommendations; DELETE FROM predictions; DELETE FROM users;")?;
        tracing::warn!("Cleared all data from storage");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_assessment(disease: &str, confidence: f64) -> Assessment {
        Assessment::new(
            40,
            Gender::Male,
            vec!["headache".to_string(), "nausea".to_string(), "irritability".to_string()],
            Severity::High,
            Prediction::new(disease, confidence),
            RecommendationBundle::for_drug("Pathyadi kwath"),
        )
    }

    fn table_count(storage: &SqliteStorage, table: &str) -> i64 {
        let conn = storage.conn.lock().expect("Lock failed");
        conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .expect("Should count")
    }

    #[test]
    fn test_assessment_roundtrip() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        let assessment = sample_assessment("Migraine", 0.1837);

        let id = storage.save_assessment(&assessment).expect("Should save");
        let loaded = storage
            .load_assessment(id)
            .expect("Should load")
            .expect("Should exist");

        assert_eq!(loaded.id, Some(id));
        assert_eq!(loaded.age, 40);
        assert_eq!(loaded.gender, Gender::Male);
        assert_eq!(loaded.symptoms, assessment.symptoms);
        assert_eq!(loaded.severity, Severity::High);
        assert_eq!(loaded.prediction, assessment.prediction);
        assert_eq!(loaded.recommendations, assessment.recommendations);
        assert_eq!(loaded.created_at.timestamp(), assessment.created_at.timestamp());

        assert!(storage.load_assessment(id + 100).expect("Should query").is_none());
    }

    #[test]
    fn test_save_creates_three_linked_rows() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        let id = storage
            .save_assessment(&sample_assessment("Flu", 0.3))
            .expect("Should save");

        assert_eq!(table_count(&storage, "users"), 1);
        assert_eq!(table_count(&storage, "predictions"), 1);
        assert_eq!(table_count(&storage, "recommendations"), 1);

        let conn = storage.conn.lock().expect("Lock failed");
        let linked: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM recommendations r JOIN predictions p ON p.id = r.prediction_id \
                 JOIN users u ON u.id = p.user_id WHERE p.id = ?1",
                params![id],
                |row| row.get(0),
            )
            .expect("Should join");
        assert_eq!(linked, 1);
    }

    #[test]
    fn test_recent_and_pagination() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        assert_eq!(storage.count_assessments().expect("Should count"), 0);

        let mut ids = Vec::new();
        for i in 0..5 {
            ids.push(
                storage
                    .save_assessment(&sample_assessment(&format!("D{i}"), 0.1 * i as f64))
                    .expect("Should save"),
            );
        }
        assert_eq!(storage.count_assessments().expect("Should count"), 5);

        let recent = storage.load_recent_assessments(2).expect("Should load");
        assert_eq!(recent.len(), 2);

        let page = storage.load_assessments_paginated(2, 2).expect("Should page");
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 5);
        assert!(page.has_more);
        assert_eq!(page.next_offset(), Some(4));

        let last = storage.load_assessments_paginated(4, 2).expect("Should page");
        assert_eq!(last.items.len(), 1);
        assert!(!last.has_more);
    }

    #[test]
    fn test_delete_and_clear() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        let a = storage.save_assessment(&sample_assessment("Flu", 0.3)).expect("Should save");
        storage.save_assessment(&sample_assessment("Malaria", 0.4)).expect("Should save");

        storage.delete_assessment(a).expect("Should delete");
        assert_eq!(storage.count_assessments().expect("Should count"), 1);
        assert_eq!(table_count(&storage, "users"), 1);
        assert_eq!(table_count(&storage, "recommendations"), 1);
        assert!(matches!(
            storage.delete_assessment(a),
            Err(StorageError::NotFound(_))
        ));

        storage.clear_all().expect("Should clear");
        assert_eq!(storage.count_assessments().expect("Should count"), 0);
        assert_eq!(table_count(&storage, "users"), 0);
    }
    #[test]
    fn test_corrupt_list_column_is_storage_error() {
        let storage = SqliteStorage::in_memory().expect("Should create db");
        let id = storage.save_assessment(&sample_assessment("Flu", 0.3)).expect("Should save");
        {
            let conn = storage.conn.lock().expect("Lock failed");
            conn.execute("UPDATE predictions SET symptoms = 'not json' WHERE id = ?1", [id])
                .expect("Should update");
        }

        let err = storage.load_assessment(id).expect_err("Should fail to decode");
        assert!(matches!(err, StorageError::Database(_)));
        assert!(matches!(crate::AyurdxError::from(err), crate::AyurdxError::Storage(_)));
    }
}
