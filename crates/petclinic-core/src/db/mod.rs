//! Database layer for petclinic.

mod owners;
mod pets;
mod schema;
mod vets;
mod visits;

pub use schema::*;

use rusqlite::Connection;
use std::path::Path;
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open database at path, creating if needed.
    pub fn open<P: AsRef<Path>>(path: P) -> DbResult<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Create in-memory database (for testing).
    pub fn open_in_memory() -> DbResult<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.initialize()?;
        Ok(db)
    }

    /// Initialize schema.
    fn initialize(&self) -> DbResult<()> {
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    /// Get raw connection (for advanced queries).
    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Begin a transaction. Inserts and updates issued through `self` join it
    /// until it is committed; dropping it uncommitted rolls them back.
    pub fn transaction(&self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.unchecked_transaction()?)
    }
}

/// Parse a stored `yyyy-MM-dd` column.
pub(crate) fn parse_date(column: &str, value: &str) -> DbResult<chrono::NaiveDate> {
    chrono::NaiveDate::parse_from_str(value, crate::models::DATE_FORMAT)
        .map_err(|e| DbError::Constraint(format!("Invalid {} '{}': {}", column, value, e)))
}

/// Format a date for storage.
pub(crate) fn format_date(date: &chrono::NaiveDate) -> String {
    date.format(crate::models::DATE_FORMAT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        // Check that tables exist
        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        assert!(tables.contains(&"owners".to_string()));
        assert!(tables.contains(&"pets".to_string()));
        assert!(tables.contains(&"vets".to_string()));
        assert!(tables.contains(&"visits".to_string()));
    }

    #[test]
    fn test_dropped_transaction_rolls_back() {
        let db = Database::open_in_memory().unwrap();
        {
            let _tx = db.transaction().unwrap();
            db.conn()
                .execute(
                    "INSERT INTO vets (first_name, last_name) VALUES ('James', 'Carter')",
                    [],
                )
                .unwrap();
        }
        let count: i64 = db
            .conn()
            .query_row("SELECT COUNT(*) FROM vets", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_parse_date() {
        let date = parse_date("visit_date", "2024-01-10").unwrap();
        assert_eq!(format_date(&date), "2024-01-10");

        let err = parse_date("visit_date", "10/01/2024").unwrap_err();
        assert!(matches!(err, DbError::Constraint(_)));
    }
}
