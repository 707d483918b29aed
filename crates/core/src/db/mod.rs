//! SQLite resource store.
//!
//! Each table has a module of free functions taking a `&Connection`, so the same query runs
//! against a plain connection or inside a [`rusqlite::Transaction`].

pub mod appointments;
pub mod attachments;
pub mod cases;
pub mod patients;
pub mod procedures;
mod schema;
pub mod teams;

pub use schema::SCHEMA;

use crate::soft_delete::{Deletable, Deletion};
use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use thiserror::Error;

/// Database errors.
#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("database lock poisoned")]
    Poisoned,
}

pub type DbResult<T> = Result<T, DbError>;

/// Database connection wrapper.
#[derive(Debug)]
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

    fn initialize(&self) -> DbResult<()> {
        register_functions(&self.conn)?;
        self.conn.execute_batch(SCHEMA)?;
        Ok(())
    }

    pub fn conn(&self) -> &Connection {
        &self.conn
    }

    pub fn transaction(&mut self) -> DbResult<rusqlite::Transaction<'_>> {
        Ok(self.conn.transaction()?)
    }

    /// Soft-deletes `record` and everything it cascades to, atomically.
    ///
    /// Nothing is committed unless the whole cascade succeeds, and audit lines are written only
    /// after the commit.
    pub fn soft_delete<T: Deletable>(&mut self, record: &T) -> DbResult<Vec<Deletion>> {
        let tx = self.transaction()?;
        let deleted = record.soft_delete(&tx)?;
        tx.commit()?;
        for deletion in &deleted {
            deletion.audit();
        }
        Ok(deleted)
    }
}

/// A [`Database`] shared between request handlers.
///
/// Each caller holds the lock for the whole of one service operation.
#[derive(Debug, Clone)]
pub struct SharedDatabase(Arc<Mutex<Database>>);

impl SharedDatabase {
    pub fn new(db: Database) -> Self {
        Self(Arc::new(Mutex::new(db)))
    }

    pub fn lock(&self) -> DbResult<MutexGuard<'_, Database>> {
        self.0.lock().map_err(|_| DbError::Poisoned)
    }
}

/// SQL function name for Unicode-aware lowercasing. SQLite's own `lower()` only folds ASCII.
pub(crate) const UNICODE_LOWER: &str = "unicode_lower";

fn register_functions(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        UNICODE_LOWER,
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| t.to_lowercase()))
        },
    )
}

/// Escapes `LIKE` wildcards so user input matches literally (use with `ESCAPE '\'`).
pub(crate) fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for ch in query.to_lowercase().chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unicode_lower_folds_accented_letters() {
        let db = Database::open_in_memory().unwrap();
        let folded: String = db
            .conn()
            .query_row("SELECT unicode_lower('ÁNGELA NÚÑEZ')", [], |row| row.get(0))
            .unwrap();
        assert_eq!(folded, "ángela núñez");
    }

    #[test]
    fn test_open_in_memory() {
        let db = Database::open_in_memory();
        assert!(db.is_ok());
    }

    #[test]
    fn test_schema_initialized() {
        let db = Database::open_in_memory().unwrap();

        let tables: Vec<String> = db
            .conn()
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .filter_map(|r| r.ok())
            .collect();

        for table in [
            "appointments",
            "attachments",
            "cases",
            "mission_teams",
            "missions",
            "patients",
            "procedures",
            "teams",
        ] {
            assert!(tables.contains(&table.to_string()), "missing {table}");
        }
    }

    #[test]
    fn test_schema_is_idempotent() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("mission.sqlite3");
        drop(Database::open(&path).unwrap());
        assert!(Database::open(&path).is_ok());
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("Ju"), "%ju%");
        assert_eq!(like_pattern("50%_a\\"), "%50\\%\\_a\\\\%");
    }
}
