//! Explicit handle to the SQLite database.
//!
//! The handle only knows where the database lives. Every call opens its own
//! connection on tokio's blocking pool and drops it when the call returns, so
//! nothing outside the handle holds connection state between requests.

use crate::error::ApiError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    code          TEXT NOT NULL UNIQUE,
    username      TEXT NOT NULL,
    password_hash TEXT NOT NULL,
    role          TEXT NOT NULL,
    department    TEXT,
    create_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS as_checksheet_db (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    department      TEXT NOT NULL,
    model           TEXT NOT NULL,
    machine_no      TEXT NOT NULL,
    as_group        TEXT NOT NULL,
    checksheet_name TEXT,
    checksheet_data TEXT,
    hash            TEXT,
    status          TEXT NOT NULL DEFAULT 'prepare',
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_checksheet_slot
    ON as_checksheet_db (department, model, machine_no, as_group, checksheet_name);

CREATE TABLE IF NOT EXISTS activity_logs (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    user_code   TEXT NOT NULL,
    username    TEXT NOT NULL,
    action_type TEXT NOT NULL,
    target_id   TEXT,
    details     TEXT,
    ip_address  TEXT NOT NULL,
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_activity_user ON activity_logs (user_code, action_type);

CREATE TABLE IF NOT EXISTS as_machine_master (
    id            INTEGER PRIMARY KEY AUTOINCREMENT,
    machine_no    TEXT NOT NULL,
    model         TEXT NOT NULL,
    assigned_form TEXT NOT NULL,
    department    TEXT DEFAULT 'ASSEMBLY',
    created_at    TEXT NOT NULL
);
";

#[derive(Clone, Debug)]
pub struct Database {
    path: Arc<PathBuf>,
}

impl Database {
    /// Opens (creating if needed) the database at `path` and brings the schema
    /// up to date.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let db = Database {
            path: Arc::new(path.as_ref().to_path_buf()),
        };
        let conn = db.connect()?;
        conn.execute_batch("PRAGMA journal_mode = WAL;")?;
        conn.execute_batch(SCHEMA)?;
        Ok(db)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a fresh connection. Callers on the async side should go through
    /// [`Database::run`] instead.
    pub fn connect(&self) -> Result<Connection, rusqlite::Error> {
        let conn = Connection::open(self.path.as_ref())?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }

    /// Runs `f` with its own connection on the blocking thread pool.
    pub async fn run<F, T>(&self, f: F) -> Result<T, ApiError>
    where
        F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
        T: Send + 'static,
    {
        let db = self.clone();
        tokio::task::spawn_blocking(move || {
            let conn = db.connect()?;
            f(&conn)
        })
        .await
        .map_err(|e| ApiError::Internal(format!("Task join error: {}", e)))?
    }
}

/// Converts a stored text column back into a typed value, reporting bad data
/// as a conversion failure on that column.
pub(crate) fn parse_column<T>(idx: usize, raw: String) -> Result<T, rusqlite::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

#[cfg(test)]
pub(crate) mod testing {
    use super::Database;
    use tempfile::TempDir;

    /// A migrated database in its own temporary directory. Keep the `TempDir`
    /// alive for as long as the database is used.
    pub fn temp_database() -> (TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path().join("checksheet.sqlite")).unwrap();
        (dir, db)
    }
}
