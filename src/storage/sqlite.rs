//! SQLite storage implementation
//!
//! Every public operation runs as exactly one transaction against the
//! `files` table. Failures are classified at this boundary: opening and
//! schema work map to `StoreUnavailable`, reads to `ReadFailed`, writes to
//! `WriteFailed`.

use std::path::Path;
use std::time::Duration;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use crate::codec::format_timestamp;
use crate::record::{FileRecord, NewFileRecord};
use crate::{Error, Result};
use super::schema;

/// How long a connection waits on a lock held by another process
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite-backed storage for file records
pub struct SqliteStore {
    conn: Mutex<Connection>,
    schema_created: bool,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(unavailable)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;",
        )
        .map_err(unavailable)?;
        conn.busy_timeout(BUSY_TIMEOUT).map_err(unavailable)?;
        Self::from_connection(conn)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(unavailable)?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Result<Self> {
        let schema_created = Self::initialize_schema(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
            schema_created,
        })
    }

    /// Bring the schema to `SCHEMA_VERSION`, returning whether any schema
    /// statements ran.
    ///
    /// The version check and creation share one IMMEDIATE transaction so two
    /// processes opening a fresh file cannot both create the table.
    fn initialize_schema(conn: &mut Connection) -> Result<bool> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(unavailable)?;

        let version: i64 = tx
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .map_err(unavailable)?;

        if version > schema::SCHEMA_VERSION {
            return Err(Error::StoreUnavailable(format!(
                "database schema version {} is newer than supported version {}",
                version,
                schema::SCHEMA_VERSION
            )));
        }

        if version == schema::SCHEMA_VERSION {
            tx.commit().map_err(unavailable)?;
            return Ok(false);
        }

        for stmt in schema::upgrade_statements(version) {
            tx.execute(stmt, []).map_err(unavailable)?;
        }
        tx.pragma_update(None, "user_version", schema::SCHEMA_VERSION)
            .map_err(unavailable)?;
        tx.commit().map_err(unavailable)?;

        tracing::debug!(
            "Initialized schema from version {} to {}",
            version,
            schema::SCHEMA_VERSION
        );
        Ok(true)
    }

    /// Whether opening this store performed schema creation or upgrade
    pub fn schema_created(&self) -> bool {
        self.schema_created
    }

    /// Schema version recorded in the database
    pub fn schema_version(&self) -> Result<i64> {
        let conn = self.conn.lock();
        conn.pragma_query_value(None, "user_version", |row| row.get(0))
            .map_err(read_failed)
    }

    // ========== Write Operations ==========

    /// Insert a record, returning the store-assigned id
    pub fn insert(&self, record: &NewFileRecord) -> Result<i64> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(write_failed)?;
        tx.execute(
            r#"
            INSERT INTO files (name, mime_type, size, data, text_content, created)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
            params![
                record.name,
                record.mime_type,
                record.size as i64,
                record.data,
                record.text_content,
                format_timestamp(&record.created),
            ],
        )
        .map_err(write_failed)?;
        let id = tx.last_insert_rowid();
        tx.commit().map_err(write_failed)?;
        Ok(id)
    }

    /// Delete a record by id, returning whether it existed
    pub fn remove(&self, id: i64) -> Result<bool> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(write_failed)?;
        let removed = tx
            .execute("DELETE FROM files WHERE id = ?1", [id])
            .map_err(write_failed)?;
        tx.commit().map_err(write_failed)?;
        Ok(removed > 0)
    }

    /// Delete every record, returning how many were removed
    pub fn clear(&self) -> Result<usize> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(write_failed)?;
        let removed = tx.execute("DELETE FROM files", []).map_err(write_failed)?;
        tx.commit().map_err(write_failed)?;
        Ok(removed)
    }

    // ========== Read Operations ==========

    /// Fetch every record, in whatever order the engine yields them
    pub fn fetch_all(&self) -> Result<Vec<FileRecord>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(read_failed)?;
        let records = {
            let mut stmt = tx
                .prepare(&format!("SELECT {} FROM files", schema::RECORD_COLUMNS))
                .map_err(read_failed)?;
            let rows = stmt.query_map([], row_to_record).map_err(read_failed)?;
            let records: Vec<FileRecord> = rows
                .collect::<rusqlite::Result<_>>()
                .map_err(read_failed)?;
            records
        };
        tx.commit().map_err(read_failed)?;
        Ok(records)
    }

    /// Fetch one record by id
    pub fn fetch(&self, id: i64) -> Result<Option<FileRecord>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(read_failed)?;
        let record = tx
            .query_row(
                &format!("SELECT {} FROM files WHERE id = ?1", schema::RECORD_COLUMNS),
                [id],
                row_to_record,
            )
            .optional()
            .map_err(read_failed)?;
        tx.commit().map_err(read_failed)?;
        Ok(record)
    }

    /// Get vault statistics
    pub fn stats(&self) -> Result<VaultStats> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction().map_err(read_failed)?;
        let (records, text_records, total_bytes): (i64, i64, i64) = tx
            .query_row(
                "SELECT COUNT(*), COUNT(text_content), COALESCE(SUM(size), 0) FROM files",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .map_err(read_failed)?;
        let schema_version: i64 = tx
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .map_err(read_failed)?;
        tx.commit().map_err(read_failed)?;

        Ok(VaultStats {
            records: records as usize,
            text_records: text_records as usize,
            total_bytes: total_bytes as u64,
            schema_version,
        })
    }
}

/// Helper to convert a row to a FileRecord
fn row_to_record(row: &rusqlite::Row) -> rusqlite::Result<FileRecord> {
    let created_str: String = row.get(6)?;
    let created = DateTime::parse_from_rfc3339(&created_str)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(6, rusqlite::types::Type::Text, Box::new(e))
        })?
        .with_timezone(&Utc);

    Ok(FileRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        mime_type: row.get(2)?,
        size: row.get::<_, i64>(3)? as u64,
        data: row.get(4)?,
        text_content: row.get(5)?,
        created,
    })
}

fn unavailable(e: rusqlite::Error) -> Error {
    Error::StoreUnavailable(e.to_string())
}

fn read_failed(e: rusqlite::Error) -> Error {
    Error::ReadFailed(e.to_string())
}

fn write_failed(e: rusqlite::Error) -> Error {
    Error::WriteFailed(e.to_string())
}

/// Vault statistics
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct VaultStats {
    pub records: usize,
    pub text_records: usize,
    pub total_bytes: u64,
    pub schema_version: i64,
}

impl std::fmt::Display for VaultStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Vault Statistics:")?;
        writeln!(f, "  Files: {}", self.records)?;
        writeln!(f, "  Text files: {}", self.text_records)?;
        writeln!(f, "  Total bytes: {}", self.total_bytes)?;
        writeln!(f, "  Schema version: {}", self.schema_version)
    }
}
