//! SQLite sink implementation

use crate::extract::Record;
use crate::storage::merge::merge_document;
use crate::storage::schema::{initialize_schema, table_name};
use crate::storage::traits::{Collection, RecordKey, Sink, SinkError, SinkResult};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

/// SQLite sink
///
/// Stores the merged JSON document of every key. Writes are serialized
/// through one connection; each write reads, merges and upserts inside a
/// transaction.
pub struct SqliteSink {
    conn: Mutex<Connection>,
}

impl SqliteSink {
    /// Opens or creates the database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Successfully opened/created database
    /// * `Err(SinkError)` - Failed to open database
    pub fn new(path: &Path) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates an in-memory database
    pub fn new_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> SinkResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| SinkError::Poisoned)
    }

    /// Loads the stored document of a key
    pub fn load(&self, key: &RecordKey) -> SinkResult<Option<Value>> {
        let conn = self.conn()?;
        load_body(&conn, key)
    }

    /// Number of keys stored in a collection
    pub fn count(&self, collection: Collection) -> SinkResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table_name(collection)),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }
}

fn load_body(conn: &Connection, key: &RecordKey) -> SinkResult<Option<Value>> {
    let body: Option<String> = conn
        .query_row(
            &format!(
                "SELECT body FROM {} WHERE name = ?1",
                table_name(key.collection)
            ),
            params![key.name],
            |row| row.get(0),
        )
        .optional()?;

    match body {
        Some(body) => Ok(Some(serde_json::from_str(&body)?)),
        None => Ok(None),
    }
}

impl Sink for SqliteSink {
    fn write(&self, key: &RecordKey, record: &Record) -> SinkResult<()> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let existing = if key.collection.appends() {
            load_body(&tx, key)?
        } else {
            None
        };
        let merged = merge_document(key, existing, record)?;

        tx.execute(
            &format!(
                "INSERT INTO {} (name, body, updated_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT(name) DO UPDATE SET body = excluded.body, updated_at = excluded.updated_at",
                table_name(key.collection)
            ),
            params![key.name, serde_json::to_string(&merged)?, Utc::now().to_rfc3339()],
        )?;

        tx.commit()?;
        Ok(())
    }
}
