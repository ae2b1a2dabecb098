use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{make_key, VerdictStore};
use crate::models::VerdictRecord;
use crate::utils::{unix_now, Result};

const CREATE_VERDICTS_SQL: &str = r"
CREATE TABLE IF NOT EXISTS verdicts (
  key TEXT PRIMARY KEY,
  record_json TEXT NOT NULL
);
";

/// SQLite-backed verdict store. One row per `network:address` key holding the
/// record as JSON, so fields this crate does not know about are kept.
pub struct SqliteVerdictStore {
    conn: Mutex<Connection>,
}

impl SqliteVerdictStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        tracing::debug!("Opening verdict store at {}", path.display());
        Self::init(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        conn.execute_batch(CREATE_VERDICTS_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write raw JSON under a key, bypassing encoding
    pub fn put_raw(&self, network: &str, address: &str, raw: &str) -> Result<()> {
        let key = make_key(network, address);
        self.lock().execute(
            "INSERT OR REPLACE INTO verdicts (key, record_json) VALUES (?1, ?2)",
            params![key, raw],
        )?;
        Ok(())
    }

    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .lock()
            .query_row("SELECT COUNT(*) FROM verdicts", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn read_record(conn: &Connection, key: &str) -> Result<Option<VerdictRecord>> {
    let raw: Option<String> = conn
        .query_row(
            "SELECT record_json FROM verdicts WHERE key = ?1",
            params![key],
            |row| row.get(0),
        )
        .optional()?;

    let Some(raw) = raw else {
        return Ok(None);
    };

    match serde_json::from_str::<VerdictRecord>(&raw) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            tracing::warn!("Unreadable verdict for {}, treating as absent: {}", key, e);
            Ok(None)
        }
    }
}

fn write_record(conn: &Connection, key: &str, mut record: VerdictRecord) -> Result<()> {
    if record.checked_at.is_none() {
        record.checked_at = Some(unix_now());
    }
    let raw = serde_json::to_string(&record)?;
    conn.execute(
        "INSERT OR REPLACE INTO verdicts (key, record_json) VALUES (?1, ?2)",
        params![key, raw],
    )?;
    Ok(())
}

impl VerdictStore for SqliteVerdictStore {
    fn get(&self, network: &str, address: &str) -> Result<Option<VerdictRecord>> {
        let conn = self.lock();
        read_record(&conn, &make_key(network, address))
    }

    fn put(&self, network: &str, address: &str, record: VerdictRecord) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        write_record(&tx, &make_key(network, address), record)?;
        tx.commit()?;
        Ok(())
    }

    fn delete(&self, network: &str, address: &str) -> Result<()> {
        let mut conn = self.lock();
        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM verdicts WHERE key = ?1",
            params![make_key(network, address)],
        )?;
        tx.commit()?;
        Ok(())
    }

    /// Read-modify-write inside one transaction
    fn mark_manual_block(&self, network: &str, address: &str) -> Result<VerdictRecord> {
        let key = make_key(network, address);
        let mut conn = self.lock();
        let tx = conn.transaction()?;

        let previous = read_record(&tx, &key)?;
        let record = VerdictRecord::manual_block(previous, unix_now());
        write_record(&tx, &key, record.clone())?;
        tx.commit()?;

        tracing::info!("Manual block recorded for {}", key);
        Ok(record)
    }
}
