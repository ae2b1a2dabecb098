//! Durable verdict cache
//!
//! Maps `(network, address)` to the last verdict produced for it. Records are
//! independent, so every operation is a single-key transaction.

mod sqlite;

pub use sqlite::SqliteVerdictStore;

use crate::models::VerdictRecord;
use crate::utils::{unix_now, Result};

/// Storage key: `network:address`
pub fn make_key(network: &str, address: &str) -> String {
    format!("{}:{}", network, address)
}

pub trait VerdictStore: Send + Sync {
    /// Stored record, or `None` when absent or unreadable
    fn get(&self, network: &str, address: &str) -> Result<Option<VerdictRecord>>;

    /// Overwrite the record. An unset `checked_at` is stamped with the current time.
    fn put(&self, network: &str, address: &str, record: VerdictRecord) -> Result<()>;

    fn delete(&self, network: &str, address: &str) -> Result<()>;

    /// True when absent, missing a timestamp, or older than `ttl_secs`
    fn is_stale(&self, network: &str, address: &str, ttl_secs: u64) -> Result<bool> {
        let record = self.get(network, address)?;
        Ok(is_record_stale(record.as_ref(), ttl_secs, unix_now()))
    }

    /// Force the address to `blocked` with manual provenance, keeping prior flags
    fn mark_manual_block(&self, network: &str, address: &str) -> Result<VerdictRecord> {
        let previous = self.get(network, address)?;
        let record = VerdictRecord::manual_block(previous, unix_now());
        self.put(network, address, record.clone())?;
        Ok(record)
    }
}

pub(crate) fn is_record_stale(record: Option<&VerdictRecord>, ttl_secs: u64, now: i64) -> bool {
    let ttl = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
    match record.and_then(|r| r.checked_at) {
        Some(checked_at) => now.saturating_sub(checked_at) > ttl,
        None => true,
    }
}
