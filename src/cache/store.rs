//! Key-value store capability used by the request cache
//!
//! The request cache never touches storage directly. It talks to a `Store`,
//! which keeps JSON-encoded `CacheEntry` values under string keys. Two
//! implementations are provided: `MemoryStore` here, and `FileStore` for
//! on-disk persistence between runs.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use thiserror::Error;

/// A provider payload together with its absolute expiry time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry {
    /// The raw provider JSON
    pub data: Value,
    /// Milliseconds since the Unix epoch after which the entry is invalid
    #[serde(rename = "expire")]
    pub expires_at: i64,
}

impl CacheEntry {
    /// Creates an entry that expires `ttl` after `now_ms`
    pub fn new(data: Value, now_ms: i64, ttl: Duration) -> Self {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        Self {
            data,
            expires_at: now_ms.saturating_add(ttl_ms),
        }
    }

    /// Returns true while `now_ms` is strictly before the expiry time
    pub fn is_valid(&self, now_ms: i64) -> bool {
        now_ms < self.expires_at
    }
}

/// Errors raised by a `Store`
#[derive(Debug, Error)]
pub enum StoreError {
    /// The stored value exists but could not be decoded
    #[error("Corrupt cache entry for '{key}': {reason}")]
    Corrupt { key: String, reason: String },

    /// The backing storage could not be read or written
    #[error("Cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An entry could not be encoded
    #[error("Failed to encode cache entry: {0}")]
    Encode(#[from] serde_json::Error),

    /// A lock guarding in-memory state was poisoned
    #[error("Cache lock poisoned")]
    Poisoned,
}

/// Key-value storage for cache entries
pub trait Store: Send + Sync {
    /// Reads the entry stored under `key`
    ///
    /// Returns `Ok(None)` when nothing is stored and `Err(StoreError::Corrupt)`
    /// when the stored value cannot be decoded. Expiry is not checked here.
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError>;

    /// Writes `entry` under `key`, replacing any previous value
    fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError>;

    /// Removes the entry under `key`; removing a missing key is not an error
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Removes every entry whose key starts with `prefix`
    ///
    /// Returns the number of entries removed.
    fn clear_prefix(&self, prefix: &str) -> Result<usize, StoreError>;
}

/// Source of the current time in milliseconds since the Unix epoch
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

/// Process-local store holding entries as JSON text
///
/// Entries are kept encoded so that reads go through the same decode path
/// as the on-disk store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores raw text under `key` without validation
    pub fn insert_raw(&self, key: &str, raw: impl Into<String>) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.insert(key.to_string(), raw.into());
        Ok(())
    }

    /// Number of stored entries, valid or not
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<CacheEntry>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let Some(raw) = entries.get(key) else {
            return Ok(None);
        };

        serde_json::from_str(raw)
            .map(Some)
            .map_err(|e| StoreError::Corrupt {
                key: key.to_string(),
                reason: e.to_string(),
            })
    }

    fn set(&self, key: &str, entry: &CacheEntry) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entry)?;
        self.insert_raw(key, raw)
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn clear_prefix(&self, prefix: &str) -> Result<usize, StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok(before - entries.len())
    }
}
