//! Bounded, persisted, newest-first history of generations.
//!
//! DESIGN
//! ======
//! `HistoryStore` is the single owner of the in-memory list and mirrors it to
//! an injected `HistoryStorage` after every mutation. The browser backs it
//! with `localStorage`, the CLI with a JSON file, and tests with
//! `MemoryStorage`.
//!
//! ERROR HANDLING
//! ==============
//! A corrupt persisted list is logged and treated as empty. Write failures
//! are returned to the caller after the in-memory list has already changed,
//! so the current session stays consistent even when persistence is lost.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::types::{GenerationRequest, GenerationResult};

/// Storage key holding the serialized history list.
pub const HISTORY_KEY: &str = "mapmind_kroki_v2";

/// Maximum number of entries kept.
pub const HISTORY_LIMIT: usize = 20;

/// Label for a timestamp outside the representable date range.
const UNKNOWN_TIME: &str = "unknown";

// =============================================================================
// ENTRY
// =============================================================================

/// One successful generation. Field names match the persisted JSON format.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: String,
    #[serde(rename = "input")]
    pub input_summary: String,
    pub diagram_code: String,
    #[serde(default)]
    pub questions: Vec<String>,
    /// Milliseconds since the Unix epoch.
    #[serde(rename = "timestamp")]
    pub created_at: i64,
}

impl HistoryEntry {
    /// Build an entry for a completed generation with a fresh id.
    #[must_use]
    pub fn from_generation(request: &GenerationRequest, result: &GenerationResult, created_at: i64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            input_summary: request.input_summary(),
            diagram_code: result.diagram_code.clone(),
            questions: result.questions.clone(),
            created_at,
        }
    }

    /// Result view of this entry, as if it had just been generated.
    #[must_use]
    pub fn to_result(&self) -> GenerationResult {
        GenerationResult { diagram_code: self.diagram_code.clone(), questions: self.questions.clone(), explanation: None }
    }

    fn created_utc(&self) -> Option<time::OffsetDateTime> {
        let nanos = i128::from(self.created_at) * 1_000_000;
        time::OffsetDateTime::from_unix_timestamp_nanos(nanos).ok()
    }

    /// UTC calendar date of `created_at` as `YYYY-MM-DD`.
    #[must_use]
    pub fn created_date(&self) -> String {
        self.created_utc().map_or_else(
            || UNKNOWN_TIME.to_owned(),
            |dt| format!("{:04}-{:02}-{:02}", dt.year(), u8::from(dt.month()), dt.day()),
        )
    }

    /// UTC time of day of `created_at` as `HH:MM`.
    #[must_use]
    pub fn created_time(&self) -> String {
        self.created_utc()
            .map_or_else(|| UNKNOWN_TIME.to_owned(), |dt| format!("{:02}:{:02}", dt.hour(), dt.minute()))
    }

    /// `HH:MM · YYYY-MM-DD` in UTC, the list label for hosts without a local clock.
    #[must_use]
    pub fn created_label(&self) -> String {
        if self.created_utc().is_none() {
            return UNKNOWN_TIME.to_owned();
        }
        format!("{} · {}", self.created_time(), self.created_date())
    }
}

// =============================================================================
// STORAGE
// =============================================================================

/// Errors reported by a [`HistoryStorage`] backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable")]
    Unavailable,
    #[error("storage read failed: {0}")]
    Read(String),
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("history serialize failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous string key-value storage.
pub trait HistoryStorage {
    /// Read the value under `key`; `Ok(None)` when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend cannot be read.
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend rejects the write.
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the backend rejects the removal.
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// In-process storage, used in tests and as an SSR stand-in.
#[derive(Clone, Debug, Default)]
pub struct MemoryStorage {
    values: HashMap<String, String>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

impl HistoryStorage for MemoryStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.values.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.values.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.values.remove(key);
        Ok(())
    }
}

// =============================================================================
// STORE
// =============================================================================

/// History state container over an injected storage backend.
#[derive(Clone, Debug)]
pub struct HistoryStore<S> {
    storage: S,
    entries: Vec<HistoryEntry>,
}

impl<S: HistoryStorage> HistoryStore<S> {
    /// Create an empty store without touching storage.
    pub fn new(storage: S) -> Self {
        Self { storage, entries: Vec::new() }
    }

    /// Create a store and load any persisted history.
    pub fn open(storage: S) -> Self {
        let mut store = Self::new(storage);
        store.restore();
        store
    }

    /// Reload entries from storage. Unreadable or corrupt data yields an
    /// empty history.
    pub fn restore(&mut self) {
        self.entries = match self.storage.read(HISTORY_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryEntry>>(&raw) {
                Ok(mut entries) => {
                    entries.truncate(HISTORY_LIMIT);
                    entries
                }
                Err(e) => {
                    log::warn!("history: failed to parse persisted history, starting empty: {e}");
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                log::warn!("history: failed to read persisted history, starting empty: {e}");
                Vec::new()
            }
        };
    }

    /// Prepend `entry`, keep the newest [`HISTORY_LIMIT`], and persist.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if persisting fails; the in-memory list is
    /// updated regardless.
    pub fn record(&mut self, entry: HistoryEntry) -> Result<(), StorageError> {
        self.entries.insert(0, entry);
        self.entries.truncate(HISTORY_LIMIT);
        self.persist()
    }

    /// Drop every entry and remove the persisted key.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the key cannot be removed; the in-memory
    /// list is cleared regardless.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.entries.clear();
        self.storage.remove(HISTORY_KEY)
    }

    /// Entries, newest first.
    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&HistoryEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    fn persist(&mut self) -> Result<(), StorageError> {
        let raw = serde_json::to_string(&self.entries)?;
        self.storage.write(HISTORY_KEY, &raw)
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
