//! File-backed `HistoryStorage` for the terminal client.
//!
//! One JSON object per file maps storage keys to their string values, the
//! same shape `localStorage` has in the browser. Writes go to a sibling temp
//! file first and are renamed into place so a crash never leaves a torn file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use mapkit::{HistoryStorage, StorageError};

#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(None),
            Ok(raw) => Ok(Some(raw)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::Read(format!("{}: {e}", self.path.display()))),
        }
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match self.read_raw()? {
            Some(raw) => serde_json::from_str(&raw).map_err(|e| StorageError::Read(format!("{}: {e}", self.path.display()))),
            None => Ok(BTreeMap::new()),
        }
    }

    /// Map to rewrite on `write`/`remove`, plus whether the file on disk was
    /// unparseable and must be replaced even if nothing else changes.
    fn load_for_update(&self) -> Result<(BTreeMap<String, String>, bool), StorageError> {
        let Some(raw) = self.read_raw()? else {
            return Ok((BTreeMap::new(), false));
        };
        match serde_json::from_str(&raw) {
            Ok(map) => Ok((map, false)),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "history file is not valid JSON, overwriting");
                Ok((BTreeMap::new(), true))
            }
        }
    }

    fn save(&self, map: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let write_err = |e: std::io::Error| StorageError::Write(format!("{}: {e}", self.path.display()));
        if map.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(write_err(e)),
                _ => Ok(()),
            };
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        let raw = serde_json::to_string_pretty(map)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, raw).map_err(write_err)?;
        fs::rename(&tmp, &self.path).map_err(write_err)
    }
}

impl HistoryStorage for FileStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        let (mut map, _) = self.load_for_update()?;
        map.insert(key.to_owned(), value.to_owned());
        self.save(&map)
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let (mut map, corrupt) = self.load_for_update()?;
        if map.remove(key).is_none() && !corrupt {
            return Ok(());
        }
        self.save(&map)
    }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod tests;
