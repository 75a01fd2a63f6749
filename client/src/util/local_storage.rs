//! Browser `localStorage` backend for the history store.
//!
//! SYSTEM CONTEXT
//! ==============
//! `mapkit::HistoryStore` owns the history logic and talks to storage only
//! through `HistoryStorage`. This adapter centralizes the web-sys glue so
//! components never touch `localStorage` directly. On the server (SSR) there
//! is no browser storage: reads yield nothing and writes report `Unavailable`.

use mapkit::{HistoryStorage, StorageError};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocalStorage;

#[cfg(feature = "hydrate")]
fn storage() -> Result<web_sys::Storage, StorageError> {
    web_sys::window()
        .and_then(|w| w.local_storage().ok().flatten())
        .ok_or(StorageError::Unavailable)
}

#[cfg(feature = "hydrate")]
fn js_error(err: &wasm_bindgen::JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

impl HistoryStorage for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        #[cfg(feature = "hydrate")]
        {
            storage()?
                .get_item(key)
                .map_err(|e| StorageError::Read(js_error(&e)))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Ok(None)
        }
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            storage()?
                .set_item(key, value)
                .map_err(|e| StorageError::Write(js_error(&e)))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Err(StorageError::Unavailable)
        }
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        #[cfg(feature = "hydrate")]
        {
            storage()?
                .remove_item(key)
                .map_err(|e| StorageError::Write(js_error(&e)))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            Err(StorageError::Unavailable)
        }
    }
}

#[cfg(test)]
#[path = "local_storage_test.rs"]
mod local_storage_test;
