// window.localStorage backed store (wasm32 only).

use wasm_bindgen::JsValue;
use web_sys::{Storage, window};

use super::{KeyValueStore, StoreError};

pub struct BrowserStore {
    storage: Option<Storage>,
}

impl BrowserStore {
    /// Grabs `localStorage`; private browsing or disabled storage leaves the
    /// store unavailable and every call fails softly.
    pub fn new() -> Self {
        let storage = window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable, progress will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&Storage, StoreError> {
        self.storage.as_ref().ok_or(StoreError::Unavailable)
    }
}

impl Default for BrowserStore {
    fn default() -> Self {
        Self::new()
    }
}

fn rejected(key: &str, err: JsValue) -> StoreError {
    StoreError::Rejected {
        key: key.to_string(),
        reason: err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.storage()?.get_item(key).map_err(|e| rejected(key, e))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| rejected(key, e))
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.storage()?.remove_item(key).map_err(|e| rejected(key, e))
    }
}
