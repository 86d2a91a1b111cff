//! `StorageBackend` over the browser's `window.localStorage`.

use crate::storage::{BackendType, StorageBackend};
use crate::{Error, Result};

/// Slot store backed by `localStorage`.
///
/// Holds no handle to the storage object; it is looked up on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorageBackend;

impl LocalStorageBackend {
    /// Create a backend for the current window.
    pub fn new() -> Self {
        Self
    }

    fn storage() -> Result<web_sys::Storage> {
        let window = web_sys::window()
            .ok_or_else(|| Error::Storage("no window object".to_string()))?;
        window
            .local_storage()
            .map_err(|e| Error::Storage(format!("localStorage unavailable: {:?}", e)))?
            .ok_or_else(|| Error::Storage("localStorage is disabled".to_string()))
    }
}

impl StorageBackend for LocalStorageBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Self::storage()?
            .get_item(key)
            .map_err(|e| Error::Storage(format!("failed to read '{}': {:?}", key, e)))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        Self::storage()?
            .set_item(key, value)
            .map_err(|e| Error::Storage(format!("failed to write '{}': {:?}", key, e)))
    }

    fn location(&self) -> String {
        "window.localStorage".to_string()
    }

    fn backend_type(&self) -> &'static str {
        BackendType::LocalStorage.as_str()
    }
}
