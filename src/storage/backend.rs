//! Storage backend trait and implementations.
//!
//! A backend is a flat key-value slot store. Each slot holds one whole
//! serialized value and is always read and written in full:
//! - `MemoryBackend` - In-process map (tests, throwaway sessions)
//! - `FileBackend` - One JSON file per slot under a data directory (native default)
//! - `LocalStorageBackend` - Browser `localStorage` (wasm feature)

use crate::Result;
use std::collections::HashMap;

/// Trait for storage backends that handle raw slot persistence.
pub trait StorageBackend: Send + Sync {
    /// Read the full value stored under `key`, or `None` if the slot is empty.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Get the storage location description (for display purposes).
    fn location(&self) -> String;

    /// Get the backend type name.
    fn backend_type(&self) -> &'static str;
}

/// Available storage backend types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendType {
    /// In-process map, lost when the process exits
    Memory,
    /// JSON files under the data directory (default)
    File,
    /// Browser localStorage (wasm builds only)
    LocalStorage,
}

impl BackendType {
    /// Parse a backend type from a string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" | "ephemeral" => Some(Self::Memory),
            "file" | "files" | "default" => Some(Self::File),
            "local-storage" | "localstorage" | "browser" => Some(Self::LocalStorage),
            _ => None,
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::File => "file",
            Self::LocalStorage => "local-storage",
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Slot store held entirely in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryBackend {
    slots: HashMap<String, String>,
}

impl MemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend with one slot already filled.
    pub fn with_slot(key: &str, value: &str) -> Self {
        let mut backend = Self::new();
        backend.slots.insert(key.to_string(), value.to_string());
        backend
    }
}

impl StorageBackend for MemoryBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn location(&self) -> String {
        "memory".to_string()
    }

    fn backend_type(&self) -> &'static str {
        BackendType::Memory.as_str()
    }
}
