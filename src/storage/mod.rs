//! Storage layer for the persisted backlog.
//!
//! The whole backlog lives in a single slot under [`BACKLOG_KEY`] and is
//! always read and written as one JSON array. Views never share memory: each
//! one loads its own snapshot when it mounts and writes its full snapshot back
//! after every local change, so the last writer wins.
//!
//! [`BacklogStore`] is the one object every view is handed. Besides
//! `load`/`save` it keeps a write revision and a list of subscribers, so a
//! view sharing the store hears about other views' writes instead of
//! waiting for its next mount.
//!
//! ## Storage Backends
//!
//! - **File backend** (default): `<data-dir>/smart-pm-backlog.json`
//! - **Memory backend**: process-local, used by tests
//! - **Local storage backend**: browser `localStorage` (wasm feature)

pub mod backend;
#[cfg(not(target_arch = "wasm32"))]
pub mod file;

pub use backend::{BackendType, MemoryBackend, StorageBackend};
#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;

use crate::models::BacklogItem;
use crate::{Error, Result};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

/// Well-known slot holding the backlog collection.
pub const BACKLOG_KEY: &str = "smart-pm-backlog";

/// Handle returned by [`BacklogStore::subscribe`].
pub type SubscriptionId = u64;

type Listener = Arc<dyn Fn(&[BacklogItem]) + Send + Sync>;

/// Whole-value persistence for the backlog collection.
pub struct BacklogStore {
    backend: Mutex<Box<dyn StorageBackend>>,
    key: String,
    revision: AtomicU64,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_subscription: AtomicU64,
}

impl BacklogStore {
    /// Create a store over `backend` using the default backlog key.
    pub fn new(backend: Box<dyn StorageBackend>) -> Self {
        Self::with_key(backend, BACKLOG_KEY)
    }

    /// Create a store over `backend` using a custom slot key.
    pub fn with_key(backend: Box<dyn StorageBackend>, key: impl Into<String>) -> Self {
        Self {
            backend: Mutex::new(backend),
            key: key.into(),
            revision: AtomicU64::new(0),
            listeners: Mutex::new(Vec::new()),
            next_subscription: AtomicU64::new(1),
        }
    }

    /// Open the configured backend.
    pub fn open(backend_type: BackendType, data_dir: &Path) -> Result<Self> {
        let backend: Box<dyn StorageBackend> = match backend_type {
            BackendType::Memory => Box::new(MemoryBackend::new()),
            #[cfg(not(target_arch = "wasm32"))]
            BackendType::File => Box::new(FileBackend::new(data_dir)),
            #[cfg(all(target_arch = "wasm32", feature = "wasm"))]
            BackendType::LocalStorage => Box::new(crate::wasm::LocalStorageBackend::new()),
            #[allow(unreachable_patterns)]
            other => {
                return Err(Error::Config(format!(
                    "backend '{}' is not available in this build (data dir {})",
                    other,
                    data_dir.display()
                )));
            }
        };
        Ok(Self::new(backend))
    }

    /// The slot key this store reads and writes.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Human-readable location of the underlying backend.
    pub fn location(&self) -> String {
        match self.backend() {
            Ok(backend) => backend.location(),
            Err(_) => "unavailable".to_string(),
        }
    }

    /// Name of the underlying backend type.
    pub fn backend_type(&self) -> &'static str {
        match self.backend() {
            Ok(backend) => backend.backend_type(),
            Err(_) => "unavailable",
        }
    }

    /// Number of successful writes through this store.
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    fn backend(&self) -> Result<MutexGuard<'_, Box<dyn StorageBackend>>> {
        self.backend
            .lock()
            .map_err(|_| Error::Storage("backend lock poisoned".to_string()))
    }

    /// Read the whole collection.
    ///
    /// An absent slot, a read failure, or an unparseable value all yield an
    /// empty collection; failures are logged and never surfaced.
    pub fn load(&self) -> Vec<BacklogItem> {
        match self.try_load() {
            Ok(items) => items,
            Err(e) => {
                warn!(key = %self.key, error = %e, "failed to load backlog, treating as empty");
                Vec::new()
            }
        }
    }

    /// Read the whole collection, surfacing read and parse failures.
    pub fn try_load(&self) -> Result<Vec<BacklogItem>> {
        let raw = self.backend()?.read(&self.key)?;
        match raw {
            Some(raw) if !raw.trim().is_empty() => Ok(serde_json::from_str(&raw)?),
            _ => Ok(Vec::new()),
        }
    }

    /// Overwrite the persisted collection with `items`.
    ///
    /// An empty `items` is a no-op: the previously persisted collection stays
    /// in place, so deleting the last item does not clear the slot.
    pub fn save(&self, items: &[BacklogItem]) -> Result<()> {
        if items.is_empty() {
            debug!(key = %self.key, "empty backlog not written; persisted record left untouched");
            return Ok(());
        }

        let json = serde_json::to_string(items)?;
        self.backend()?.write(&self.key, &json)?;
        let revision = self.revision.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(key = %self.key, items = items.len(), revision, "backlog saved");

        self.notify(items);
        Ok(())
    }

    /// Read the persisted collection, append `item`, and write it back.
    ///
    /// Reads strictly: a corrupt slot fails the append instead of being
    /// replaced by a one-item collection.
    pub fn append(&self, item: BacklogItem) -> Result<Vec<BacklogItem>> {
        let mut items = self.try_load()?;
        items.push(item);
        self.save(&items)?;
        Ok(items)
    }

    /// Register a listener called with the written snapshot after every save.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: Fn(&[BacklogItem]) + Send + Sync + 'static,
    {
        let id = self.next_subscription.fetch_add(1, Ordering::SeqCst);
        match self.listeners.lock() {
            Ok(mut listeners) => listeners.push((id, Arc::new(listener))),
            Err(_) => warn!("listener list poisoned, subscription dropped"),
        }
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let Ok(mut listeners) = self.listeners.lock() else {
            return false;
        };
        let before = listeners.len();
        listeners.retain(|(sid, _)| *sid != id);
        listeners.len() != before
    }

    fn notify(&self, items: &[BacklogItem]) {
        // Snapshot the list so listeners may (un)subscribe while being called.
        let listeners: Vec<Listener> = match self.listeners.lock() {
            Ok(listeners) => listeners.iter().map(|(_, l)| Arc::clone(l)).collect(),
            Err(_) => return,
        };
        for listener in listeners {
            listener(items);
        }
    }
}

impl std::fmt::Debug for BacklogStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BacklogStore")
            .field("key", &self.key)
            .field("backend", &self.backend_type())
            .field("revision", &self.revision())
            .finish()
    }
}
