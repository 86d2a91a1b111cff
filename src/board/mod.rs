//! Backlog board: optimistic creation with deferred grooming.
//!
//! Creating an item is a two-phase operation:
//!
//! 1. [`BacklogBoard::begin_create`] inserts an ungroomed item into the
//!    board's local state right away and persists the snapshot. The item is
//!    visible before any network round trip.
//! 2. [`BacklogBoard::complete_create`] receives the grooming outcome. A
//!    success replaces only the item with the same id; a failure leaves the
//!    item as it is and marks it [`EnrichmentState::Failed`].
//!
//! The grooming request itself can run inline ([`BacklogBoard::create`]) or
//! on a worker thread ([`spawn_enrichment`] + [`BacklogBoard::apply`]).
//! Patches match by id, so any number of creations may be in flight at once.
//!
//! The board owns a private snapshot of the backlog loaded at mount. Writes
//! made by other views since then are not merged; the board's next write
//! replaces them. [`BacklogBoard::is_stale`] reports when that would happen.

use crate::client::AssistantService;
use crate::ids::IdClock;
use crate::models::BacklogItem;
use crate::storage::{BacklogStore, SubscriptionId};
use crate::{Error, Result};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, warn};

/// Grooming progress of an item created during this session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentState {
    /// Inserted locally, grooming not yet resolved
    Pending,
    /// Patched with the groomed version
    Enriched,
    /// Grooming failed; the item stays ungroomed for good
    Failed,
}

impl EnrichmentState {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Enriched => "enriched",
            Self::Failed => "failed",
        }
    }
}

/// An optimistically inserted item awaiting its grooming result.
#[derive(Debug, Clone)]
pub struct PendingEnrichment {
    /// The item as inserted; this is what gets sent for grooming
    pub item: BacklogItem,
}

impl PendingEnrichment {
    /// ID the grooming result will be matched against.
    pub fn id(&self) -> &str {
        &self.item.id
    }
}

/// Result of a grooming request, ready to be applied to a board.
#[derive(Debug)]
pub struct EnrichmentOutcome {
    pub id: String,
    pub result: Result<BacklogItem>,
}

/// Run the grooming request for `pending` on a worker thread.
pub fn spawn_enrichment(
    pending: PendingEnrichment,
    service: Arc<dyn AssistantService>,
) -> JoinHandle<EnrichmentOutcome> {
    thread::spawn(move || {
        let result = service.groom(&pending.item);
        EnrichmentOutcome {
            id: pending.item.id,
            result,
        }
    })
}

/// The backlog view: a local snapshot plus the optimistic create pipeline.
#[derive(Debug)]
pub struct BacklogBoard {
    store: Arc<BacklogStore>,
    items: Vec<BacklogItem>,
    enrichment: HashMap<String, EnrichmentState>,
    ids: IdClock,
    // Set by the store subscription on every write through the shared store.
    written: Arc<AtomicBool>,
    subscription: SubscriptionId,
    // What the store held when this board last loaded or saved.
    synced: Vec<BacklogItem>,
}

impl BacklogBoard {
    /// Mount a board, reading the persisted backlog once.
    pub fn mount(store: Arc<BacklogStore>) -> Self {
        let written = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&written);
        let subscription = store.subscribe(move |_| flag.store(true, Ordering::SeqCst));
        let items = store.load();
        debug!(items = items.len(), "backlog board mounted");
        Self {
            store,
            synced: items.clone(),
            items,
            enrichment: HashMap::new(),
            ids: IdClock::new(),
            written,
            subscription,
        }
    }

    /// Current local snapshot, in insertion order.
    pub fn items(&self) -> &[BacklogItem] {
        &self.items
    }

    /// Number of items on the board.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the board has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up an item by id.
    pub fn get(&self, id: &str) -> Option<&BacklogItem> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Grooming state of an item created in this session. Items that were
    /// already persisted when the board mounted have no state.
    pub fn enrichment_state(&self, id: &str) -> Option<EnrichmentState> {
        self.enrichment.get(id).copied()
    }

    /// Whether the persisted backlog changed since this board last loaded
    /// or saved.
    ///
    /// Writes through the same store are heard through its subscription.
    /// Writes from other stores over the same slot, such as another tab or
    /// process, are caught by comparing the stored backlog with the last
    /// synced one. An unreadable slot counts as empty.
    pub fn is_stale(&self) -> bool {
        if self.written.load(Ordering::SeqCst) {
            return true;
        }
        self.store.try_load().unwrap_or_default() != self.synced
    }

    /// Discard the local snapshot and read the persisted backlog again.
    ///
    /// Enrichment state is kept for ids that survive the reload, so a
    /// grooming response still patches an item that reappears.
    pub fn reload(&mut self) {
        self.written.store(false, Ordering::SeqCst);
        self.items = self.store.load();
        self.synced = self.items.clone();
        let items = &self.items;
        self.enrichment
            .retain(|id, _| items.iter().any(|i| &i.id == id));
    }

    /// Phase one: insert a new ungroomed item and persist the snapshot.
    ///
    /// The title is trimmed and must not be empty.
    pub fn begin_create(&mut self, title: &str) -> Result<PendingEnrichment> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::InvalidInput("title must not be empty".to_string()));
        }

        let id = self.next_id();
        let item = BacklogItem::new(id, title);
        self.items.push(item.clone());
        self.enrichment
            .insert(item.id.clone(), EnrichmentState::Pending);
        debug!(id = %item.id, "optimistic insert");
        self.persist();

        Ok(PendingEnrichment { item })
    }

    /// Phase two: apply the grooming outcome for `id`.
    ///
    /// On success the item is replaced by the groomed version, keeping its
    /// original id. On failure it is left untouched and marked failed. A
    /// response for an id that is no longer on the board is dropped. Returns
    /// the item as it now stands.
    pub fn complete_create(
        &mut self,
        id: &str,
        outcome: Result<BacklogItem>,
    ) -> Option<&BacklogItem> {
        let Some(pos) = self.items.iter().position(|i| i.id == id) else {
            debug!(id, "grooming result for item no longer on the board, dropped");
            return None;
        };

        match outcome {
            Ok(mut groomed) => {
                groomed.id = id.to_string();
                self.items[pos] = groomed;
                self.enrichment
                    .insert(id.to_string(), EnrichmentState::Enriched);
                self.persist();
            }
            Err(e) => {
                warn!(id, error = %e, "grooming failed, item stays ungroomed");
                self.enrichment
                    .insert(id.to_string(), EnrichmentState::Failed);
            }
        }

        self.items.get(pos)
    }

    /// Apply an outcome produced by [`spawn_enrichment`].
    pub fn apply(&mut self, outcome: EnrichmentOutcome) -> Option<&BacklogItem> {
        let EnrichmentOutcome { id, result } = outcome;
        self.complete_create(&id, result)
    }

    /// Create an item and groom it inline.
    ///
    /// Fails only when the title is empty. A grooming failure is logged and
    /// the ungroomed item is returned.
    pub fn create(&mut self, title: &str, service: &dyn AssistantService) -> Result<BacklogItem> {
        let pending = self.begin_create(title)?;
        let outcome = service.groom(&pending.item);
        let item = self
            .complete_create(pending.id(), outcome)
            .cloned()
            .unwrap_or(pending.item);
        Ok(item)
    }

    /// Remove an item and persist the remaining snapshot.
    ///
    /// Removing the last item leaves the persisted record as it was, because
    /// the store never writes an empty collection.
    pub fn delete(&mut self, id: &str) -> Option<BacklogItem> {
        let pos = self.items.iter().position(|i| i.id == id)?;
        let removed = self.items.remove(pos);
        self.enrichment.remove(id);
        self.persist();
        Some(removed)
    }

    fn next_id(&mut self) -> String {
        loop {
            let id = self.ids.next_millis().to_string();
            if self.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Write the full snapshot. Failures are logged; local state stays
    /// authoritative for this board either way.
    fn persist(&mut self) {
        match self.store.save(&self.items) {
            Ok(()) => {
                // Our own write notified us too.
                self.written.store(false, Ordering::SeqCst);
                // Empty saves leave the slot untouched, so read back what is there.
                self.synced = self.store.load();
            }
            Err(e) => warn!(error = %e, "failed to persist backlog"),
        }
    }
}

impl Drop for BacklogBoard {
    fn drop(&mut self) {
        self.store.unsubscribe(self.subscription);
    }
}
