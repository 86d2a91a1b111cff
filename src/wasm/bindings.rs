//! JavaScript bindings for the backlog board and roadmap layout.
//!
//! All structured values cross the boundary as JSON strings. Errors are
//! thrown as JavaScript strings.

use super::{LocalStorageBackend, layout_json};
use crate::board::BacklogBoard;
use crate::models::BacklogItem;
use crate::storage::BacklogStore;
use crate::{Error, Result};
use std::sync::Arc;
use wasm_bindgen::prelude::*;

fn to_js(e: Error) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

/// A backlog board persisted in `localStorage`.
#[wasm_bindgen]
pub struct BoardHandle {
    board: BacklogBoard,
}

#[wasm_bindgen]
impl BoardHandle {
    /// Mount a board over the persisted backlog.
    #[wasm_bindgen(constructor)]
    pub fn new() -> BoardHandle {
        super::init_panic_hook();
        let store = Arc::new(BacklogStore::new(Box::new(LocalStorageBackend::new())));
        BoardHandle {
            board: BacklogBoard::mount(store),
        }
    }

    /// Insert an ungroomed item. Returns the item as JSON; send it for
    /// grooming and report back with `completeCreate` or `failCreate`.
    #[wasm_bindgen(js_name = beginCreate)]
    pub fn begin_create(&mut self, title: &str) -> std::result::Result<String, JsValue> {
        let pending = self.board.begin_create(title).map_err(to_js)?;
        to_json(&pending.item).map_err(to_js)
    }

    /// Apply a grooming response. Returns the patched item as JSON, or
    /// `undefined` if the item was deleted in the meantime.
    #[wasm_bindgen(js_name = completeCreate)]
    pub fn complete_create(
        &mut self,
        id: &str,
        groomed_json: &str,
    ) -> std::result::Result<Option<String>, JsValue> {
        let groomed: Result<BacklogItem> = serde_json::from_str(groomed_json)
            .map_err(|e| Error::Remote(format!("invalid grooming response: {}", e)));
        self.board
            .complete_create(id, groomed)
            .map(|item| to_json(item))
            .transpose()
            .map_err(to_js)
    }

    /// Record that grooming failed; the item stays as inserted.
    #[wasm_bindgen(js_name = failCreate)]
    pub fn fail_create(&mut self, id: &str, message: &str) {
        self.board
            .complete_create(id, Err(Error::Remote(message.to_string())));
    }

    /// Delete an item. Returns whether it existed.
    pub fn remove(&mut self, id: &str) -> bool {
        self.board.delete(id).is_some()
    }

    /// Current items as a JSON array.
    pub fn items(&self) -> std::result::Result<String, JsValue> {
        to_json(self.board.items()).map_err(to_js)
    }

    /// Grooming state of an item created in this session.
    #[wasm_bindgen(js_name = enrichmentState)]
    pub fn enrichment_state(&self, id: &str) -> Option<String> {
        self.board
            .enrichment_state(id)
            .map(|s| s.as_str().to_string())
    }

    /// Re-read the persisted backlog.
    pub fn reload(&mut self) {
        self.board.reload();
    }

    /// Whether the stored backlog changed since this board last synced,
    /// including writes from other handles and tabs.
    #[wasm_bindgen(js_name = isStale)]
    pub fn is_stale(&self) -> bool {
        self.board.is_stale()
    }
}

impl Default for BoardHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Lay out a roadmap plan (JSON) against a backlog snapshot (JSON array).
#[wasm_bindgen(js_name = layoutRoadmap)]
pub fn layout_roadmap(plan_json: &str, backlog_json: &str) -> std::result::Result<String, JsValue> {
    layout_json(plan_json, backlog_json).map_err(to_js)
}

/// Version of the WASM module.
#[wasm_bindgen]
pub fn version() -> String {
    super::VERSION.to_string()
}
