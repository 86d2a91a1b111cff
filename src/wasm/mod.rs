//! Browser host for the backlog engine.
//!
//! In the browser the backlog lives in `localStorage` and every request to
//! the assistant is made by JavaScript. The WASM side owns the backlog
//! state: JavaScript calls `beginCreate` to insert an item, sends that item
//! for grooming itself, and hands the response back through
//! `completeCreate` or `failCreate`.
//!
//! # Modules
//!
//! - `local_storage`: `StorageBackend` over `window.localStorage`
//! - `bindings`: wasm-bindgen exports for JavaScript interop
//!
//! # Usage
//!
//! Built with `wasm-pack build --target web -- --features wasm`:
//!
//! ```javascript
//! import init, { BoardHandle, layoutRoadmap } from './smart_pm.js';
//!
//! await init();
//! const board = new BoardHandle();
//! const item = JSON.parse(board.beginCreate('Login page'));
//! try {
//!     const groomed = await groom(item);
//!     board.completeCreate(item.id, JSON.stringify(groomed));
//! } catch (e) {
//!     board.failCreate(item.id, String(e));
//! }
//! ```

#[cfg(target_arch = "wasm32")]
mod bindings;
#[cfg(target_arch = "wasm32")]
mod local_storage;

#[cfg(target_arch = "wasm32")]
pub use bindings::*;
#[cfg(target_arch = "wasm32")]
pub use local_storage::LocalStorageBackend;

use crate::models::{BacklogItem, RoadmapPlan};
use crate::roadmap::RoadmapLayout;
use crate::{Error, Result};
use serde::Serialize;

/// Initialize WASM panic hook for better error messages in browser console
#[cfg(target_arch = "wasm32")]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

/// Version information for the WASM module
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Serialize)]
struct WeekJson<'a> {
    week: u32,
    open_capacity: bool,
    items: &'a [crate::roadmap::DisplayItem],
}

#[derive(Serialize)]
struct LayoutJson<'a> {
    horizon: u32,
    weeks: Vec<WeekJson<'a>>,
    warnings: &'a [String],
}

/// Lay out a plan given as JSON against a backlog given as JSON.
///
/// Compiled on every platform so the JSON contract is unit tested natively.
pub fn layout_json(plan_json: &str, backlog_json: &str) -> Result<String> {
    let plan: RoadmapPlan = serde_json::from_str(plan_json)
        .map_err(|e| Error::InvalidInput(format!("plan: {}", e)))?;
    let backlog: Vec<BacklogItem> = if backlog_json.trim().is_empty() {
        Vec::new()
    } else {
        serde_json::from_str(backlog_json)
            .map_err(|e| Error::InvalidInput(format!("backlog: {}", e)))?
    };

    let layout = RoadmapLayout::build(&plan, &backlog);
    let out = LayoutJson {
        horizon: layout.horizon(),
        weeks: layout
            .columns()
            .map(|c| WeekJson {
                week: c.week,
                open_capacity: c.is_open_capacity(),
                items: c.items,
            })
            .collect(),
        warnings: layout.warnings(),
    };
    Ok(serde_json::to_string(&out)?)
}
