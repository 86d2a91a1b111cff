//! Boundary to the assistant service.
//!
//! Grooming, feedback clustering and roadmap generation all happen remotely.
//! The core only sees them through [`AssistantService`], so views can be
//! driven by the HTTP client in production and by scripted stubs in tests.

#[cfg(not(target_arch = "wasm32"))]
pub mod http;

#[cfg(not(target_arch = "wasm32"))]
pub use http::HttpAssistant;

use crate::Result;
use crate::models::{BacklogItem, FeedbackCluster, FeedbackItem, RoadmapPlan};

/// Default API base URL for a locally running assistant.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Remote assistant operations consumed by the core.
///
/// Every call either returns the full result or fails as a whole; there are
/// no partial results and no retries at this layer.
pub trait AssistantService: Send + Sync {
    /// Score a backlog item and fill in its quality issues and, optionally,
    /// a refined description.
    fn groom(&self, item: &BacklogItem) -> Result<BacklogItem>;

    /// Group raw feedback into themes.
    fn cluster_feedback(&self, items: &[FeedbackItem]) -> Result<Vec<FeedbackCluster>>;

    /// Schedule backlog items into weeks.
    fn generate_roadmap(&self, items: &[BacklogItem]) -> Result<RoadmapPlan>;
}
