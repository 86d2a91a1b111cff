//! Smart PM - backlog synchronization and roadmap layout for an AI-assisted
//! project manager.
//!
//! The library keeps a single persisted backlog consistent across views that
//! never share memory, reconciles optimistic inserts with delayed grooming
//! results, promotes feedback clusters into backlog items, and lays out
//! generated roadmaps week by week. The `spm` binary is a thin host around it.

pub mod board;
#[cfg(not(target_arch = "wasm32"))]
pub mod cli;
pub mod client;
#[cfg(not(target_arch = "wasm32"))]
pub mod commands;
pub mod config;
pub mod feedback;
pub mod ids;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod models;
pub mod roadmap;
pub mod storage;
#[cfg(feature = "wasm")]
pub mod wasm;

/// Test utilities shared by the unit tests.
#[cfg(test)]
pub(crate) mod test_utils {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use crate::client::AssistantService;
    use crate::models::{BacklogItem, FeedbackCluster, FeedbackItem, RoadmapPlan};
    use crate::storage::{BacklogStore, MemoryBackend};
    use crate::{Error, Result};

    /// A store over a fresh in-memory backend.
    pub fn memory_store() -> Arc<BacklogStore> {
        Arc::new(BacklogStore::new(Box::new(MemoryBackend::new())))
    }

    /// Scripted assistant: each call pops the next queued response, and an
    /// empty queue fails the call like an unreachable service would.
    #[derive(Default)]
    pub struct StubAssistant {
        groom: Mutex<VecDeque<Result<BacklogItem>>>,
        clusters: Mutex<VecDeque<Result<Vec<FeedbackCluster>>>>,
        plans: Mutex<VecDeque<Result<RoadmapPlan>>>,
        /// Items received by `generate_roadmap`, in call order.
        pub roadmap_requests: Mutex<Vec<Vec<BacklogItem>>>,
        /// Feedback batches received by `cluster_feedback`.
        pub cluster_requests: Mutex<Vec<Vec<FeedbackItem>>>,
    }

    impl StubAssistant {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn push_groom(self, response: Result<BacklogItem>) -> Self {
            self.groom.lock().unwrap().push_back(response);
            self
        }

        pub fn push_clusters(self, response: Result<Vec<FeedbackCluster>>) -> Self {
            self.clusters.lock().unwrap().push_back(response);
            self
        }

        pub fn push_plan(self, response: Result<RoadmapPlan>) -> Self {
            self.plans.lock().unwrap().push_back(response);
            self
        }
    }

    fn unreachable_service() -> Error {
        Error::Remote("stub service has no queued response".to_string())
    }

    impl AssistantService for StubAssistant {
        fn groom(&self, _item: &BacklogItem) -> Result<BacklogItem> {
            self.groom
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(unreachable_service()))
        }

        fn cluster_feedback(&self, items: &[FeedbackItem]) -> Result<Vec<FeedbackCluster>> {
            self.cluster_requests.lock().unwrap().push(items.to_vec());
            self.clusters
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(unreachable_service()))
        }

        fn generate_roadmap(&self, items: &[BacklogItem]) -> Result<RoadmapPlan> {
            self.roadmap_requests.lock().unwrap().push(items.to_vec());
            self.plans
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(unreachable_service()))
        }
    }

    /// A groomed copy of `item` carrying the given score.
    pub fn groomed(item: &BacklogItem, score: u8) -> BacklogItem {
        let mut groomed = item.clone();
        groomed.quality_score = Some(score);
        groomed.quality_issues = vec![crate::models::QualityIssue {
            issue_type: "missing_criteria".to_string(),
            suggestion: "Add acceptance criteria".to_string(),
        }];
        groomed.refined_description = Some(format!("Refined: {}", item.title));
        groomed
    }
}

/// Library-level error type for Smart PM operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Assistant request failed: {0}")]
    Remote(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Theme already promoted this session: {0}")]
    AlreadyPromoted(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for Smart PM operations.
pub type Result<T> = std::result::Result<T, Error>;
