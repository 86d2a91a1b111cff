//! Feedback hub: clustering pasted feedback and promoting themes to the
//! backlog.
//!
//! Promotion writes straight to the persisted backlog (read, append,
//! rewrite). A board mounted elsewhere does not see the new item until it
//! reloads. Which themes were promoted is remembered for this hub's lifetime
//! only, keyed by theme text.

use crate::client::AssistantService;
use crate::ids::{self, IdClock};
use crate::models::{BacklogItem, FeedbackCluster, FeedbackItem, ItemStatus, ItemType};
use crate::storage::BacklogStore;
use crate::{Error, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Source tag for feedback entered by pasting text.
pub const PASTE_SOURCE: &str = "User Paste";

/// Quality score given to promoted items: the theme is already backed by
/// real user feedback.
pub const PROMOTED_QUALITY_SCORE: u8 = 80;

/// Split pasted text into feedback items, one per non-blank line.
pub fn parse_feedback(input: &str, batch: i64) -> Vec<FeedbackItem> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .enumerate()
        .map(|(idx, content)| FeedbackItem {
            id: ids::feedback_id(batch, idx),
            source: PASTE_SOURCE.to_string(),
            content: content.to_string(),
            sentiment: None,
        })
        .collect()
}

/// Description given to an item promoted from `cluster`.
pub fn promotion_description(cluster: &FeedbackCluster) -> String {
    format!(
        "Derived from {} user feedback items.\n\nSummary: {}",
        cluster.item_count(),
        cluster.description
    )
}

/// Build the backlog item a cluster promotes to.
pub fn promoted_item(cluster: &FeedbackCluster, id: String) -> BacklogItem {
    BacklogItem {
        id,
        title: cluster.theme.clone(),
        description: promotion_description(cluster),
        item_type: ItemType::Feature,
        status: ItemStatus::Backlog,
        quality_score: Some(PROMOTED_QUALITY_SCORE),
        quality_issues: Vec::new(),
        refined_description: None,
    }
}

/// The feedback view: current clusters and this session's promotions.
#[derive(Debug)]
pub struct FeedbackHub {
    store: Arc<BacklogStore>,
    clusters: Vec<FeedbackCluster>,
    promoted: HashSet<String>,
    ids: IdClock,
}

impl FeedbackHub {
    /// Create a hub writing promotions to `store`.
    pub fn new(store: Arc<BacklogStore>) -> Self {
        Self {
            store,
            clusters: Vec::new(),
            promoted: HashSet::new(),
            ids: IdClock::new(),
        }
    }

    /// Clusters from the last successful analysis.
    pub fn clusters(&self) -> &[FeedbackCluster] {
        &self.clusters
    }

    /// Whether a theme was promoted during this session.
    pub fn is_promoted(&self, theme: &str) -> bool {
        self.promoted.contains(theme)
    }

    /// Themes promoted during this session.
    pub fn promoted_themes(&self) -> impl Iterator<Item = &str> {
        self.promoted.iter().map(String::as_str)
    }

    /// Cluster pasted feedback.
    ///
    /// Blank input is ignored. On success the clusters are replaced; on
    /// failure the error is logged and the previous clusters remain.
    pub fn analyze(&mut self, input: &str, service: &dyn AssistantService) -> &[FeedbackCluster] {
        if input.trim().is_empty() {
            return &self.clusters;
        }

        let items = parse_feedback(input, self.ids.next_millis());
        debug!(items = items.len(), "clustering feedback");
        match service.cluster_feedback(&items) {
            Ok(clusters) => self.clusters = clusters,
            Err(e) => warn!(error = %e, "feedback clustering failed"),
        }
        &self.clusters
    }

    /// Promote `cluster` (shown at position `index`) to a backlog item.
    ///
    /// Fails if the theme was already promoted this session, or if the
    /// persisted backlog cannot be read or written. The promoted set only
    /// changes on success.
    pub fn try_promote(&mut self, cluster: &FeedbackCluster, index: usize) -> Result<BacklogItem> {
        if self.is_promoted(&cluster.theme) {
            return Err(Error::AlreadyPromoted(cluster.theme.clone()));
        }

        let item = promoted_item(cluster, ids::promoted_id(self.ids.next_millis(), index));
        self.store.append(item.clone())?;
        self.promoted.insert(cluster.theme.clone());
        info!(id = %item.id, theme = %cluster.theme, "promoted feedback theme to backlog");
        Ok(item)
    }

    /// Promote `cluster`, logging instead of returning failures.
    pub fn promote(&mut self, cluster: &FeedbackCluster, index: usize) -> Option<BacklogItem> {
        match self.try_promote(cluster, index) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(theme = %cluster.theme, error = %e, "failed to promote");
                None
            }
        }
    }

    /// Promote the current cluster at `index`.
    pub fn promote_at(&mut self, index: usize) -> Result<BacklogItem> {
        let cluster = self
            .clusters
            .get(index)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("cluster #{}", index)))?;
        self.try_promote(&cluster, index)
    }
}
