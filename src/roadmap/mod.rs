//! Roadmap view: plan generation and layout.
//!
//! The view reads the persisted backlog once when mounted and sends that
//! snapshot for planning. An empty backlog is replaced by a small built-in
//! sample so a plan can still be shown.

pub mod layout;

pub use layout::{
    DisplayItem, MIN_HORIZON, OPEN_CAPACITY_LABEL, RoadmapLayout, WeekColumn, fallback_title,
    layout,
};

use crate::client::AssistantService;
use crate::models::{BacklogItem, ItemType, RoadmapPlan};
use crate::storage::BacklogStore;
use std::sync::Arc;
use tracing::{debug, warn};

/// Items planned when the backlog is empty.
pub fn sample_backlog() -> Vec<BacklogItem> {
    vec![
        BacklogItem::new("1", "User Profile"),
        BacklogItem::new("2", "Auth System").with_type(ItemType::Chore),
        BacklogItem::new("3", "Payment Gateway"),
    ]
}

/// The roadmap view: a backlog snapshot and the last generated plan.
#[derive(Debug)]
pub struct RoadmapView {
    store: Arc<BacklogStore>,
    backlog: Vec<BacklogItem>,
    plan: Option<RoadmapPlan>,
}

impl RoadmapView {
    /// Mount the view, reading the persisted backlog once.
    pub fn mount(store: Arc<BacklogStore>) -> Self {
        let backlog = store.load();
        Self {
            store,
            backlog,
            plan: None,
        }
    }

    /// The backlog snapshot read at mount.
    pub fn backlog(&self) -> &[BacklogItem] {
        &self.backlog
    }

    /// Whether planning will fall back to the sample items.
    pub fn uses_sample_data(&self) -> bool {
        self.backlog.is_empty()
    }

    /// The last successfully generated plan.
    pub fn plan(&self) -> Option<&RoadmapPlan> {
        self.plan.as_ref()
    }

    /// Read the persisted backlog again. The current plan is kept.
    pub fn reload(&mut self) {
        self.backlog = self.store.load();
    }

    /// Request a new plan.
    ///
    /// The previous plan is discarded first, so a failed request leaves the
    /// view without a plan. Failures are logged.
    pub fn generate(&mut self, service: &dyn AssistantService) -> Option<RoadmapLayout> {
        self.plan = None;

        let sample;
        let items: &[BacklogItem] = if self.backlog.is_empty() {
            sample = sample_backlog();
            &sample
        } else {
            &self.backlog
        };
        debug!(items = items.len(), sample = self.backlog.is_empty(), "requesting roadmap");

        match service.generate_roadmap(items) {
            Ok(plan) => {
                self.plan = Some(plan);
                self.layout()
            }
            Err(e) => {
                warn!(error = %e, "roadmap generation failed");
                None
            }
        }
    }

    /// Lay out the current plan against the mounted backlog snapshot.
    pub fn layout(&self) -> Option<RoadmapLayout> {
        self.plan
            .as_ref()
            .map(|plan| RoadmapLayout::build(plan, &self.backlog))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::models::RoadmapEntry;
    use crate::test_utils::{StubAssistant, memory_store};

    fn two_week_plan() -> RoadmapPlan {
        RoadmapPlan {
            items: vec![RoadmapEntry::new("2", 1), RoadmapEntry::new("1", 2)],
            warnings: vec!["Payment Gateway is unscheduled".to_string()],
        }
    }

    #[test]
    fn test_empty_backlog_sends_sample_items() {
        let mut view = RoadmapView::mount(memory_store());
        let service = StubAssistant::new().push_plan(Ok(two_week_plan()));

        assert!(view.uses_sample_data());
        let layout = view.generate(&service).unwrap();

        let requests = service.roadmap_requests.lock().unwrap();
        assert_eq!(requests[0], sample_backlog());
        // Sample titles are not part of the backlog snapshot.
        assert_eq!(layout.week(1)[0].title, "Item #2");
    }

    #[test]
    fn test_generate_uses_persisted_backlog() {
        let store = memory_store();
        store
            .save(&[
                BacklogItem::new("1", "User Profile"),
                BacklogItem::new("2", "Auth System"),
            ])
            .unwrap();
        let mut view = RoadmapView::mount(store);
        let service = StubAssistant::new().push_plan(Ok(two_week_plan()));

        let layout = view.generate(&service).unwrap();

        assert_eq!(service.roadmap_requests.lock().unwrap()[0].len(), 2);
        assert_eq!(layout.week(1)[0].title, "Auth System");
        assert_eq!(layout.week(2)[0].title, "User Profile");
        assert_eq!(layout.horizon(), 4);
        assert_eq!(layout.warnings().len(), 1);
    }

    #[test]
    fn test_failed_generation_clears_previous_plan() {
        let mut view = RoadmapView::mount(memory_store());
        let service = StubAssistant::new()
            .push_plan(Ok(two_week_plan()))
            .push_plan(Err(Error::Remote("HTTP 500".to_string())));

        assert!(view.generate(&service).is_some());
        assert!(view.plan().is_some());

        assert!(view.generate(&service).is_none());
        assert!(view.plan().is_none());
        assert!(view.layout().is_none());
    }

    #[test]
    fn test_snapshot_is_read_once_until_reload() {
        let store = memory_store();
        let mut view = RoadmapView::mount(Arc::clone(&store));
        store.save(&[BacklogItem::new("9", "Late arrival")]).unwrap();

        assert!(view.backlog().is_empty());
        view.reload();
        assert_eq!(view.backlog()[0].title, "Late arrival");
    }
}
