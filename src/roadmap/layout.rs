//! Week-bucketed layout for roadmap plans.
//!
//! Turns a flat plan into columns, one per week:
//! - Entries are grouped by week, keeping plan order within each week
//! - The horizon is the last planned week, but never less than
//!   [`MIN_HORIZON`]; weeks without entries show as open capacity
//! - Titles come from the backlog snapshot, falling back to a label built
//!   from the raw id when the item is unknown
//! - Dependencies stay raw ids, since they may point outside the snapshot

use crate::models::{BacklogItem, RiskLevel, RoadmapPlan};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Fewest week columns a layout shows.
pub const MIN_HORIZON: u32 = 4;

/// Placeholder text for a week with nothing scheduled.
pub const OPEN_CAPACITY_LABEL: &str = "Open Capacity";

/// Title shown for an item id missing from the backlog snapshot.
pub fn fallback_title(item_id: &str) -> String {
    format!("Item #{}", item_id)
}

/// A plan entry ready for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayItem {
    pub item_id: String,

    /// Backlog title, or [`fallback_title`] when unresolved
    pub title: String,

    /// Whether `title` came from the backlog
    pub title_resolved: bool,

    pub risk_level: RiskLevel,

    /// Raw dependency ids, in plan order
    pub dependencies: Vec<String>,
}

/// One week column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekColumn<'a> {
    pub week: u32,
    pub items: &'a [DisplayItem],
}

impl WeekColumn<'_> {
    /// Whether nothing is scheduled this week.
    pub fn is_open_capacity(&self) -> bool {
        self.items.is_empty()
    }
}

/// A plan laid out by week.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoadmapLayout {
    buckets: BTreeMap<u32, Vec<DisplayItem>>,
    horizon: u32,
    warnings: Vec<String>,
}

/// Lay out `plan` against a backlog snapshot.
pub fn layout(plan: &RoadmapPlan, backlog: &[BacklogItem]) -> RoadmapLayout {
    RoadmapLayout::build(plan, backlog)
}

impl RoadmapLayout {
    /// Lay out `plan` against a backlog snapshot.
    pub fn build(plan: &RoadmapPlan, backlog: &[BacklogItem]) -> Self {
        // First occurrence wins, matching a front-to-back search.
        let mut titles: HashMap<&str, &str> = HashMap::new();
        for item in backlog {
            titles.entry(item.id.as_str()).or_insert(item.title.as_str());
        }

        let mut buckets: BTreeMap<u32, Vec<DisplayItem>> = BTreeMap::new();
        for entry in &plan.items {
            let resolved = titles
                .get(entry.item_id.as_str())
                .copied()
                .filter(|t| !t.is_empty());
            buckets.entry(entry.week).or_default().push(DisplayItem {
                item_id: entry.item_id.clone(),
                title: resolved
                    .map(str::to_string)
                    .unwrap_or_else(|| fallback_title(&entry.item_id)),
                title_resolved: resolved.is_some(),
                risk_level: entry.risk_level.clone(),
                dependencies: entry.dependencies.clone(),
            });
        }

        let last_week = buckets.keys().next_back().copied().unwrap_or(0);
        Self {
            buckets,
            horizon: last_week.max(MIN_HORIZON),
            warnings: plan.warnings.clone(),
        }
    }

    /// Number of week columns to show.
    pub fn horizon(&self) -> u32 {
        self.horizon
    }

    /// Entries scheduled in `week`, in plan order.
    pub fn week(&self, week: u32) -> &[DisplayItem] {
        self.buckets.get(&week).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Columns for weeks `1..=horizon`.
    ///
    /// Entries planned for week 0 are kept in [`RoadmapLayout::week`] but
    /// have no column.
    pub fn columns(&self) -> impl Iterator<Item = WeekColumn<'_>> {
        (1..=self.horizon).map(move |week| WeekColumn {
            week,
            items: self.week(week),
        })
    }

    /// Global planning warnings, verbatim.
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// Total number of laid-out entries.
    pub fn item_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}
