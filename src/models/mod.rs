//! Data models for Smart PM entities.
//!
//! This module defines the core data structures:
//! - `BacklogItem` - A unit of work, the only persisted entity
//! - `FeedbackItem` / `FeedbackCluster` - Raw feedback and its clustered themes
//! - `RoadmapPlan` / `RoadmapEntry` - A generated week-by-week schedule
//!
//! Field names serialize exactly as the assistant service and the persisted
//! backlog slot expect them, so these types are also the wire format.

pub mod feedback;
pub mod plan;

pub use feedback::{FeedbackCluster, FeedbackItem, Sentiment, SentimentBreakdown};
pub use plan::{RiskLevel, RoadmapEntry, RoadmapPlan};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of work a backlog item represents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    #[default]
    Feature,
    Bug,
    Chore,
    Improvement,
}

impl ItemType {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Feature => "feature",
            Self::Bug => "bug",
            Self::Chore => "chore",
            Self::Improvement => "improvement",
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Workflow status of a backlog item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Backlog,
    Todo,
    InProgress,
    Done,
}

impl ItemStatus {
    /// Get the string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Backlog => "backlog",
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A problem found by grooming, with a suggested fix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityIssue {
    /// Kind of issue, e.g. "clarity", "missing_criteria", "vague"
    pub issue_type: String,

    /// How to fix it
    pub suggestion: String,
}

/// Coarse priority derived from the quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityBand {
    Low,
    Medium,
    High,
}

impl PriorityBand {
    /// Band for a quality score: above 80 is high, above 50 is medium.
    pub fn from_score(score: u8) -> Self {
        if score > 80 {
            Self::High
        } else if score > 50 {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Get the display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

/// A unit of work in the backlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacklogItem {
    /// Opaque unique identifier, assigned once by the creator
    pub id: String,

    /// Short display text
    pub title: String,

    /// Free text, may be empty
    #[serde(default)]
    pub description: String,

    /// Kind of work
    #[serde(rename = "type", default)]
    pub item_type: ItemType,

    /// Workflow status
    #[serde(default)]
    pub status: ItemStatus,

    /// Grooming score (0-100), absent until enrichment or promotion
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality_score: Option<u8>,

    /// Issues found by grooming, in the order reported
    #[serde(default)]
    pub quality_issues: Vec<QualityIssue>,

    /// Grooming-provided rewrite of the description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_description: Option<String>,
}

impl BacklogItem {
    /// Create a new ungroomed feature in the backlog column.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            item_type: ItemType::Feature,
            status: ItemStatus::Backlog,
            quality_score: None,
            quality_issues: Vec::new(),
            refined_description: None,
        }
    }

    /// Set the item type.
    pub fn with_type(mut self, item_type: ItemType) -> Self {
        self.item_type = item_type;
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Text to show under the title: the refined description wins over the
    /// original, and empty strings count as absent.
    pub fn display_description(&self) -> Option<&str> {
        self.refined_description
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| Some(self.description.as_str()).filter(|s| !s.is_empty()))
    }

    /// Priority band, if the item has been scored.
    pub fn priority_band(&self) -> Option<PriorityBand> {
        self.quality_score.map(PriorityBand::from_score)
    }
}
