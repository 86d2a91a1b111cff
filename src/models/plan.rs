//! Roadmap plans returned by the planning assistant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delivery risk of a scheduled item.
///
/// Known labels match case-insensitively and are written back in lowercase,
/// so `"HIGH"` reads as [`RiskLevel::High`] and serializes as `"high"`.
/// Unknown labels are preserved verbatim in `Unrecognized` rather than
/// silently styled as low risk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
    Unrecognized(String),
}

impl RiskLevel {
    /// Parse a label, case-insensitive. Never fails.
    ///
    /// Known labels lose their original casing; see [`RiskLevel::as_str`].
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "low" => Self::Low,
            "medium" => Self::Medium,
            "high" => Self::High,
            _ => Self::Unrecognized(s.to_string()),
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unrecognized(s) => s,
        }
    }

    /// Whether the item should carry the high-risk accent.
    pub fn is_high(&self) -> bool {
        matches!(self, Self::High)
    }
}

impl From<String> for RiskLevel {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<RiskLevel> for String {
    fn from(r: RiskLevel) -> Self {
        r.as_str().to_string()
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One scheduled backlog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapEntry {
    /// ID of the backlog item, not guaranteed to exist in any snapshot
    pub item_id: String,

    /// 1-based week number
    pub week: u32,

    /// Item IDs this one waits on (not checked for cycles)
    #[serde(default)]
    pub dependencies: Vec<String>,

    #[serde(default)]
    pub risk_level: RiskLevel,
}

impl RoadmapEntry {
    /// Create a low-risk entry with no dependencies.
    pub fn new(item_id: impl Into<String>, week: u32) -> Self {
        Self {
            item_id: item_id.into(),
            week,
            dependencies: Vec::new(),
            risk_level: RiskLevel::Low,
        }
    }
}

/// A generated roadmap: scheduled entries plus global warnings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapPlan {
    #[serde(default)]
    pub items: Vec<RoadmapEntry>,

    /// Advisory messages with no week or item association
    #[serde(default)]
    pub warnings: Vec<String>,
}
