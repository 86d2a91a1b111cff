//! Feedback items and the clusters the assistant groups them into.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Sentiment label attached to feedback.
///
/// The assistant reports sentiments as free text. Known labels map to their
/// variant case-insensitively and serialize back in lowercase; anything else
/// is kept verbatim in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Unrecognized(String),
}

impl Sentiment {
    /// Parse a label, case-insensitive. Never fails.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "positive" => Self::Positive,
            "neutral" => Self::Neutral,
            "negative" => Self::Negative,
            _ => Self::Unrecognized(s.to_string()),
        }
    }

    /// Get the string representation.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Positive => "positive",
            Self::Neutral => "neutral",
            Self::Negative => "negative",
            Self::Unrecognized(s) => s,
        }
    }
}

impl From<String> for Sentiment {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Sentiment> for String {
    fn from(s: Sentiment) -> Self {
        s.as_str().to_string()
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single piece of raw user feedback. Created per analysis request, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackItem {
    pub id: String,

    /// Provenance tag, e.g. "User Paste"
    pub source: String,

    /// The feedback text
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

/// A theme identified across several feedback items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackCluster {
    /// Display name; also the key used to de-duplicate promotions
    pub theme: String,

    pub description: String,

    /// IDs of the feedback items grouped under this theme
    #[serde(default)]
    pub related_feedback_ids: Vec<String>,

    /// Sentiment label to count
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_distribution: Option<BTreeMap<String, f64>>,
}

/// Share of each known sentiment in a cluster, as percentages.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SentimentBreakdown {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl FeedbackCluster {
    /// Number of feedback items in the cluster.
    pub fn item_count(&self) -> usize {
        self.related_feedback_ids.len()
    }

    /// Percentages of positive, neutral and negative feedback.
    ///
    /// The denominator counts every label, including unrecognized ones, so
    /// the three shares may sum to less than 100. An all-zero distribution
    /// yields all zeros.
    pub fn sentiment_breakdown(&self) -> Option<SentimentBreakdown> {
        let distribution = self.sentiment_distribution.as_ref()?;

        let mut total = 0.0;
        let mut breakdown = SentimentBreakdown::default();
        for (label, count) in distribution {
            total += count;
            match Sentiment::parse(label) {
                Sentiment::Positive => breakdown.positive += count,
                Sentiment::Neutral => breakdown.neutral += count,
                Sentiment::Negative => breakdown.negative += count,
                Sentiment::Unrecognized(_) => {}
            }
        }
        if total == 0.0 {
            total = 1.0;
        }

        Some(SentimentBreakdown {
            positive: breakdown.positive / total * 100.0,
            neutral: breakdown.neutral / total * 100.0,
            negative: breakdown.negative / total * 100.0,
        })
    }
}
