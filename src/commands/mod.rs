//! Command implementations for the `spm` CLI.
//!
//! Each command returns a result type implementing [`Output`], printed as
//! JSON by default or as text with `-H`. Commands are organized by view:
//! - `board` - list, show, add (with grooming) and delete backlog items
//! - `feedback` - cluster pasted feedback and promote themes
//! - `roadmap` - generate plans and lay them out by week
//! - `config` - show the effective configuration

use crate::board::{BacklogBoard, EnrichmentState, spawn_enrichment};
use crate::client::{AssistantService, HttpAssistant};
use crate::config::{
    CONFIG_FILE_ENV, ConfigOverrides, ResolvedConfig, SmartPmConfig, default_config_path,
    resolve_config,
};
use crate::feedback::FeedbackHub;
use crate::models::{BacklogItem, RiskLevel, RoadmapPlan, SentimentBreakdown};
use crate::roadmap::{DisplayItem, OPEN_CAPACITY_LABEL, RoadmapLayout, RoadmapView};
use crate::storage::BacklogStore;
use crate::{Error, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait Output {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error": "{}"}}"#, e))
}

// === Setup ===

/// Path of the config file: `SPM_CONFIG` if set, else the user default.
pub fn config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_FILE_ENV)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .or_else(default_config_path)
}

/// Load config.toml and resolve it against env and CLI overrides.
pub fn load_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    let config = match config_path() {
        Some(path) => SmartPmConfig::load(&path)?,
        None => SmartPmConfig::new(),
    };
    resolve_config(&config, overrides)
}

/// Open the backlog store described by `config`.
pub fn open_store(config: &ResolvedConfig) -> Result<Arc<BacklogStore>> {
    let store = BacklogStore::open(config.backend.value, &config.data_dir.value)?;
    debug!(location = %store.location(), backend = store.backend_type(), "opened backlog store");
    Ok(Arc::new(store))
}

/// HTTP client for the configured assistant.
pub fn assistant(config: &ResolvedConfig) -> HttpAssistant {
    match &config.timeout {
        Some(timeout) => HttpAssistant::with_timeout(&config.api_url.value, timeout.value),
        None => HttpAssistant::new(&config.api_url.value),
    }
}

fn item_line(item: &BacklogItem) -> String {
    let mut line = format!(
        "[{}] {} ({}, {})",
        item.id, item.title, item.item_type, item.status
    );
    if let (Some(score), Some(band)) = (item.quality_score, item.priority_band()) {
        line.push_str(&format!(" quality {} {}", score, band.label()));
    }
    line
}

fn item_details(item: &BacklogItem) -> Vec<String> {
    let mut lines = vec![item_line(item)];
    if let Some(description) = item.display_description() {
        for text in description.lines() {
            lines.push(format!("    {}", text));
        }
    }
    for issue in &item.quality_issues {
        lines.push(format!("    ! {}: {}", issue.issue_type, issue.suggestion));
    }
    lines
}

// === Board Commands ===

#[derive(Serialize)]
pub struct BoardList {
    pub count: usize,
    pub items: Vec<BacklogItem>,
}

impl Output for BoardList {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.items.is_empty() {
            return "Backlog is empty.".to_string();
        }
        let mut lines = vec![format!("{} item(s):", self.count)];
        lines.extend(self.items.iter().map(|i| format!("  {}", item_line(i))));
        lines.join("\n")
    }
}

/// List all persisted backlog items.
///
/// An unreadable backlog is logged and listed as empty.
pub fn board_list(store: Arc<BacklogStore>) -> Result<BoardList> {
    let items = store.load();
    Ok(BoardList {
        count: items.len(),
        items,
    })
}

#[derive(Serialize)]
pub struct BoardShow {
    pub item: BacklogItem,
}

impl Output for BoardShow {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        item_details(&self.item).join("\n")
    }
}

/// Show one backlog item.
pub fn board_show(store: Arc<BacklogStore>, id: &str) -> Result<BoardShow> {
    let board = BacklogBoard::mount(store);
    let item = board
        .get(id)
        .cloned()
        .ok_or_else(|| Error::NotFound(format!("backlog item {}", id)))?;
    Ok(BoardShow { item })
}

#[derive(Serialize)]
pub struct BoardAdded {
    pub item: BacklogItem,
    pub enrichment: EnrichmentState,
}

impl Output for BoardAdded {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let status = match self.enrichment {
            EnrichmentState::Enriched => "groomed",
            EnrichmentState::Failed => "saved without grooming",
            EnrichmentState::Pending => "grooming pending",
        };
        let mut lines = vec![format!("Added {}", status)];
        lines.extend(item_details(&self.item).into_iter().map(|l| format!("  {}", l)));
        lines.join("\n")
    }
}

/// Add an item, persist it, then groom it on a worker thread.
pub fn board_add(
    store: Arc<BacklogStore>,
    service: Arc<dyn AssistantService>,
    title: &str,
) -> Result<BoardAdded> {
    let mut board = BacklogBoard::mount(store);
    let pending = board.begin_create(title)?;
    let id = pending.id().to_string();

    let outcome = spawn_enrichment(pending.clone(), service)
        .join()
        .map_err(|_| Error::Other("grooming worker panicked".to_string()))?;
    board.apply(outcome);

    let item = board.get(&id).cloned().unwrap_or(pending.item);
    let enrichment = board
        .enrichment_state(&id)
        .unwrap_or(EnrichmentState::Pending);
    Ok(BoardAdded { item, enrichment })
}

#[derive(Serialize)]
pub struct BoardRemoved {
    pub id: String,
    pub title: String,
    pub remaining: usize,
}

impl Output for BoardRemoved {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!(
            "Removed [{}] {} ({} item(s) left)",
            self.id, self.title, self.remaining
        )
    }
}

/// Delete a backlog item.
pub fn board_rm(store: Arc<BacklogStore>, id: &str) -> Result<BoardRemoved> {
    let mut board = BacklogBoard::mount(store);
    let removed = board
        .delete(id)
        .ok_or_else(|| Error::NotFound(format!("backlog item {}", id)))?;
    Ok(BoardRemoved {
        id: removed.id,
        title: removed.title,
        remaining: board.len(),
    })
}

// === Feedback Commands ===

#[derive(Serialize)]
pub struct ClusterSummary {
    pub theme: String,
    pub description: String,
    pub item_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<SentimentBreakdown>,
    pub promoted: bool,
}

#[derive(Serialize)]
pub struct FeedbackAnalysis {
    pub feedback_count: usize,
    pub clusters: Vec<ClusterSummary>,
    pub promoted: Vec<BacklogItem>,
    /// Requested themes that matched no cluster
    pub unmatched: Vec<String>,
}

impl Output for FeedbackAnalysis {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        if self.clusters.is_empty() {
            return format!(
                "No themes found in {} feedback item(s).",
                self.feedback_count
            );
        }

        let mut lines = vec![format!(
            "{} theme(s) from {} feedback item(s):",
            self.clusters.len(),
            self.feedback_count
        )];
        for cluster in &self.clusters {
            let marker = if cluster.promoted { " [promoted]" } else { "" };
            lines.push(format!(
                "  {} ({} items){}",
                cluster.theme, cluster.item_count, marker
            ));
            lines.push(format!("    {}", cluster.description));
            if let Some(s) = cluster.sentiment {
                lines.push(format!(
                    "    sentiment: {:.0}% positive, {:.0}% neutral, {:.0}% negative",
                    s.positive, s.neutral, s.negative
                ));
            }
        }
        for item in &self.promoted {
            lines.push(format!("Promoted {}", item_line(item)));
        }
        for theme in &self.unmatched {
            lines.push(format!("No cluster named '{}'", theme));
        }
        lines.join("\n")
    }
}

/// Cluster feedback (one item per line) and promote the chosen themes.
///
/// A failed clustering call yields no clusters rather than an error.
pub fn feedback_analyze(
    store: Arc<BacklogStore>,
    service: &dyn AssistantService,
    input: &str,
    promote: &[String],
    promote_all: bool,
) -> Result<FeedbackAnalysis> {
    let feedback_count = crate::feedback::parse_feedback(input, 0).len();
    let mut hub = FeedbackHub::new(store);
    let clusters = hub.analyze(input, service).to_vec();

    // Clusters sharing a theme are one promotion target.
    let mut targets = Vec::new();
    let mut unmatched = Vec::new();
    if promote_all {
        targets.extend(0..clusters.len());
    } else {
        for theme in promote {
            match clusters.iter().position(|c| &c.theme == theme) {
                Some(index) => targets.push(index),
                None => unmatched.push(theme.clone()),
            }
        }
    }

    let mut promoted = Vec::new();
    for index in targets {
        let cluster = &clusters[index];
        if hub.is_promoted(&cluster.theme) {
            continue;
        }
        // Failures are logged by the hub and skipped.
        if let Some(item) = hub.promote(cluster, index) {
            promoted.push(item);
        }
    }

    let clusters = clusters
        .iter()
        .map(|c| ClusterSummary {
            theme: c.theme.clone(),
            description: c.description.clone(),
            item_count: c.item_count(),
            sentiment: c.sentiment_breakdown(),
            promoted: hub.is_promoted(&c.theme),
        })
        .collect();

    Ok(FeedbackAnalysis {
        feedback_count,
        clusters,
        promoted,
        unmatched,
    })
}

// === Roadmap Commands ===

#[derive(Serialize)]
pub struct WeekOutput {
    pub week: u32,
    pub open_capacity: bool,
    pub items: Vec<DisplayItem>,
}

#[derive(Serialize)]
pub struct RoadmapOutput {
    pub sample_data: bool,
    pub horizon: u32,
    pub weeks: Vec<WeekOutput>,
    pub warnings: Vec<String>,
}

impl RoadmapOutput {
    fn new(layout: &RoadmapLayout, sample_data: bool) -> Self {
        Self {
            sample_data,
            horizon: layout.horizon(),
            weeks: layout
                .columns()
                .map(|column| WeekOutput {
                    week: column.week,
                    open_capacity: column.is_open_capacity(),
                    items: column.items.to_vec(),
                })
                .collect(),
            warnings: layout.warnings().to_vec(),
        }
    }
}

impl Output for RoadmapOutput {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.sample_data {
            lines.push("Backlog is empty; planned sample items.".to_string());
        }
        for week in &self.weeks {
            lines.push(format!("Week {}", week.week));
            if week.open_capacity {
                lines.push(format!("  {}", OPEN_CAPACITY_LABEL));
            }
            for item in &week.items {
                let mut line = format!("  - {}", item.title);
                if item.risk_level != RiskLevel::Low {
                    line.push_str(&format!(" [{} risk]", item.risk_level));
                }
                if !item.dependencies.is_empty() {
                    line.push_str(&format!(" (after {})", item.dependencies.join(", ")));
                }
                lines.push(line);
            }
        }
        if !self.warnings.is_empty() {
            lines.push("Warnings:".to_string());
            lines.extend(self.warnings.iter().map(|w| format!("  {}", w)));
        }
        lines.join("\n")
    }
}

/// Ask the assistant for a plan of the persisted backlog.
pub fn roadmap_generate(
    store: Arc<BacklogStore>,
    service: &dyn AssistantService,
) -> Result<RoadmapOutput> {
    let mut view = RoadmapView::mount(store);
    let layout = view
        .generate(service)
        .ok_or_else(|| Error::Remote("roadmap generation failed".to_string()))?;
    Ok(RoadmapOutput::new(&layout, view.uses_sample_data()))
}

/// Lay out a plan read from `plan_path` against the persisted backlog.
pub fn roadmap_layout(store: Arc<BacklogStore>, plan_path: &Path) -> Result<RoadmapOutput> {
    let content = fs::read_to_string(plan_path)?;
    let plan: RoadmapPlan = serde_json::from_str(&content)
        .map_err(|e| Error::InvalidInput(format!("{}: {}", plan_path.display(), e)))?;
    let view = RoadmapView::mount(store);
    let layout = RoadmapLayout::build(&plan, view.backlog());
    Ok(RoadmapOutput::new(&layout, false))
}

// === Config Commands ===

#[derive(Serialize)]
pub struct ConfigValue {
    pub value: String,
    pub source: String,
}

#[derive(Serialize)]
pub struct ConfigShow {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config_path: Option<String>,
    pub api_url: ConfigValue,
    pub data_dir: ConfigValue,
    pub backend: ConfigValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl Output for ConfigShow {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if let Some(path) = &self.config_path {
            lines.push(format!("config file: {}", path));
        }
        for (name, v) in [
            ("api-url", &self.api_url),
            ("data-dir", &self.data_dir),
            ("backend", &self.backend),
        ] {
            lines.push(format!("{} = {} ({})", name, v.value, v.source));
        }
        if let Some(secs) = self.timeout_secs {
            lines.push(format!("timeout-secs = {} (config)", secs));
        }
        lines.join("\n")
    }
}

/// Report the effective configuration.
pub fn config_show(config: &ResolvedConfig) -> ConfigShow {
    ConfigShow {
        config_path: config_path().map(|p| p.display().to_string()),
        api_url: ConfigValue {
            value: config.api_url.value.clone(),
            source: config.api_url.source.to_string(),
        },
        data_dir: ConfigValue {
            value: config.data_dir.value.display().to_string(),
            source: config.data_dir.source.to_string(),
        },
        backend: ConfigValue {
            value: config.backend.value.to_string(),
            source: config.backend.source.to_string(),
        },
        timeout_secs: config.timeout.as_ref().map(|t| t.value.as_secs()),
    }
}
