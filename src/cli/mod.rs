//! CLI argument definitions for smart-pm.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// smart-pm - backlog grooming, feedback triage and roadmap planning.
///
/// Start with `spm board add "<title>"`, then `spm roadmap generate`.
#[derive(Parser, Debug)]
#[command(name = "spm")]
#[command(author, version, about = "Backlog sync and roadmap layout for the PM assistant", long_about = None)]
pub struct Cli {
    /// Output in human-readable format instead of JSON
    #[arg(short = 'H', long = "human", global = true)]
    pub human_readable: bool,

    /// Base URL of the assistant API (also SPM_API_URL)
    #[arg(long = "api-url", global = true)]
    pub api_url: Option<String>,

    /// Directory holding the persisted backlog (also SPM_DATA_DIR)
    #[arg(long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long = "quiet", global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Backlog board commands
    Board {
        #[command(subcommand)]
        command: BoardCommands,
    },

    /// Feedback triage commands
    Feedback {
        #[command(subcommand)]
        command: FeedbackCommands,
    },

    /// Roadmap planning commands
    Roadmap {
        #[command(subcommand)]
        command: RoadmapCommands,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Backlog board subcommands
#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// List backlog items
    List,

    /// Show a single backlog item
    Show {
        /// Item ID
        id: String,
    },

    /// Add an item and send it for grooming
    ///
    /// The item is saved before the assistant is contacted, so it survives
    /// a failed grooming call without a quality score.
    Add {
        /// Item title
        title: String,
    },

    /// Delete an item
    Rm {
        /// Item ID
        id: String,
    },
}

/// Feedback subcommands
#[derive(Subcommand, Debug)]
pub enum FeedbackCommands {
    /// Cluster pasted feedback into themes
    ///
    /// Reads one feedback item per line from --file, or from stdin.
    Analyze {
        /// File with one feedback item per line
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Promote the cluster with this theme to the backlog (repeatable)
        #[arg(short, long = "promote", value_name = "THEME")]
        promote: Vec<String>,

        /// Promote every cluster
        #[arg(long, conflicts_with = "promote")]
        promote_all: bool,
    },
}

/// Roadmap subcommands
#[derive(Subcommand, Debug)]
pub enum RoadmapCommands {
    /// Ask the assistant for a plan and lay it out by week
    Generate,

    /// Lay out an existing plan against the stored backlog
    Layout {
        /// JSON file containing a roadmap plan
        #[arg(long)]
        plan: PathBuf,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective configuration and where each value came from
    Show,
}
