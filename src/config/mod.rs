//! Configuration for Smart PM.
//!
//! ## config.toml - User preferences
//!
//! Located at `$SPM_CONFIG`, or `~/.config/smart-pm/config.toml` by default.
//!
//! Contains:
//! - `api-url` - Base URL of the assistant API
//! - `data-dir` - Directory holding the persisted backlog
//! - `backend` - Storage backend ("file" or "memory")
//! - `timeout-secs` - Optional request timeout (requests never time out when unset)
//!
//! ## Precedence
//!
//! CLI flag > environment variable > config.toml > defaults
//!
//! Use the [`resolver`] module for unified precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    API_URL_ENV, BACKEND_ENV, CONFIG_FILE_ENV, ConfigOverrides, DATA_DIR_ENV, Resolved,
    ResolvedConfig, ValueSource, resolve_config, resolve_config_with_env,
};
pub use schema::{SmartPmConfig, default_config_path, default_data_dir};
