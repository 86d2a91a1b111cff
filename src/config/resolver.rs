//! Unified precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`SPM_API_URL`, `SPM_DATA_DIR`, `SPM_BACKEND`)
//! 3. config.toml
//! 4. Built-in defaults

use crate::client::DEFAULT_API_BASE_URL;
use crate::config::schema::{SmartPmConfig, default_data_dir};
use crate::storage::BackendType;
use crate::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable overriding the assistant API URL.
pub const API_URL_ENV: &str = "SPM_API_URL";

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "SPM_DATA_DIR";

/// Environment variable overriding the storage backend.
pub const BACKEND_ENV: &str = "SPM_BACKEND";

/// Environment variable pointing at an alternative config.toml.
pub const CONFIG_FILE_ENV: &str = "SPM_CONFIG";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.toml
    ConfigFile,
    /// Value from CLI flag
    CliFlag,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    /// The resolved value
    pub value: T,
    /// Where the value came from
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    /// Create a new resolved value.
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Values given on the command line.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub api_url: Option<String>,
    pub data_dir: Option<PathBuf>,
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub api_url: Resolved<String>,
    pub data_dir: Resolved<PathBuf>,
    pub backend: Resolved<BackendType>,
    /// Request timeout; `None` means requests wait indefinitely
    pub timeout: Option<Resolved<Duration>>,
}

/// Pick the first present value in precedence order.
fn pick<T>(
    cli: Option<T>,
    env: Option<(T, &str)>,
    file: Option<T>,
    default: impl FnOnce() -> T,
) -> Resolved<T> {
    if let Some(v) = cli {
        return Resolved::new(v, ValueSource::CliFlag);
    }
    if let Some((v, name)) = env {
        return Resolved::new(v, ValueSource::EnvVar(name.to_string()));
    }
    if let Some(v) = file {
        return Resolved::new(v, ValueSource::ConfigFile);
    }
    Resolved::new(default(), ValueSource::Default)
}

fn parse_backend(name: &str, origin: &str) -> Result<BackendType> {
    BackendType::from_str(name)
        .ok_or_else(|| Error::Config(format!("unknown backend '{}' from {}", name, origin)))
}

/// Resolve configuration against the process environment.
pub fn resolve_config(config: &SmartPmConfig, overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    resolve_config_with_env(config, overrides, |name| std::env::var(name).ok())
}

/// Resolve configuration with an injected environment lookup.
///
/// Empty environment values count as unset.
pub fn resolve_config_with_env<F>(
    config: &SmartPmConfig,
    overrides: &ConfigOverrides,
    env: F,
) -> Result<ResolvedConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let env_value = |name: &'static str| env(name).filter(|v| !v.trim().is_empty()).map(|v| (v, name));

    let api_url = pick(
        overrides.api_url.clone(),
        env_value(API_URL_ENV),
        config.api_url.clone(),
        || DEFAULT_API_BASE_URL.to_string(),
    );

    let data_dir = pick(
        overrides.data_dir.clone(),
        env_value(DATA_DIR_ENV).map(|(v, name)| (PathBuf::from(v), name)),
        config.data_dir.clone(),
        default_data_dir,
    );

    let backend_env = match env_value(BACKEND_ENV) {
        Some((v, name)) => Some((parse_backend(&v, name)?, name)),
        None => None,
    };
    let backend_file = match &config.backend {
        Some(v) => Some(parse_backend(v, "config.toml")?),
        None => None,
    };
    let backend = pick(None, backend_env, backend_file, || BackendType::File);

    let timeout = config
        .timeout_secs
        .map(|secs| Resolved::new(Duration::from_secs(secs), ValueSource::ConfigFile));

    Ok(ResolvedConfig {
        api_url,
        data_dir,
        backend,
        timeout,
    })
}
