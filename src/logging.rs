//! Logging setup for the `spm` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is up to
//! the host. Logs go to stderr so stdout stays machine-readable.
//!
//! - `SPM_LOG` takes an `EnvFilter` directive and wins over `-v`/`-q`
//! - `SPM_LOG_FORMAT=json` switches to one JSON object per event

use crate::{Error, Result};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV: &str = "SPM_LOG";

/// Environment variable selecting the log format ("compact" or "json").
pub const LOG_FORMAT_ENV: &str = "SPM_LOG_FORMAT";

/// Filter directive for a verbosity level.
pub fn default_directive(verbosity: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global stderr subscriber.
///
/// Fails if a subscriber is already installed or `SPM_LOG` is malformed.
pub fn init_logging(verbosity: u8, quiet: bool) -> Result<()> {
    let filter = match std::env::var(LOG_ENV) {
        Ok(directive) if !directive.trim().is_empty() => EnvFilter::try_new(directive)
            .map_err(|e| Error::Config(format!("{}: {}", LOG_ENV, e)))?,
        _ => EnvFilter::new(default_directive(verbosity, quiet)),
    };
    let json = std::env::var(LOG_FORMAT_ENV).is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_ansi(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    } else {
        registry
            .with(
                fmt::layer()
                    .compact()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init()
    };
    installed.map_err(|e| Error::Other(format!("failed to install logger: {}", e)))
}
