//! Process-wide `tracing` subscriber.

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Noisy dependencies are capped unless `RUST_LOG` says otherwise.
fn default_directives(level: &str) -> String {
    format!("{level},sea_orm=warn,sqlx=warn,hyper=info,tower_http=info")
}

/// Install the global subscriber. `RUST_LOG` wins over the configured level.
///
/// # Errors
/// Fails on an unparsable level or when a subscriber is already installed.
pub fn init_logging(config: &LoggingConfig) -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directives(&config.level))
            .with_context(|| format!("invalid log level '{}'", config.level))?,
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    match config.format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    }
    .map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}
