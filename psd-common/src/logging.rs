//! Tracing initialization shared by PSD binaries

use crate::config::LoggingConfig;
use crate::{Error, Result};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the log filter
///
/// `RUST_LOG` wins when set. Otherwise `verbose` forces `debug`, and the
/// configured level applies.
pub fn build_filter(config: &LoggingConfig, verbose: bool) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = if verbose { "debug" } else { config.level.as_str() };
    EnvFilter::try_new(level)
        .map_err(|e| Error::Config(format!("Invalid log level '{}': {}", level, e)))
}

/// Install the global tracing subscriber
///
/// Logs go to stderr, or to `logging.file` (appended, no ANSI colors) when set.
pub fn init_tracing(config: &LoggingConfig, verbose: bool) -> Result<()> {
    let filter = build_filter(config, verbose)?;
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match &config.file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
                .try_init()
        }
        None => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
    };

    installed.map_err(|e| Error::Internal(format!("Failed to install tracing subscriber: {}", e)))
}
