//! Structured logging with tracing
//!
//! One stdout layer, plain or JSON, plus an optional daily-rolling file layer
//! in the same format. `GEOCACHE_LOG` overrides the configured level.

use crate::constants::{DEFAULT_LOG_FILE_STEM, LOG_ENV_VAR};
use geocache_domain::error::{Error, Result};
use std::ffi::OsStr;
use std::path::Path;

pub use crate::config::LoggingConfig;
use tracing::{Level, info, warn};
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt, layer::SubscriberExt, util::SubscriberInitExt};

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync + 'static>;

/// Install the global subscriber described by `config`
///
/// Fails when the level is unknown or a subscriber is already installed.
pub fn init_logging(config: LoggingConfig) -> Result<()> {
    let level = parse_log_level(&config.level)?;
    let filter =
        EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| EnvFilter::new(&config.level));

    let mut layers: Vec<BoxedLayer> = vec![stdout_layer(config.json_format)];
    if let Some(path) = &config.file_output {
        layers.push(file_layer(path, config.json_format));
    }

    Registry::default()
        .with(layers)
        .with(filter)
        .try_init()
        .map_err(|e| {
            Error::configuration_with_source("Failed to install the tracing subscriber", e)
        })?;

    info!(
        level = %level,
        json = config.json_format,
        file = ?config.file_output,
        "Logging initialized"
    );
    Ok(())
}

fn stdout_layer(json: bool) -> BoxedLayer {
    let layer = fmt::layer().with_target(true).with_thread_names(true);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

fn file_layer(path: &Path, json: bool) -> BoxedLayer {
    let directory = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path
        .file_stem()
        .unwrap_or_else(|| OsStr::new(DEFAULT_LOG_FILE_STEM));
    let appender = tracing_appender::rolling::daily(directory, stem);

    let layer = fmt::layer()
        .with_writer(appender)
        .with_ansi(false)
        .with_target(true);
    if json {
        layer.json().boxed()
    } else {
        layer.boxed()
    }
}

/// Map a level name to a tracing [`Level`]
///
/// Accepts `warning` as an alias of `warn`, case-insensitively.
pub fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" | "warning" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => Err(Error::configuration(format!(
            "Invalid log level: {level}. Use trace, debug, info, warn, or error"
        ))),
    }
}

/// Report whether a configuration file was found
pub fn log_config_loaded(config_path: &Path, success: bool) {
    if success {
        info!(path = %config_path.display(), "Configuration loaded");
    } else {
        warn!(path = %config_path.display(), "Configuration file not found");
    }
}
