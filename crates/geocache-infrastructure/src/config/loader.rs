//! Configuration loader
//!
//! Handles loading configuration from various sources including
//! TOML files, environment variables, and default values.

use crate::config::AppConfig;
use crate::config::TransportProvider;
use crate::constants::{
    CONFIG_ENV_PREFIX, CONFIG_ENV_SEPARATOR, DEFAULT_CONFIG_DIR, DEFAULT_CONFIG_FILENAME,
};
use crate::error_ext::ErrorContext;
use crate::logging::{log_config_loaded, parse_log_level};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use geocache_domain::error::{Error, Result};
use geocache_domain::value_objects::RegionName;
use std::collections::HashSet;
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader service
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Configuration file path
    config_path: Option<PathBuf>,
}

impl ConfigLoader {
    /// Create a new configuration loader with default settings
    pub fn new() -> Self {
        Self { config_path: None }
    }

    /// Set the configuration file path
    pub fn with_config_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration from all sources
    ///
    /// Configuration sources are merged in this order (later sources override earlier):
    /// 1. Default values from `AppConfig::default()`
    /// 2. TOML configuration file (if exists)
    /// 3. Environment variables with prefix (e.g., `GEOCACHE__CACHE__CAPACITY`)
    pub fn load(&self) -> Result<AppConfig> {
        let mut figment = Figment::new().merge(Serialized::defaults(AppConfig::default()));

        if let Some(config_path) = &self.config_path {
            if config_path.exists() {
                figment = figment.merge(Toml::file(config_path));
                log_config_loaded(config_path, true);
            } else {
                log_config_loaded(config_path, false);
            }
        } else if let Some(default_path) = Self::find_default_config_path() {
            figment = figment.merge(Toml::file(&default_path));
            log_config_loaded(&default_path, true);
        }

        let prefix = format!("{CONFIG_ENV_PREFIX}{CONFIG_ENV_SEPARATOR}");
        figment = figment.merge(Env::prefixed(&prefix).split(CONFIG_ENV_SEPARATOR));

        let app_config: AppConfig = figment
            .extract()
            .config_context("Failed to extract configuration")?;

        validate_app_config(&app_config)?;

        Ok(app_config)
    }

    /// Save configuration to file
    pub fn save_to_file<P: AsRef<Path>>(&self, config: &AppConfig, path: P) -> Result<()> {
        let toml_string =
            toml::to_string_pretty(config).config_context("Failed to serialize config to TOML")?;

        std::fs::write(path.as_ref(), toml_string).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the current configuration file path
    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Find the first existing default configuration file
    fn find_default_config_path() -> Option<PathBuf> {
        let current_dir = env::current_dir().ok()?;

        let candidates = [
            Some(current_dir.join(DEFAULT_CONFIG_FILENAME)),
            Some(
                current_dir
                    .join(DEFAULT_CONFIG_DIR)
                    .join(DEFAULT_CONFIG_FILENAME),
            ),
            dirs::config_dir().map(|d| d.join(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILENAME)),
        ];

        candidates.into_iter().flatten().find(|path| path.exists())
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate application configuration
///
/// Performs validation of all configuration sections.
pub fn validate_app_config(config: &AppConfig) -> Result<()> {
    validate_regions(&config.regions)?;
    validate_cache_config(config)?;
    validate_resilience_config(config)?;
    validate_transport_config(config)?;
    parse_log_level(&config.logging.level)?;
    Ok(())
}

fn validate_regions(regions: &[String]) -> Result<()> {
    if regions.is_empty() {
        return Err(Error::configuration("At least one region must be configured"));
    }
    let mut seen = HashSet::with_capacity(regions.len());
    for raw in regions {
        let region = RegionName::new(raw.as_str()).map_err(|e| {
            Error::configuration(format!("Invalid region name '{raw}': {e}"))
        })?;
        if !seen.insert(region) {
            return Err(Error::configuration(format!(
                "Region '{}' is configured more than once",
                raw.trim()
            )));
        }
    }
    Ok(())
}

fn validate_cache_config(config: &AppConfig) -> Result<()> {
    if config.cache.capacity == 0 {
        return Err(Error::configuration("Cache capacity cannot be 0"));
    }
    if config.cache.ttl_secs == 0 {
        return Err(Error::configuration("Cache TTL cannot be 0"));
    }
    Ok(())
}

fn validate_resilience_config(config: &AppConfig) -> Result<()> {
    if config.resilience.breaker_max_failures == 0 {
        return Err(Error::configuration("Breaker failure threshold cannot be 0"));
    }
    if config.resilience.breaker_reset_secs == 0 {
        return Err(Error::configuration("Breaker reset window cannot be 0"));
    }
    Ok(())
}

fn validate_transport_config(config: &AppConfig) -> Result<()> {
    let transport = &config.transport;
    if transport.capacity == 0 {
        return Err(Error::configuration("Transport channel capacity cannot be 0"));
    }
    if transport.provider == TransportProvider::Nats
        && transport.nats_url.as_deref().is_none_or(|url| url.trim().is_empty())
    {
        return Err(Error::configuration(
            "NATS URL is required when the NATS transport is selected",
        ));
    }
    Ok(())
}
