//! Application bootstrap
//!
//! ## Usage
//!
//! ```rust,ignore
//! let context = init_app(ConfigLoader::new().load()?).await?;
//! context.cache().put("user:1", "alice", "us-east").await?;
//! context.shutdown().await;
//! ```

use crate::config::AppConfig;
use crate::constants::DEFAULT_SHUTDOWN_TIMEOUT_SECS;
use crate::di::transport_factory::create_transport;
use geocache_application::use_cases::{GeoCache, GeoCacheOptions};
use geocache_domain::error::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Running application: configuration plus the started cache
pub struct AppContext {
    config: Arc<AppConfig>,
    cache: Arc<GeoCache>,
}

impl AppContext {
    /// The effective configuration
    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }

    /// The running cache
    pub fn cache(&self) -> &Arc<GeoCache> {
        &self.cache
    }

    /// Stop the delivery workers
    ///
    /// Returns `true` if every worker stopped within the grace period.
    pub async fn shutdown(&self) -> bool {
        self.shutdown_with_timeout(Duration::from_secs(DEFAULT_SHUTDOWN_TIMEOUT_SECS))
            .await
    }

    /// Stop the delivery workers, waiting at most `timeout`
    pub async fn shutdown_with_timeout(&self, timeout: Duration) -> bool {
        info!("Shutting down GeoCache");
        self.cache.shutdown(timeout).await
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("regions", &self.config.regions)
            .field("transport", &self.config.transport.provider)
            .finish()
    }
}

/// Cache options derived from the configuration
pub fn geo_cache_options(config: &AppConfig) -> GeoCacheOptions {
    GeoCacheOptions::default()
        .with_capacity(config.cache.capacity)
        .with_ttl(config.cache.ttl())
        .with_breaker(config.resilience.breaker())
        .with_restart_backoff(config.transport.restart_backoff())
}

/// Build the transport and start the cache described by `config`
pub async fn init_app(config: AppConfig) -> Result<AppContext> {
    let regions = config.region_names()?;
    let transport = create_transport(&config.transport).await?;
    let cache = GeoCache::start(regions, transport, geo_cache_options(&config)).await?;

    info!(
        regions = ?config.regions,
        transport = %config.transport.provider,
        "GeoCache ready"
    );

    Ok(AppContext {
        config: Arc::new(config),
        cache: Arc::new(cache),
    })
}
