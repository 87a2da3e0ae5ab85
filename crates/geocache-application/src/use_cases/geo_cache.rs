//! GeoCache facade
//!
//! Composes one region cache per configured region with the replication bus
//! and the shared failure breaker.
//!
//! ## Reads
//!
//! `get` reads the region's cache directly. When the transport is unusable
//! (breaker open, or the transport reports itself disconnected) the read is
//! served from the stale path instead, ignoring expiration.
//!
//! ## Writes
//!
//! `put` applies the write to the origin region at once, so the writer reads
//! its own writes there, then fans a [`ChangeRecord`] out to every other
//! region. Replication is best effort: failures are logged and counted by the
//! breaker but never returned to the caller.
//!
//! Writes from one origin are serialized by that origin's write lock, held
//! from the local apply until the fan-out returns. The local apply order is
//! therefore the publish order, and replicas converge on the origin's value.
//!
//! ## Example
//!
//! ```ignore
//! let cache = GeoCache::start(regions, transport, GeoCacheOptions::default()).await?;
//! cache.put("user:1", "alice", "us-east").await?;
//! assert_eq!(cache.get("user:1", "us-east")?, Some("alice".to_string()));
//! // eu-central sees the value once its delivery worker applies the record
//! ```

use geocache_domain::constants::{DEFAULT_ENTRY_TTL_SECS, DEFAULT_REGION_CAPACITY};
use geocache_domain::entities::RegionCacheStats;
use geocache_domain::error::{Error, Result};
use geocache_domain::ports::ReplicationTransport;
use geocache_domain::value_objects::{ChangeRecord, RegionName};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::region_store::RegionStore;
use crate::replication::{DeliveryHandler, PublishReport, ReplicationBus};
use crate::resilience::{BreakerConfig, FailureBreaker};

/// Default pause before a crashed delivery worker is restarted
const DEFAULT_RESTART_BACKOFF: Duration = Duration::from_millis(250);

/// Construction options for [`GeoCache`]
#[derive(Debug, Clone)]
pub struct GeoCacheOptions {
    /// Maximum entries per region cache
    pub capacity: usize,
    /// Entry time-to-live
    pub ttl: Duration,
    /// Failure breaker settings
    pub breaker: BreakerConfig,
    /// Pause before restarting a delivery worker
    pub restart_backoff: Duration,
}

impl Default for GeoCacheOptions {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_REGION_CAPACITY,
            ttl: Duration::from_secs(DEFAULT_ENTRY_TTL_SECS),
            breaker: BreakerConfig::default(),
            restart_backoff: DEFAULT_RESTART_BACKOFF,
        }
    }
}

impl GeoCacheOptions {
    /// Set the per-region capacity
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Set the entry time-to-live
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set the breaker configuration
    pub fn with_breaker(mut self, breaker: BreakerConfig) -> Self {
        self.breaker = breaker;
        self
    }

    /// Set the worker restart backoff
    pub fn with_restart_backoff(mut self, backoff: Duration) -> Self {
        self.restart_backoff = backoff;
        self
    }
}

/// Key-value cache partitioned by region with asynchronous replication
pub struct GeoCache {
    store: Arc<RegionStore>,
    bus: ReplicationBus,
    /// One write lock per origin region
    writers: HashMap<RegionName, Mutex<()>>,
}

impl GeoCache {
    /// Build the region caches, declare channels and start one delivery
    /// worker per region
    ///
    /// Channel declaration failures are logged and tolerated: local reads
    /// and writes work without the transport.
    pub async fn start(
        regions: Vec<RegionName>,
        transport: Arc<dyn ReplicationTransport>,
        options: GeoCacheOptions,
    ) -> Result<Self> {
        let capacity = NonZeroUsize::new(options.capacity)
            .ok_or_else(|| Error::invalid_argument("Region cache capacity must be at least 1"))?;
        let store = Arc::new(RegionStore::new(&regions, capacity, options.ttl)?);
        let breaker = Arc::new(FailureBreaker::new(options.breaker));
        let bus = ReplicationBus::new(transport, regions, breaker, options.restart_backoff);

        if let Err(e) = bus.declare_all().await {
            warn!(error = %e, "Region channel declaration failed; replication degraded");
        }

        for region in store.regions() {
            let target = Arc::clone(&store);
            let name = region.clone();
            let handler: DeliveryHandler =
                Arc::new(move |payload: &[u8]| target.apply_payload(name.as_str(), payload));
            bus.subscribe(region, handler)?;
        }

        info!(
            regions = ?store.regions().iter().map(RegionName::as_str).collect::<Vec<_>>(),
            provider = bus.transport().provider_name(),
            capacity = options.capacity,
            ttl_secs = options.ttl.as_secs(),
            "GeoCache started"
        );

        let writers = store
            .regions()
            .iter()
            .map(|region| (region.clone(), Mutex::new(())))
            .collect();

        Ok(Self {
            store,
            bus,
            writers,
        })
    }

    /// Read `key` in `region`
    ///
    /// `Ok(None)` means absent or expired. When the transport is unusable the
    /// value is read through the stale path, so an expired entry may be
    /// returned.
    pub fn get(&self, key: &str, region: &str) -> Result<Option<String>> {
        self.store.resolve(region)?;
        match self.bus.check_connectivity() {
            Ok(()) => self
                .store
                .with_region(region, |cache| cache.get(key).map(str::to_owned)),
            Err(e) if e.is_connectivity() => {
                debug!(region = %region, key = %key, error = %e, "Transport unavailable; serving stale read");
                self.get_stale(key, region)
            }
            Err(e) => Err(e),
        }
    }

    /// Read `key` in `region` ignoring expiration
    pub fn get_stale(&self, key: &str, region: &str) -> Result<Option<String>> {
        self.store
            .with_region(region, |cache| cache.get_stale(key).map(str::to_owned))
    }

    /// Write `key` in `region` and replicate it to every other region
    ///
    /// Fails only when `region` is not configured; replication problems are
    /// absorbed. Concurrent writers to the same origin are applied and
    /// published one at a time.
    pub async fn put(&self, key: &str, value: &str, region: &str) -> Result<()> {
        let origin = self.store.resolve(region)?.clone();
        let writer = self
            .writers
            .get(&origin)
            .ok_or_else(|| Error::unknown_region(region))?;
        let _ordered = writer.lock().await;

        self.store.apply_change(origin.as_str(), key, value)?;

        let record = ChangeRecord::new(key, value, origin);
        let report = self.bus.publish(&record).await;
        log_incomplete(&record, &report);
        Ok(())
    }

    /// Apply a raw replicated payload delivered to `region`
    pub fn on_replicated_change(&self, raw: &[u8], region: &str) -> Result<()> {
        self.store.apply_payload(region, raw)
    }

    /// Empty the cache of `region`
    pub fn clear(&self, region: &str) -> Result<()> {
        self.store.with_region(region, |cache| cache.clear())
    }

    /// Counters of the cache of `region`
    pub fn stats(&self, region: &str) -> Result<RegionCacheStats> {
        self.store.stats(region)
    }

    /// Configured regions
    pub fn regions(&self) -> &[RegionName] {
        self.store.regions()
    }

    /// The shared failure breaker
    pub fn breaker(&self) -> &Arc<FailureBreaker> {
        self.bus.breaker()
    }

    /// The replication bus
    pub fn bus(&self) -> &ReplicationBus {
        &self.bus
    }

    /// Stop all delivery workers, waiting at most `timeout`
    pub async fn shutdown(&self, timeout: Duration) -> bool {
        self.bus.shutdown(timeout).await
    }
}

fn log_incomplete(record: &ChangeRecord, report: &PublishReport) {
    if report.is_complete() {
        return;
    }
    debug!(
        origin = %record.origin_region(),
        key = record.key(),
        delivered = report.delivered.len(),
        failed = report.failed.len(),
        suppressed = report.suppressed,
        "Replication incomplete"
    );
}

impl std::fmt::Debug for GeoCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeoCache")
            .field("regions", &self.store.regions())
            .field("bus", &self.bus)
            .finish()
    }
}
