//! Per-region cache store
//!
//! Holds one [`RegionCache`] per region, each behind its own mutex. The
//! region set is fixed at construction, so the outer map is never mutated
//! and needs no lock. Every cache operation takes exactly one region lock
//! for its own duration and never nests, so lock ordering cannot deadlock.

use geocache_domain::entities::{RegionCache, RegionCacheStats};
use geocache_domain::error::{Error, Result};
use geocache_domain::value_objects::{ChangePayload, RegionName};
use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tracing::{debug, trace};

/// Region name to locked region cache
#[derive(Debug)]
pub struct RegionStore {
    caches: HashMap<RegionName, Mutex<RegionCache>>,
    regions: Vec<RegionName>,
}

impl RegionStore {
    /// Build one cache per region
    ///
    /// Rejects an empty region set and duplicate names.
    pub fn new(regions: &[RegionName], capacity: NonZeroUsize, ttl: Duration) -> Result<Self> {
        if regions.is_empty() {
            return Err(Error::invalid_argument("At least one region is required"));
        }

        let mut caches = HashMap::with_capacity(regions.len());
        for region in regions {
            let previous = caches.insert(region.clone(), Mutex::new(RegionCache::new(capacity, ttl)));
            if previous.is_some() {
                return Err(Error::invalid_argument(format!(
                    "Region '{region}' is configured more than once"
                )));
            }
        }

        Ok(Self {
            caches,
            regions: regions.to_vec(),
        })
    }

    /// Regions in configuration order
    pub fn regions(&self) -> &[RegionName] {
        &self.regions
    }

    /// Look up the canonical name of a configured region
    pub fn resolve(&self, region: &str) -> Result<&RegionName> {
        self.caches
            .get_key_value(region)
            .map(|(name, _)| name)
            .ok_or_else(|| Error::unknown_region(region))
    }

    /// Run `f` on the cache of `region` under that region's lock
    ///
    /// The guard is scoped to this call, so the lock is released on every
    /// exit path, including a panic inside `f`.
    pub fn with_region<R>(&self, region: &str, f: impl FnOnce(&mut RegionCache) -> R) -> Result<R> {
        let cache = self
            .caches
            .get(region)
            .ok_or_else(|| Error::unknown_region(region))?;
        let mut guard = cache.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(f(&mut guard))
    }

    /// Write `key` into the cache of `region`
    pub fn apply_change(&self, region: &str, key: &str, value: &str) -> Result<()> {
        let evicted = self.with_region(region, |cache| cache.put(key, value))?;
        if let Some(evicted) = evicted {
            debug!(region = %region, evicted = %evicted, "Evicted least recently used entry");
        }
        Ok(())
    }

    /// Decode an inbound payload and apply it to `region`
    ///
    /// Malformed payloads are rejected before any lock is taken.
    pub fn apply_payload(&self, region: &str, raw: &[u8]) -> Result<()> {
        let payload = ChangePayload::decode(raw)?;
        self.apply_change(region, &payload.key, &payload.value)?;
        trace!(region = %region, key = %payload.key, "Applied replicated change");
        Ok(())
    }

    /// Counters of the cache of `region`
    pub fn stats(&self, region: &str) -> Result<RegionCacheStats> {
        self.with_region(region, |cache| cache.stats())
    }
}
