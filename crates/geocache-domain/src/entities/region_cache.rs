//! Region cache
//!
//! A bounded least-recently-used cache with per-entry expiration, one per
//! region. It has no knowledge of other regions and no locking of its own:
//! the owner serializes access.
//!
//! ## Expiration
//!
//! Expired entries are not purged. [`RegionCache::get`] reports them as
//! misses and leaves them in place, where [`RegionCache::get_stale`] can still
//! reach them in degraded mode. They disappear only when overwritten or when
//! they become the coldest entry and capacity forces them out.
//!
//! ## Eviction
//!
//! Pure LRU: recency is refreshed by `get` hits and by `put`. Capacity
//! enforcement never consults TTL.

use crate::error::{Error, Result};
use lru::LruCache;
use std::num::NonZeroUsize;
use std::time::Duration;
use tokio::time::Instant;

/// A cached value together with the time it was written
#[derive(Debug, Clone)]
pub struct CacheEntry {
    value: String,
    inserted_at: Instant,
}

impl CacheEntry {
    fn new(value: String) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// The cached value
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Time elapsed since the value was written
    pub fn age(&self) -> Duration {
        self.inserted_at.elapsed()
    }

    /// An entry is expired once its age strictly exceeds the TTL
    pub fn is_expired(&self, ttl: Duration) -> bool {
        self.age() > ttl
    }
}

/// Counters kept by a region cache
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionCacheStats {
    /// Fresh lookups that returned a value
    pub hits: u64,
    /// Lookups that found nothing usable (absent or expired)
    pub misses: u64,
    /// Subset of misses caused by expiration
    pub expired: u64,
    /// Degraded-mode lookups that returned a value
    pub stale_reads: u64,
    /// Entries pushed out by capacity
    pub evictions: u64,
    /// Current number of entries, expired ones included
    pub entries: usize,
}

impl RegionCacheStats {
    /// Fraction of fresh lookups that hit (0.0 to 1.0)
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total > 0 {
            self.hits as f64 / total as f64
        } else {
            0.0
        }
    }
}

/// Bounded, TTL-aware LRU cache for a single region
pub struct RegionCache {
    entries: LruCache<String, CacheEntry>,
    ttl: Duration,
    hits: u64,
    misses: u64,
    expired: u64,
    stale_reads: u64,
    evictions: u64,
}

impl RegionCache {
    /// Create a cache holding at most `capacity` entries
    pub fn new(capacity: NonZeroUsize, ttl: Duration) -> Self {
        Self {
            entries: LruCache::new(capacity),
            ttl,
            hits: 0,
            misses: 0,
            expired: 0,
            stale_reads: 0,
            evictions: 0,
        }
    }

    /// Create a cache from a plain capacity, rejecting zero
    pub fn with_capacity(capacity: usize, ttl: Duration) -> Result<Self> {
        let capacity = NonZeroUsize::new(capacity)
            .ok_or_else(|| Error::invalid_argument("Region cache capacity must be at least 1"))?;
        Ok(Self::new(capacity, ttl))
    }

    /// Look up a fresh value
    ///
    /// Returns `None` when the key is absent or its entry has outlived the
    /// TTL. Only a hit moves the key to the hot end; an expired entry is left
    /// untouched.
    pub fn get(&mut self, key: &str) -> Option<&str> {
        let expired = match self.entries.peek(key) {
            None => {
                self.misses += 1;
                return None;
            }
            Some(entry) => entry.is_expired(self.ttl),
        };

        if expired {
            self.misses += 1;
            self.expired += 1;
            return None;
        }

        self.hits += 1;
        self.entries.get(key).map(CacheEntry::value)
    }

    /// Look up a value regardless of expiration, without touching recency
    pub fn get_stale(&mut self, key: &str) -> Option<&str> {
        let entry = self.entries.peek(key)?;
        self.stale_reads += 1;
        Some(entry.value())
    }

    /// Insert or overwrite a value
    ///
    /// Stamps the entry with the current time and moves the key to the hot
    /// end. When a new key would push the size past capacity the coldest
    /// entry is evicted and its key returned.
    pub fn put<K: Into<String>, V: Into<String>>(&mut self, key: K, value: V) -> Option<String> {
        let key = key.into();
        let evicted = match self.entries.push(key.clone(), CacheEntry::new(value.into())) {
            Some((old_key, _)) if old_key != key => {
                self.evictions += 1;
                Some(old_key)
            }
            _ => None,
        };

        debug_assert!(
            self.entries.len() <= self.entries.cap().get(),
            "region cache holds {} entries with capacity {}",
            self.entries.len(),
            self.entries.cap()
        );

        evicted
    }

    /// Whether an entry exists for `key`, expired or not
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    /// Whether the entry for `key` has expired; `None` when absent
    pub fn is_expired(&self, key: &str) -> Option<bool> {
        self.entries.peek(key).map(|entry| entry.is_expired(self.ttl))
    }

    /// Keys ordered from most to least recently used
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    /// Drop every entry, keeping the counters
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries, expired ones included
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of entries
    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    /// Entry time-to-live
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> RegionCacheStats {
        RegionCacheStats {
            hits: self.hits,
            misses: self.misses,
            expired: self.expired,
            stale_reads: self.stale_reads,
            evictions: self.evictions,
            entries: self.entries.len(),
        }
    }
}

impl std::fmt::Debug for RegionCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegionCache")
            .field("capacity", &self.entries.cap())
            .field("ttl", &self.ttl)
            .field("entries", &self.entries.len())
            .finish()
    }
}
