//! Persistent LRU address cache
//!
//! Fixed total capacity shared by document, section and task entries. Both
//! reads and writes bump recency; on overflow the least recently used entry
//! is evicted.

use crate::stats::{CacheStats, StatsCounter};
use lru::LruCache;
use mdref_address::{AddressCache, CacheKey, CachedAddress};
use parking_lot::Mutex;
use std::num::NonZeroUsize;

/// Default total number of cached addresses
pub const DEFAULT_CAPACITY: usize = 1000;

/// LRU address cache
#[derive(Debug)]
pub struct LruAddressCache {
    inner: Mutex<LruCache<CacheKey, CachedAddress>>,
    capacity: NonZeroUsize,
    stats: StatsCounter,
}

impl LruAddressCache {
    /// Create cache holding at most `capacity` entries (minimum 1)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            capacity,
            stats: StatsCounter::default(),
        }
    }

    /// Configured capacity
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Whether `key` is present, without bumping its recency
    #[must_use]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.inner.lock().contains(key)
    }

    /// Current statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        let entries = self.inner.lock().len();
        self.stats.snapshot(entries, Some(self.capacity()))
    }
}

impl Default for LruAddressCache {
    /// Create cache with default capacity (1,000 entries)
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl AddressCache for LruAddressCache {
    fn get(&self, key: &CacheKey) -> Option<CachedAddress> {
        let found = self.inner.lock().get(key).cloned();
        self.stats.record_lookup(found.is_some());
        found
    }

    fn set(&self, key: CacheKey, value: CachedAddress) {
        let probe = key.clone();
        let displaced = self.inner.lock().push(key, value);
        if let Some((evicted, old)) = displaced {
            if evicted != probe {
                self.stats.record_eviction();
                tracing::trace!(cache_key = old.cache_key(), "evicted least recently used address");
            }
        }
    }

    fn invalidate_document(&self, path: &str) -> usize {
        let mut inner = self.inner.lock();
        let doomed: Vec<CacheKey> = inner
            .iter()
            .filter(|(_, value)| value.owning_document_path() == path)
            .map(|(key, _)| key.clone())
            .collect();
        for key in &doomed {
            inner.pop(key);
        }
        drop(inner);

        self.stats.record_invalidations(doomed.len());
        doomed.len()
    }

    fn clear(&self) {
        self.inner.lock().clear();
    }

    fn len(&self) -> usize {
        self.inner.lock().len()
    }
}
