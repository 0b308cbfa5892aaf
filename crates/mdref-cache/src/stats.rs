//! Cache statistics

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Snapshot of cache activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Number of entries currently held
    pub entries: usize,
    /// Configured capacity (`None` for unbounded caches)
    pub capacity: Option<usize>,
    /// Lookups that found an entry
    pub hits: u64,
    /// Lookups that found nothing
    pub misses: u64,
    /// Entries dropped to make room
    pub evictions: u64,
    /// Entries dropped by document invalidation
    pub invalidations: u64,
}

impl CacheStats {
    /// Fraction of lookups that hit, 0.0 when nothing was looked up
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Lock-free counters shared by the cache strategies
#[derive(Debug, Default)]
pub(crate) struct StatsCounter {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    invalidations: AtomicU64,
}

impl StatsCounter {
    pub(crate) fn record_lookup(&self, hit: bool) {
        if hit {
            self.hits.fetch_add(1, Ordering::Relaxed);
        } else {
            self.misses.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_invalidations(&self, count: usize) {
        self.invalidations.fetch_add(count as u64, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self, entries: usize, capacity: Option<usize>) -> CacheStats {
        CacheStats {
            entries,
            capacity,
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            invalidations: self.invalidations.load(Ordering::Relaxed),
        }
    }
}
