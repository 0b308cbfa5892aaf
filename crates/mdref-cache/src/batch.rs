//! Batch-scoped address cache
//!
//! Unbounded for the lifetime of one logical batch. The caller clears it
//! when the batch completes; if a batch outlives its timeout, the next
//! access clears it first so a forgotten `end_batch` cannot leak memory.

use crate::stats::{CacheStats, StatsCounter};
use dashmap::DashMap;
use mdref_address::{AddressCache, CacheKey, CachedAddress};
use parking_lot::Mutex;
use std::time::{Duration, Instant};

/// Default lifetime of a batch
pub const DEFAULT_BATCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Batch-scoped address cache
#[derive(Debug)]
pub struct BatchAddressCache {
    entries: DashMap<CacheKey, CachedAddress>,
    /// Start of the current batch, `None` when empty
    started: Mutex<Option<Instant>>,
    timeout: Duration,
    stats: StatsCounter,
}

impl BatchAddressCache {
    /// Create cache with the given batch timeout
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            started: Mutex::new(None),
            timeout,
            stats: StatsCounter::default(),
        }
    }

    /// Configured batch timeout
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start a new batch, discarding anything left from the previous one
    pub fn begin_batch(&self) {
        let mut started = self.started.lock();
        self.entries.clear();
        *started = Some(Instant::now());
    }

    /// Finish the current batch
    pub fn end_batch(&self) {
        self.clear();
    }

    /// Time since the current batch started
    #[must_use]
    pub fn batch_age(&self) -> Option<Duration> {
        self.started.lock().map(|at| at.elapsed())
    }

    /// Current statistics
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len(), None)
    }

    fn expire_if_stale(&self) {
        let mut started = self.started.lock();
        if let Some(at) = *started {
            if at.elapsed() > self.timeout {
                let dropped = self.entries.len();
                self.entries.clear();
                *started = None;
                tracing::warn!(
                    dropped,
                    timeout_secs = self.timeout.as_secs(),
                    "batch cache outlived its timeout, auto-cleared"
                );
            }
        }
    }

    fn mark_started(&self) {
        let mut started = self.started.lock();
        if started.is_none() {
            *started = Some(Instant::now());
        }
    }
}

impl Default for BatchAddressCache {
    /// Create cache with the default 60s batch timeout
    fn default() -> Self {
        Self::new(DEFAULT_BATCH_TIMEOUT)
    }
}

impl AddressCache for BatchAddressCache {
    fn get(&self, key: &CacheKey) -> Option<CachedAddress> {
        self.expire_if_stale();
        let found = self.entries.get(key).map(|entry| entry.value().clone());
        self.stats.record_lookup(found.is_some());
        found
    }

    fn set(&self, key: CacheKey, value: CachedAddress) {
        self.expire_if_stale();
        self.mark_started();
        self.entries.insert(key, value);
    }

    fn invalidate_document(&self, path: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, value| value.owning_document_path() != path);
        let removed = before.saturating_sub(self.entries.len());
        self.stats.record_invalidations(removed);
        removed
    }

    fn clear(&self) {
        let mut started = self.started.lock();
        self.entries.clear();
        *started = None;
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdref_address::AddressParser;
    use std::sync::Arc;

    #[test]
    fn batch_starts_on_first_write() {
        let cache = Arc::new(BatchAddressCache::default());
        assert!(cache.batch_age().is_none());

        let parser = AddressParser::new(cache.clone());
        parser.parse_document_address("/a.md").unwrap();
        assert!(cache.batch_age().is_some());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn end_batch_clears() {
        let cache = Arc::new(BatchAddressCache::default());
        let parser = AddressParser::new(cache.clone());
        parser.parse_document_address("/a.md").unwrap();
        parser.parse_section_address("x", Some("/a.md")).unwrap();

        cache.end_batch();
        assert!(cache.is_empty());
        assert!(cache.batch_age().is_none());
    }

    #[test]
    fn stale_batch_auto_clears() {
        let cache = Arc::new(BatchAddressCache::new(Duration::from_millis(20)));
        let parser = AddressParser::new(cache.clone());
        parser.parse_document_address("/a.md").unwrap();
        assert!(cache.get_document("/a.md").is_some());

        std::thread::sleep(Duration::from_millis(40));
        assert!(cache.get_document("/a.md").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn begin_batch_resets() {
        let cache = Arc::new(BatchAddressCache::default());
        let parser = AddressParser::new(cache.clone());
        parser.parse_document_address("/a.md").unwrap();

        cache.begin_batch();
        assert!(cache.is_empty());
        assert!(cache.batch_age().is_some());
    }

    #[test]
    fn invalidate_keeps_unrelated_documents() {
        let cache = Arc::new(BatchAddressCache::default());
        let parser = AddressParser::new(cache.clone());
        parser.parse_section_address("/a.md#one", None).unwrap();
        parser.parse_section_address("/a.md#two", None).unwrap();
        parser.parse_document_address("/b.md").unwrap();

        assert_eq!(cache.invalidate_document("/a.md"), 3);
        assert_eq!(cache.len(), 1);
        assert!(cache.get_document("/b.md").is_some());
    }
}
