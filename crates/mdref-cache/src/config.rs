//! Cache configuration and construction

use crate::batch::{BatchAddressCache, DEFAULT_BATCH_TIMEOUT};
use crate::error::CacheError;
use crate::persistent::{LruAddressCache, DEFAULT_CAPACITY};
use mdref_address::AddressCache;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Which caching strategy backs the address parser
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheStrategy {
    /// Fixed-capacity LRU that lives as long as the process
    #[default]
    Lru,
    /// Unbounded cache cleared at batch boundaries
    Batch,
}

/// Address cache configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Caching strategy
    pub strategy: CacheStrategy,
    /// Total entries for the LRU strategy
    pub capacity: usize,
    /// Batch lifetime in seconds for the batch strategy
    pub batch_timeout_secs: u64,
}

impl CacheConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With strategy
    #[inline]
    #[must_use]
    pub fn with_strategy(mut self, strategy: CacheStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// With LRU capacity
    #[inline]
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// With batch timeout
    #[inline]
    #[must_use]
    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout_secs = timeout.as_secs();
        self
    }

    /// Batch timeout as a duration
    #[inline]
    #[must_use]
    pub fn batch_timeout(&self) -> Duration {
        Duration::from_secs(self.batch_timeout_secs)
    }

    /// Check the configuration is usable
    ///
    /// # Errors
    /// Returns error for a zero LRU capacity or zero batch timeout.
    pub fn validate(&self) -> Result<(), CacheError> {
        match self.strategy {
            CacheStrategy::Lru if self.capacity == 0 => Err(CacheError::ZeroCapacity),
            CacheStrategy::Batch if self.batch_timeout_secs == 0 => Err(CacheError::ZeroTimeout),
            _ => Ok(()),
        }
    }

    /// Construct the configured cache
    ///
    /// # Errors
    /// Returns error if the configuration is invalid.
    pub fn build(&self) -> Result<Arc<dyn AddressCache>, CacheError> {
        self.validate()?;
        tracing::debug!(strategy = ?self.strategy, capacity = self.capacity, "building address cache");
        Ok(match self.strategy {
            CacheStrategy::Lru => Arc::new(LruAddressCache::new(self.capacity)),
            CacheStrategy::Batch => Arc::new(BatchAddressCache::new(self.batch_timeout())),
        })
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            strategy: CacheStrategy::Lru,
            capacity: DEFAULT_CAPACITY,
            batch_timeout_secs: DEFAULT_BATCH_TIMEOUT.as_secs(),
        }
    }
}
