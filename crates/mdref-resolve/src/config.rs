//! Resolver and application configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! docs_root = "./docs"
//!
//! [resolver]
//! max_depth = 3
//! max_nodes = 1000
//! timeout_ms = 30000
//!
//! [cache]
//! strategy = "lru"
//! capacity = 1000
//! ```

use crate::error::ConfigError;
use mdref_cache::CacheConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default maximum recursion depth
pub const DEFAULT_MAX_DEPTH: usize = 3;

/// Default node budget per resolution
pub const DEFAULT_MAX_NODES: usize = 1000;

/// Default time budget per resolution
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Budgets for one resolution call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// References at this depth or deeper are not loaded
    pub max_depth: usize,
    /// Total nodes loaded across the whole traversal
    pub max_nodes: usize,
    /// Wall-clock budget in milliseconds
    pub timeout_ms: u64,
}

impl ResolverConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With max depth
    #[inline]
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// With node budget
    #[inline]
    #[must_use]
    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    /// With time budget
    #[inline]
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Time budget as a duration
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Check the budgets are usable
    ///
    /// # Errors
    /// Returns error for a zero node budget or zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_nodes == 0 {
            return Err(ConfigError::Invalid {
                field: "resolver.max_nodes",
                message: "must be greater than zero".into(),
            });
        }
        if self.timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                field: "resolver.timeout_ms",
                message: "must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_nodes: DEFAULT_MAX_NODES,
            timeout_ms: 30_000,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MdrefConfig {
    /// Directory holding the document tree
    pub docs_root: PathBuf,
    /// Resolution budgets
    pub resolver: ResolverConfig,
    /// Address cache
    pub cache: CacheConfig,
}

impl MdrefConfig {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the TOML is malformed or a value is out of range.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// With docs root
    #[inline]
    #[must_use]
    pub fn with_docs_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.docs_root = root.into();
        self
    }

    /// Check every section
    ///
    /// # Errors
    /// Returns the first invalid value found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.resolver.validate()?;
        self.cache.validate()?;
        Ok(())
    }
}

impl Default for MdrefConfig {
    fn default() -> Self {
        Self {
            docs_root: PathBuf::from("."),
            resolver: ResolverConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}
