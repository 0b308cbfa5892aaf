//! Error types for reference resolution

use mdref_address::AddressingError;
use mdref_cache::CacheError;
use mdref_content::ProviderError;
use std::path::PathBuf;

/// Errors surfaced by the resolution layer
///
/// Per-reference failures inside the loader are not errors; they become
/// [`SkipReason`](crate::SkipReason)s. The only hard failure of a traversal
/// is [`ResolveError::Timeout`].
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// Traversal exceeded its time budget
    #[error("reference resolution timed out after {elapsed_ms}ms (limit {limit_ms}ms)")]
    Timeout {
        /// Time spent when the budget was checked
        elapsed_ms: u64,
        /// Configured budget
        limit_ms: u64,
    },

    /// Address parsing or existence check failed
    #[error(transparent)]
    Addressing(#[from] AddressingError),

    /// Content provider failed
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// Configuration invalid or unreadable
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ResolveError {
    /// Machine-readable error code
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Timeout { .. } => "RESOLUTION_TIMEOUT",
            Self::Addressing(e) => e.code(),
            Self::Provider(_) => "PROVIDER_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// Config file path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for the expected schema
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("invalid config value for {field}: {message}")]
    Invalid {
        /// Offending field
        field: &'static str,
        /// Reason
        message: String,
    },

    /// Cache section rejected
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Result alias for resolution operations
pub type ResolveResult<T> = Result<T, ResolveError>;
