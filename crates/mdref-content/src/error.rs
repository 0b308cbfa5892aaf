//! Error types for content providers

use mdref_address::AddressingError;
use std::path::PathBuf;

/// Errors raised by a content provider
///
/// "Not found" is not an error: providers return `Ok(None)` for missing
/// documents and sections.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// IO error during file read
    #[error("io error reading {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// The requested path is not a valid document address
    #[error("invalid document path: {0}")]
    Address(#[from] AddressingError),

    /// Frontmatter could not be parsed
    #[error("frontmatter error in {path}: {message}")]
    Frontmatter {
        /// Document path
        path: String,
        /// Parser message
        message: String,
    },

    /// Backend refused or failed the request
    #[error("provider unavailable for {path}: {message}")]
    Unavailable {
        /// Document path
        path: String,
        /// Reason
        message: String,
    },
}

impl ProviderError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create unavailable error for path
    pub fn unavailable(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Result alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;
