//! Error types for cache construction

/// Errors building an address cache
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    /// LRU capacity must be at least one entry
    #[error("cache capacity must be greater than zero")]
    ZeroCapacity,

    /// Batch timeout must be positive
    #[error("batch timeout must be greater than zero")]
    ZeroTimeout,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_error_display() {
        assert_eq!(
            CacheError::ZeroCapacity.to_string(),
            "cache capacity must be greater than zero"
        );
    }
}
