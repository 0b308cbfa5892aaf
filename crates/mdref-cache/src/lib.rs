//! mdref address caches
//!
//! Two interchangeable implementations of [`mdref_address::AddressCache`]:
//!
//! - [`LruAddressCache`]: persistent, fixed capacity, true LRU eviction
//! - [`BatchAddressCache`]: unbounded within a batch, cleared explicitly or
//!   after a timeout
//!
//! Both honour the same contract: keyed by raw input, explicit
//! document-scoped invalidation, no freshness tracking of their own.
//!
//! # Example
//!
//! ```rust
//! use mdref_address::{AddressCache, AddressParser};
//! use mdref_cache::LruAddressCache;
//! use std::sync::Arc;
//!
//! let cache = Arc::new(LruAddressCache::default());
//! let parser = AddressParser::new(cache.clone());
//!
//! parser.parse_section_address("/guide.md#intro", None).unwrap();
//! assert_eq!(cache.len(), 2);
//!
//! cache.invalidate_document("/guide.md");
//! assert!(cache.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod batch;
pub mod config;
pub mod error;
pub mod persistent;
pub mod stats;

// Re-exports for convenience
pub use batch::{BatchAddressCache, DEFAULT_BATCH_TIMEOUT};
pub use config::{CacheConfig, CacheStrategy};
pub use error::CacheError;
pub use persistent::{LruAddressCache, DEFAULT_CAPACITY};
pub use stats::CacheStats;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
