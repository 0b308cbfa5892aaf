//! mdref reference resolution
//!
//! Turns a document's `@` references into a bounded, cycle-free tree of
//! loaded content, and validates tool-supplied addresses against live
//! documents.
//!
//! # Core Concepts
//!
//! - [`ReferenceLoader`]: recursive expansion under depth, node and time budgets
//! - [`TraversalContext`]: visited set, node counter and start time of one call
//! - [`HierarchicalContent`]: one node of the resolved tree
//! - [`AddressService`]: parse + existence check with recovery hints
//! - [`MdrefConfig`]: TOML configuration for all of the above
//!
//! # Example
//!
//! ```rust
//! use mdref_content::{AtReferenceExtractor, MemoryContentProvider};
//! use mdref_resolve::{flatten_hierarchy, ReferenceLoader, ResolverConfig};
//! use std::sync::Arc;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let docs = MemoryContentProvider::new();
//! docs.insert("/a.md", "# A\n\nSee @/b.md").unwrap();
//! docs.insert("/b.md", "# B\n\nBack to @/a.md").unwrap();
//!
//! let loader = ReferenceLoader::new(
//!     Arc::new(docs),
//!     Arc::new(AtReferenceExtractor),
//!     ResolverConfig::default(),
//! );
//! let resolution = loader.load_document("/a.md").await.unwrap();
//! assert_eq!(flatten_hierarchy(&resolution.nodes), vec!["/b.md"]);
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod config;
pub mod context;
pub mod error;
pub mod hierarchy;
pub mod loader;
pub mod service;

// Re-exports for convenience
pub use config::{
    MdrefConfig, ResolverConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_NODES, DEFAULT_TIMEOUT,
};
pub use context::{SkipReason, SkippedReference, TraversalContext};
pub use error::{ConfigError, ResolveError, ResolveResult};
pub use hierarchy::{flatten_hierarchy, hierarchy_stats, HierarchicalContent, HierarchyStats};
pub use loader::{ReferenceLoader, Resolution, TraversalStats};
pub use service::{AddressService, ResolvedDocument, ResolvedSection, ResolvedTask};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for resolving references
    pub use crate::{
        AddressService, HierarchicalContent, MdrefConfig, ReferenceLoader, Resolution,
        ResolveError, ResolverConfig,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
