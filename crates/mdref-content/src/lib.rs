//! mdref content layer
//!
//! Interfaces the resolution engine consumes, plus reference
//! implementations of them:
//!
//! - [`ContentProvider`]: document outline, section content and full source
//!   - [`MemoryContentProvider`]: concurrent in-memory store
//!   - [`FsContentProvider`]: directory tree with a moka parse cache
//! - [`ReferenceExtractor`]: finds `@` references and resolves them
//!   - [`AtReferenceExtractor`]: `@path.md#slug` syntax
//! - [`ParsedDocument`]: pulldown-cmark based markdown outline
//!
//! # Example
//!
//! ```rust
//! use mdref_content::{AtReferenceExtractor, ReferenceExtractor};
//!
//! let refs = AtReferenceExtractor.extract_normalized(
//!     "Read @../shared/terms.md#glossary first.",
//!     "/guides/start.md",
//! );
//! assert_eq!(refs[0].target_path(), "/shared/terms.md#glossary");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod document;
pub mod error;
pub mod fs;
pub mod markdown;
pub mod memory;
pub mod provider;
pub mod reference;

// Re-exports for convenience
pub use document::{extract_keywords, Document, DocumentMetadata, FingerprintEntry};
pub use error::{ProviderError, ProviderResult};
pub use fs::FsContentProvider;
pub use markdown::ParsedDocument;
pub use memory::MemoryContentProvider;
pub use provider::ContentProvider;
pub use reference::{AtReferenceExtractor, NormalizedReference, ReferenceExtractor};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
