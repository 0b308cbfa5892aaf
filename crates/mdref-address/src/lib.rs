//! mdref addressing
//!
//! Validated, canonical addresses for documents, sections and tasks in a
//! markdown document store.
//!
//! # Core Concepts
//!
//! - [`DocumentAddress`]: `/`-rooted path to a `.md` document
//! - [`SectionAddress`]: a slug inside a document, possibly hierarchical
//! - [`TaskAddress`]: a section that sits directly under the `Tasks` heading
//! - [`AddressParser`]: turns raw tool input into addresses, through an
//!   injected [`AddressCache`]
//!
//! # Example
//!
//! ```rust
//! use mdref_address::AddressParser;
//!
//! let parser = AddressParser::uncached();
//! let section = parser
//!     .parse_section_address("#setup/install", Some("/guides/start.md"))
//!     .unwrap();
//!
//! assert_eq!(section.full_path(), "/guides/start.md#setup/install");
//! assert_eq!(section.document().namespace(), "guides");
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod address;
pub mod cache;
pub mod error;
pub mod heading;
pub mod parser;
pub mod slug;
pub mod task;

// Re-exports
pub use address::{
    DocumentAddress, SectionAddress, TaskAddress, DOCUMENT_EXTENSION, ROOT_NAMESPACE,
    TASK_KEY_PREFIX,
};
pub use cache::{AddressCache, CacheKey, CachedAddress, NullCache};
pub use error::{AddressResult, AddressingError, ErrorContext, ParameterErrorKind};
pub use heading::{find_heading, heading_slugs, Heading};
pub use parser::{
    build_document_address, normalize_document_path, normalize_hierarchical_slug,
    split_section_ref, AddressParser,
};
pub use slug::{
    get_parent_slug, get_slug_depth, get_slug_leaf, is_descendant_slug, is_valid_slug_component,
    join_slug_path, slugify, split_slug_path, MAX_SLUG_DEPTH,
};
pub use task::{is_task_section, list_task_slugs, TASKS_SLUG};

/// Namespace derived from a document path, without full validation
///
/// Returns [`ROOT_NAMESPACE`] for top-level documents and for strings that
/// are not document paths at all.
#[must_use]
pub fn namespace_of(path: &str) -> String {
    let document = path.split_once('#').map_or(path, |(doc, _)| doc);
    build_document_address(document)
        .map(|doc| doc.namespace().to_string())
        .unwrap_or_else(|_| ROOT_NAMESPACE.to_string())
}

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with addresses
    pub use crate::{
        AddressCache, AddressParser, AddressingError, DocumentAddress, Heading, SectionAddress,
        TaskAddress,
    };
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespace_of_paths() {
        assert_eq!(namespace_of("/api/specs/auth.md"), "api/specs");
        assert_eq!(namespace_of("/api/auth.md#login"), "api");
        assert_eq!(namespace_of("/readme.md"), "root");
        assert_eq!(namespace_of("not a path"), "root");
    }
}
