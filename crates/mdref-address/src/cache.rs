//! Address cache interface
//!
//! The parser consults an [`AddressCache`] before validating input. Concrete
//! strategies (persistent LRU, batch-scoped) live in the `mdref-cache` crate;
//! this module only defines the keys, values and contract they share.

use crate::address::{DocumentAddress, SectionAddress, TaskAddress};
use std::fmt::Debug;
use std::sync::Arc;

/// Cache key
///
/// Keys use the raw caller input, so `"a.md"` and `"/a.md"` occupy separate
/// slots even though they parse to equal addresses. Section and task keys
/// include the context document because a bare slug resolves differently
/// under different documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Raw document string
    Document(String),
    /// Raw section reference plus context document
    Section {
        /// Raw reference as supplied
        raw: String,
        /// Context document path as supplied
        context: Option<String>,
    },
    /// Raw task reference plus context document
    Task {
        /// Raw reference as supplied
        raw: String,
        /// Context document path as supplied
        context: Option<String>,
    },
}

impl CacheKey {
    /// Key for a document lookup
    #[inline]
    pub fn document(raw: impl Into<String>) -> Self {
        Self::Document(raw.into())
    }

    /// Key for a section lookup
    #[inline]
    pub fn section(raw: impl Into<String>, context: Option<&str>) -> Self {
        Self::Section {
            raw: raw.into(),
            context: context.map(str::to_string),
        }
    }

    /// Key for a task lookup
    #[inline]
    pub fn task(raw: impl Into<String>, context: Option<&str>) -> Self {
        Self::Task {
            raw: raw.into(),
            context: context.map(str::to_string),
        }
    }
}

/// A cached address of any kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CachedAddress {
    /// Document address
    Document(Arc<DocumentAddress>),
    /// Section address
    Section(Arc<SectionAddress>),
    /// Task address
    Task(Arc<TaskAddress>),
}

impl CachedAddress {
    /// Path of the document this address belongs to
    #[must_use]
    pub fn owning_document_path(&self) -> &str {
        match self {
            Self::Document(doc) => doc.path(),
            Self::Section(section) => section.document().path(),
            Self::Task(task) => task.document().path(),
        }
    }

    /// The address's own cache key
    #[must_use]
    pub fn cache_key(&self) -> &str {
        match self {
            Self::Document(doc) => doc.cache_key(),
            Self::Section(section) => section.cache_key(),
            Self::Task(task) => task.cache_key(),
        }
    }
}

/// Shared store of parsed addresses
///
/// Entries are immutable; only eviction, invalidation and clearing change
/// the key space. The cache has no notion of freshness: whoever mutates a
/// document must call [`AddressCache::invalidate_document`].
pub trait AddressCache: Send + Sync + Debug {
    /// Look up an entry
    fn get(&self, key: &CacheKey) -> Option<CachedAddress>;

    /// Store an entry
    fn set(&self, key: CacheKey, value: CachedAddress);

    /// Drop the document entry for `path` and every section or task entry
    /// owned by it. Returns the number of entries removed.
    fn invalidate_document(&self, path: &str) -> usize;

    /// Drop everything
    fn clear(&self);

    /// Current number of entries
    fn len(&self) -> usize;

    /// Whether the cache holds no entries
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cached document address for a raw string
    fn get_document(&self, raw: &str) -> Option<Arc<DocumentAddress>> {
        match self.get(&CacheKey::document(raw))? {
            CachedAddress::Document(doc) => Some(doc),
            _ => None,
        }
    }

    /// Cache a document address under a raw string
    fn set_document(&self, raw: &str, address: Arc<DocumentAddress>) {
        self.set(CacheKey::document(raw), CachedAddress::Document(address));
    }

    /// Cached section address for a raw reference and context
    fn get_section(&self, raw: &str, context: Option<&str>) -> Option<Arc<SectionAddress>> {
        match self.get(&CacheKey::section(raw, context))? {
            CachedAddress::Section(section) => Some(section),
            _ => None,
        }
    }

    /// Cache a section address
    fn set_section(&self, raw: &str, context: Option<&str>, address: Arc<SectionAddress>) {
        self.set(
            CacheKey::section(raw, context),
            CachedAddress::Section(address),
        );
    }

    /// Cached task address for a raw reference and context
    fn get_task(&self, raw: &str, context: Option<&str>) -> Option<Arc<TaskAddress>> {
        match self.get(&CacheKey::task(raw, context))? {
            CachedAddress::Task(task) => Some(task),
            _ => None,
        }
    }

    /// Cache a task address
    fn set_task(&self, raw: &str, context: Option<&str>, address: Arc<TaskAddress>) {
        self.set(CacheKey::task(raw, context), CachedAddress::Task(address));
    }
}

/// Cache that stores nothing
///
/// Used when callers want pure parsing with no shared state.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCache;

impl AddressCache for NullCache {
    fn get(&self, _key: &CacheKey) -> Option<CachedAddress> {
        None
    }

    fn set(&self, _key: CacheKey, _value: CachedAddress) {}

    fn invalidate_document(&self, _path: &str) -> usize {
        0
    }

    fn clear(&self) {}

    fn len(&self) -> usize {
        0
    }
}
