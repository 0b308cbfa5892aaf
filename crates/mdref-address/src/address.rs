//! Address value types
//!
//! Addresses are immutable once constructed. They are created by the parser
//! (see [`crate::parser`]) and shared through `Arc` so the cache and every
//! consumer hold the same instance.

use serde::Serialize;
use std::fmt::{self, Display, Formatter};
use std::ops::Deref;
use std::sync::Arc;

/// File extension every document path must carry
pub const DOCUMENT_EXTENSION: &str = ".md";

/// Namespace of documents that live directly under `/`
pub const ROOT_NAMESPACE: &str = "root";

/// Prefix distinguishing task cache keys from section cache keys
pub const TASK_KEY_PREFIX: &str = "task:";

/// Address of a whole document
///
/// # Examples
/// `/api/specs/auth.md` → slug `auth`, namespace `api/specs`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct DocumentAddress {
    path: String,
    slug: String,
    namespace: String,
    normalized_path: String,
    cache_key: String,
}

impl DocumentAddress {
    /// Build from an already-validated canonical path
    ///
    /// The path must be `/`-rooted and end with [`DOCUMENT_EXTENSION`];
    /// use [`crate::parser::build_document_address`] for raw input.
    pub(crate) fn from_canonical(path: String) -> Self {
        let (folder, file) = match path.rfind('/') {
            Some(idx) => (&path[1..idx.max(1)], &path[idx + 1..]),
            None => ("", path.as_str()),
        };
        let slug = file
            .strip_suffix(DOCUMENT_EXTENSION)
            .unwrap_or(file)
            .to_string();
        let namespace = if folder.is_empty() {
            ROOT_NAMESPACE.to_string()
        } else {
            folder.to_string()
        };
        let normalized_path = path
            .strip_suffix(DOCUMENT_EXTENSION)
            .unwrap_or(&path)
            .to_string();

        Self {
            cache_key: path.clone(),
            path,
            slug,
            namespace,
            normalized_path,
        }
    }

    /// Canonical `/`-rooted path including extension
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// File name without extension
    #[inline]
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Folder path, or [`ROOT_NAMESPACE`]
    #[inline]
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Path without the document extension
    #[inline]
    #[must_use]
    pub fn normalized_path(&self) -> &str {
        &self.normalized_path
    }

    /// Key under which this address is cached
    #[inline]
    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }
}

impl Display for DocumentAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path)
    }
}

/// Address of a section inside a document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SectionAddress {
    document: Arc<DocumentAddress>,
    slug: String,
    full_path: String,
    cache_key: String,
}

impl SectionAddress {
    /// Build from a document and an already-normalized slug
    pub(crate) fn new(document: Arc<DocumentAddress>, slug: String) -> Self {
        let full_path = format!("{}#{}", document.path(), slug);
        Self {
            cache_key: full_path.clone(),
            document,
            slug,
            full_path,
        }
    }

    /// Owning document
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Arc<DocumentAddress> {
        &self.document
    }

    /// Normalized slug, never starting with `#`
    #[inline]
    #[must_use]
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// `{document.path}#{slug}`
    #[inline]
    #[must_use]
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// Key under which this address is cached
    #[inline]
    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }

    /// Whether the slug has more than one component
    #[inline]
    #[must_use]
    pub fn is_hierarchical(&self) -> bool {
        self.slug.contains('/')
    }

    /// Number of slug components
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        crate::slug::get_slug_depth(&self.slug)
    }
}

impl Display for SectionAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path)
    }
}

/// Address of a task
///
/// A task is a section that is an immediate child of a section slugged
/// `tasks`. Its path and slug coincide with the wrapped section; only the
/// cache key differs so both forms can be cached side by side.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct TaskAddress {
    #[serde(flatten)]
    section: SectionAddress,
    is_task: bool,
    cache_key: String,
}

impl TaskAddress {
    /// Wrap a section address as a task
    #[must_use]
    pub fn new(section: SectionAddress) -> Self {
        let cache_key = format!("{TASK_KEY_PREFIX}{}", section.cache_key());
        Self {
            section,
            is_task: true,
            cache_key,
        }
    }

    /// Underlying section address
    #[inline]
    #[must_use]
    pub fn section(&self) -> &SectionAddress {
        &self.section
    }

    /// Always `true`
    #[inline]
    #[must_use]
    pub fn is_task(&self) -> bool {
        self.is_task
    }

    /// `task:`-prefixed cache key
    #[inline]
    #[must_use]
    pub fn cache_key(&self) -> &str {
        &self.cache_key
    }
}

impl Deref for TaskAddress {
    type Target = SectionAddress;

    fn deref(&self) -> &Self::Target {
        &self.section
    }
}

impl Display for TaskAddress {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.section)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_fields_from_nested_path() {
        let doc = DocumentAddress::from_canonical("/api/specs/auth.md".to_string());
        assert_eq!(doc.path(), "/api/specs/auth.md");
        assert_eq!(doc.slug(), "auth");
        assert_eq!(doc.namespace(), "api/specs");
        assert_eq!(doc.normalized_path(), "/api/specs/auth");
        assert_eq!(doc.cache_key(), "/api/specs/auth.md");
    }

    #[test]
    fn document_at_root_uses_root_namespace() {
        let doc = DocumentAddress::from_canonical("/readme.md".to_string());
        assert_eq!(doc.namespace(), ROOT_NAMESPACE);
        assert_eq!(doc.slug(), "readme");
    }

    #[test]
    fn section_full_path_and_key() {
        let doc = Arc::new(DocumentAddress::from_canonical("/guide.md".to_string()));
        let section = SectionAddress::new(Arc::clone(&doc), "setup/install".to_string());
        assert_eq!(section.full_path(), "/guide.md#setup/install");
        assert_eq!(section.cache_key(), "/guide.md#setup/install");
        assert!(section.is_hierarchical());
        assert_eq!(section.depth(), 2);
        assert!(Arc::ptr_eq(section.document(), &doc));
    }

    #[test]
    fn task_key_is_prefixed() {
        let doc = Arc::new(DocumentAddress::from_canonical("/plan.md".to_string()));
        let section = SectionAddress::new(doc, "write-tests".to_string());
        let task = TaskAddress::new(section.clone());
        assert!(task.is_task());
        assert_eq!(task.cache_key(), "task:/plan.md#write-tests");
        assert_eq!(task.full_path(), section.full_path());
        assert_ne!(task.cache_key(), section.cache_key());
    }

    #[test]
    fn task_serializes_flat() {
        let doc = Arc::new(DocumentAddress::from_canonical("/plan.md".to_string()));
        let task = TaskAddress::new(SectionAddress::new(doc, "deploy".to_string()));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["slug"], "deploy");
        assert_eq!(json["is_task"], true);
        assert_eq!(json["document"]["namespace"], "root");
    }
}
