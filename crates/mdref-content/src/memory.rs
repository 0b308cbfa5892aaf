//! In-memory content provider

use crate::document::{Document, FingerprintEntry};
use crate::error::ProviderResult;
use crate::markdown::ParsedDocument;
use crate::provider::ContentProvider;
use async_trait::async_trait;
use dashmap::DashMap;
use mdref_address::normalize_document_path;
use std::sync::Arc;

/// Content provider backed by a concurrent map of parsed documents
///
/// Keys are canonical document paths, so `api/auth.md` and `/api/auth.md`
/// address the same entry.
#[derive(Debug, Default)]
pub struct MemoryContentProvider {
    documents: DashMap<String, Arc<ParsedDocument>>,
}

impl MemoryContentProvider {
    /// Create empty provider
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and store a document, replacing any previous version
    ///
    /// # Errors
    /// Returns error if the path is invalid or the frontmatter is malformed.
    pub fn insert(&self, path: &str, source: impl Into<String>) -> ProviderResult<()> {
        let parsed = ParsedDocument::parse(path, source)?;
        let key = parsed.document().path().to_string();
        tracing::debug!(path = key.as_str(), "stored document");
        self.documents.insert(key, Arc::new(parsed));
        Ok(())
    }

    /// Builder-style [`insert`](Self::insert)
    ///
    /// # Errors
    /// Same as [`insert`](Self::insert).
    pub fn with_document(self, path: &str, source: impl Into<String>) -> ProviderResult<Self> {
        self.insert(path, source)?;
        Ok(self)
    }

    /// Remove a document, returning whether it existed
    pub fn remove(&self, path: &str) -> bool {
        normalize_document_path(path)
            .map(|key| self.documents.remove(&key).is_some())
            .unwrap_or(false)
    }

    /// Number of stored documents
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no documents are stored
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    fn lookup(&self, path: &str) -> ProviderResult<Option<Arc<ParsedDocument>>> {
        let key = normalize_document_path(path)?;
        Ok(self.documents.get(&key).map(|entry| Arc::clone(entry.value())))
    }
}

#[async_trait]
impl ContentProvider for MemoryContentProvider {
    async fn get_document(&self, path: &str) -> ProviderResult<Option<Document>> {
        Ok(self.lookup(path)?.map(|parsed| parsed.document().clone()))
    }

    async fn get_section_content(&self, path: &str, slug: &str) -> ProviderResult<Option<String>> {
        Ok(self
            .lookup(path)?
            .and_then(|parsed| parsed.section_content(slug).map(str::to_string)))
    }

    async fn read_document_content(&self, path: &str) -> ProviderResult<Option<String>> {
        Ok(self.lookup(path)?.map(|parsed| parsed.content().to_string()))
    }

    async fn list_document_fingerprints(&self) -> ProviderResult<Vec<FingerprintEntry>> {
        let mut entries: Vec<FingerprintEntry> = self
            .documents
            .iter()
            .map(|entry| entry.value().document().fingerprint())
            .collect();
        entries.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(entries)
    }
}
