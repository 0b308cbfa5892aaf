//! Filesystem content provider
//!
//! Serves documents from a directory tree. A document path `/a/b.md` maps
//! to `<root>/a/b.md`. Parsed documents are cached with moka until
//! [`FsContentProvider::invalidate`] is called for them.

use crate::document::{Document, FingerprintEntry};
use crate::error::{ProviderError, ProviderResult};
use crate::markdown::ParsedDocument;
use crate::provider::ContentProvider;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mdref_address::{normalize_document_path, DOCUMENT_EXTENSION};
use moka::future::Cache;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Default number of parsed documents kept in memory
pub const DEFAULT_PARSE_CACHE_CAPACITY: u64 = 512;

/// Content provider reading markdown files below a root directory
#[derive(Debug, Clone)]
pub struct FsContentProvider {
    root: PathBuf,
    parsed: Cache<String, Arc<ParsedDocument>>,
}

impl FsContentProvider {
    /// Create provider for `root` with the default parse cache
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_capacity(root, DEFAULT_PARSE_CACHE_CAPACITY)
    }

    /// Create provider with a custom parse cache capacity
    pub fn with_capacity(root: impl Into<PathBuf>, capacity: u64) -> Self {
        Self {
            root: root.into(),
            parsed: Cache::new(capacity),
        }
    }

    /// Root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Drop the cached parse of a document
    ///
    /// # Errors
    /// Returns error if `path` is not a valid document path.
    pub async fn invalidate(&self, path: &str) -> ProviderResult<()> {
        let key = normalize_document_path(path)?;
        self.parsed.invalidate(&key).await;
        tracing::debug!(path = key.as_str(), "invalidated parsed document");
        Ok(())
    }

    /// Drop every cached parse
    pub fn invalidate_all(&self) {
        self.parsed.invalidate_all();
    }

    fn file_for(&self, canonical: &str) -> PathBuf {
        self.root.join(canonical.trim_start_matches('/'))
    }

    async fn load(&self, path: &str) -> ProviderResult<Option<Arc<ParsedDocument>>> {
        let key = normalize_document_path(path)?;
        if let Some(hit) = self.parsed.get(&key).await {
            return Ok(Some(hit));
        }

        let file = self.file_for(&key);
        let source = match tokio::fs::read_to_string(&file).await {
            Ok(source) => source,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ProviderError::io_error(file, e)),
        };
        let modified = tokio::fs::metadata(&file)
            .await
            .and_then(|meta| meta.modified())
            .ok()
            .map(DateTime::<Utc>::from);

        let parsed = Arc::new(ParsedDocument::parse(&key, source)?.with_last_modified(modified));
        self.parsed.insert(key.clone(), Arc::clone(&parsed)).await;
        tracing::debug!(path = key.as_str(), file = %file.display(), "loaded document from disk");

        Ok(Some(parsed))
    }

    /// Canonical paths of every markdown file below the root, sorted
    ///
    /// # Errors
    /// Returns error if a directory cannot be read.
    pub async fn list_document_paths(&self) -> ProviderResult<Vec<String>> {
        let mut paths = Vec::new();
        let mut pending = vec![self.root.clone()];

        while let Some(dir) = pending.pop() {
            let mut entries = tokio::fs::read_dir(&dir)
                .await
                .map_err(|e| ProviderError::io_error(&dir, e))?;
            while let Some(entry) = entries
                .next_entry()
                .await
                .map_err(|e| ProviderError::io_error(&dir, e))?
            {
                let path = entry.path();
                let file_type = entry
                    .file_type()
                    .await
                    .map_err(|e| ProviderError::io_error(&path, e))?;
                if file_type.is_dir() {
                    pending.push(path);
                } else if let Some(doc_path) = self.document_path_of(&path) {
                    paths.push(doc_path);
                }
            }
        }

        paths.sort();
        Ok(paths)
    }

    fn document_path_of(&self, file: &Path) -> Option<String> {
        let relative = file.strip_prefix(&self.root).ok()?;
        let joined = relative
            .components()
            .map(|c| c.as_os_str().to_str())
            .collect::<Option<Vec<_>>>()?
            .join("/");
        if !joined.ends_with(DOCUMENT_EXTENSION) {
            return None;
        }
        normalize_document_path(&joined).ok()
    }
}

#[async_trait]
impl ContentProvider for FsContentProvider {
    async fn get_document(&self, path: &str) -> ProviderResult<Option<Document>> {
        Ok(self.load(path).await?.map(|parsed| parsed.document().clone()))
    }

    async fn get_section_content(&self, path: &str, slug: &str) -> ProviderResult<Option<String>> {
        Ok(self
            .load(path)
            .await?
            .and_then(|parsed| parsed.section_content(slug).map(str::to_string)))
    }

    async fn read_document_content(&self, path: &str) -> ProviderResult<Option<String>> {
        Ok(self.load(path).await?.map(|parsed| parsed.content().to_string()))
    }

    async fn list_document_fingerprints(&self) -> ProviderResult<Vec<FingerprintEntry>> {
        let mut entries = Vec::new();
        for path in self.list_document_paths().await? {
            match self.load(&path).await {
                Ok(Some(parsed)) => entries.push(parsed.document().fingerprint()),
                Ok(None) => {}
                Err(e) => tracing::warn!(path = path.as_str(), error = %e, "skipping unreadable document"),
            }
        }
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn fixture() -> (TempDir, FsContentProvider) {
        let dir = TempDir::new().unwrap();
        tokio::fs::create_dir_all(dir.path().join("api")).await.unwrap();
        tokio::fs::write(dir.path().join("api/auth.md"), "# Auth\n\n## Login\n\nPOST\n")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("readme.md"), "# Readme\n\n@/api/auth.md\n")
            .await
            .unwrap();
        tokio::fs::write(dir.path().join("notes.txt"), "not markdown").await.unwrap();
        let provider = FsContentProvider::new(dir.path());
        (dir, provider)
    }

    #[tokio::test]
    async fn reads_documents_and_sections() {
        let (_dir, provider) = fixture().await;
        let doc = provider.get_document("/api/auth.md").await.unwrap().unwrap();
        assert_eq!(doc.title(), "Auth");
        assert!(doc.metadata.last_modified.is_some());

        let login = provider
            .get_section_content("api/auth.md", "login")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(login, "## Login\n\nPOST");
    }

    #[tokio::test]
    async fn missing_file_is_none() {
        let (_dir, provider) = fixture().await;
        assert!(provider.get_document("/missing.md").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cached_until_invalidated() {
        let (dir, provider) = fixture().await;
        let before = provider.read_document_content("/readme.md").await.unwrap().unwrap();

        tokio::fs::write(dir.path().join("readme.md"), "# Changed\n").await.unwrap();
        let stale = provider.read_document_content("/readme.md").await.unwrap().unwrap();
        assert_eq!(before, stale);

        provider.invalidate("readme.md").await.unwrap();
        let fresh = provider.read_document_content("/readme.md").await.unwrap().unwrap();
        assert_eq!(fresh, "# Changed\n");
    }

    #[tokio::test]
    async fn lists_markdown_files_only() {
        let (_dir, provider) = fixture().await;
        let paths = provider.list_document_paths().await.unwrap();
        assert_eq!(paths, vec!["/api/auth.md", "/readme.md"]);

        let fps = provider.list_document_fingerprints().await.unwrap();
        assert_eq!(fps.len(), 2);
        assert_eq!(fps[0].namespace, "api");
    }
}
