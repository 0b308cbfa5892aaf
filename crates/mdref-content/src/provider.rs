//! Content provider interface

use crate::document::{Document, FingerprintEntry};
use crate::error::ProviderResult;
use async_trait::async_trait;
use std::fmt::Debug;

/// Source of document metadata and content
///
/// Every lookup returns `Ok(None)` when the document or section does not
/// exist. `Err` is reserved for failures of the backend itself.
#[async_trait]
pub trait ContentProvider: Send + Sync + Debug {
    /// Metadata and heading outline of a document
    async fn get_document(&self, path: &str) -> ProviderResult<Option<Document>>;

    /// Content of one section, heading line included
    async fn get_section_content(&self, path: &str, slug: &str) -> ProviderResult<Option<String>>;

    /// Whole document source
    async fn read_document_content(&self, path: &str) -> ProviderResult<Option<String>>;

    /// Fingerprints of every known document
    ///
    /// Providers that cannot enumerate their documents return an empty list.
    async fn list_document_fingerprints(&self) -> ProviderResult<Vec<FingerprintEntry>> {
        Ok(Vec::new())
    }
}
