//! Address validation against live documents
//!
//! [`AddressService`] is what tool handlers call: it parses user input,
//! confirms the target exists, and turns misses into structured errors with
//! recovery hints.

use crate::error::ResolveResult;
use mdref_address::{
    get_parent_slug, get_slug_leaf, is_task_section, list_task_slugs, AddressParser,
    AddressResult, AddressingError, DocumentAddress, ErrorContext, SectionAddress, TaskAddress,
};
use mdref_content::{ContentProvider, Document};
use std::sync::Arc;

/// Maximum slugs offered as "closest" suggestions
const MAX_SUGGESTIONS: usize = 5;

/// A document address whose document exists
#[derive(Debug, Clone)]
pub struct ResolvedDocument {
    /// Parsed address
    pub address: Arc<DocumentAddress>,
    /// Loaded document
    pub document: Document,
}

/// A section address whose section exists
#[derive(Debug, Clone)]
pub struct ResolvedSection {
    /// Parsed address
    pub address: Arc<SectionAddress>,
    /// Owning document
    pub document: Document,
}

/// A task address that is structurally a task
#[derive(Debug, Clone)]
pub struct ResolvedTask {
    /// Parsed address
    pub address: Arc<TaskAddress>,
    /// Owning document
    pub document: Document,
}

/// Parser plus existence checks
#[derive(Debug, Clone)]
pub struct AddressService {
    parser: AddressParser,
    provider: Arc<dyn ContentProvider>,
}

impl AddressService {
    /// Create service
    pub fn new(parser: AddressParser, provider: Arc<dyn ContentProvider>) -> Self {
        Self { parser, provider }
    }

    /// Underlying parser
    #[inline]
    #[must_use]
    pub fn parser(&self) -> &AddressParser {
        &self.parser
    }

    /// Parse a document address and load its document
    ///
    /// # Errors
    /// `InvalidAddress`, `DocumentNotFound` or a provider error.
    pub async fn resolve_document(&self, raw: &str) -> ResolveResult<ResolvedDocument> {
        let address = self.parser.parse_document_address(raw)?;
        let document = self.load(&address).await?;
        Ok(ResolvedDocument { address, document })
    }

    /// Parse a section address and confirm the section exists
    ///
    /// # Errors
    /// `InvalidAddress`, `DocumentNotFound`, `SectionNotFound` (with a
    /// suggestion) or a provider error.
    pub async fn resolve_section(
        &self,
        reference: &str,
        context: Option<&str>,
    ) -> ResolveResult<ResolvedSection> {
        let address = self.parser.parse_section_address(reference, context)?;
        let document = self.load(address.document()).await?;
        if !document.has_section(address.slug()) {
            return Err(section_not_found(address.slug(), &document).into());
        }
        Ok(ResolvedSection { address, document })
    }

    /// Parse a task address and confirm it names a task
    ///
    /// # Errors
    /// As [`Self::resolve_section`], plus `InvalidAddress` listing the real
    /// tasks when the section exists but is not a task.
    pub async fn resolve_task(
        &self,
        reference: &str,
        context: Option<&str>,
    ) -> ResolveResult<ResolvedTask> {
        let address = self.parser.parse_task_address(reference, context)?;
        let document = self.load(address.document()).await?;
        let slug = address.slug();

        if !document.has_section(slug) {
            return Err(section_not_found(slug, &document).into());
        }
        if !is_task_section(slug, &document.headings) {
            let tasks = list_task_slugs(&document.headings);
            return Err(AddressingError::InvalidAddress {
                message: format!("section '{slug}' is not a task"),
                context: ErrorContext::empty()
                    .add("value", address.full_path())
                    .with_alternatives(tasks),
            }
            .into());
        }

        Ok(ResolvedTask { address, document })
    }

    /// Forget every cached address of a document
    ///
    /// # Errors
    /// `InvalidAddress` if `path` is not a document path.
    pub fn invalidate_document(&self, path: &str) -> AddressResult<usize> {
        self.parser.invalidate_document(path)
    }

    async fn load(&self, address: &DocumentAddress) -> ResolveResult<Document> {
        self.provider
            .get_document(address.path())
            .await?
            .ok_or_else(|| AddressingError::document_not_found(address.path()).into())
    }
}

/// Build a `SectionNotFound` error with the best available hint
///
/// A hierarchical slug whose parent exists suggests the parent. Otherwise
/// slugs sharing the requested leaf are offered.
fn section_not_found(slug: &str, document: &Document) -> AddressingError {
    let available = document.slugs();

    let suggestion = get_parent_slug(slug)
        .filter(|parent| document.has_section(parent))
        .map(|parent| format!("did you mean the parent section '{parent}'?"))
        .or_else(|| {
            let leaf = get_slug_leaf(slug)?;
            let close: Vec<&str> = available
                .iter()
                .map(String::as_str)
                .filter(|candidate| candidate.contains(leaf) || leaf.contains(*candidate))
                .take(MAX_SUGGESTIONS)
                .collect();
            (!close.is_empty()).then(|| format!("closest sections: {}", close.join(", ")))
        });

    AddressingError::section_not_found(slug, document.path(), available, suggestion)
}
