//! Address parsing
//!
//! Pure normalization functions plus [`AddressParser`], which fronts them
//! with an injected [`AddressCache`].
//!
//! # Accepted forms
//!
//! | Input | Meaning |
//! |---|---|
//! | `/doc.md` | document |
//! | `slug` | section, needs a context document |
//! | `#slug` | section, needs a context document |
//! | `/doc.md#slug` | fully qualified section |
//! | `a/b/c` as slug | hierarchical section, depth 3 |

use crate::address::{DocumentAddress, SectionAddress, TaskAddress, DOCUMENT_EXTENSION};
use crate::cache::{AddressCache, NullCache};
use crate::error::{AddressResult, AddressingError, ErrorContext, ParameterErrorKind};
use crate::slug::{is_valid_slug_component, split_slug_path, MAX_SLUG_DEPTH};
use serde_json::Value;
use std::sync::Arc;

/// Canonicalize a raw document path
///
/// Trims whitespace, prefixes `/`, collapses repeated separators, and
/// rejects relative segments, missing extensions and empty file names.
///
/// # Errors
/// `InvalidAddress` when the input cannot name a document.
pub fn normalize_document_path(raw: &str) -> AddressResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AddressingError::invalid(raw, "document path cannot be empty"));
    }

    let segments: Vec<&str> = trimmed.split('/').filter(|s| !s.is_empty()).collect();
    if segments.iter().any(|s| *s == "." || *s == "..") {
        return Err(AddressingError::invalid(
            raw,
            "document path must not contain relative segments",
        ));
    }

    let path = format!("/{}", segments.join("/"));
    if !path.ends_with(DOCUMENT_EXTENSION) || trimmed.ends_with('/') {
        return Err(AddressingError::invalid(
            raw,
            format!("document path must end with {DOCUMENT_EXTENSION}"),
        ));
    }

    let file = segments.last().copied().unwrap_or_default();
    if file.len() == DOCUMENT_EXTENSION.len() {
        return Err(AddressingError::invalid(raw, "document path must have a file name"));
    }

    Ok(path)
}

/// Build a document address from raw input, bypassing any cache
///
/// # Errors
/// `InvalidAddress` when the path is malformed.
pub fn build_document_address(raw: &str) -> AddressResult<DocumentAddress> {
    normalize_document_path(raw).map(DocumentAddress::from_canonical)
}

/// Normalize a section slug
///
/// Strips leading `#`, collapses repeated `/`, and for hierarchical slugs
/// validates every component and the depth limit.
///
/// # Errors
/// `InvalidAddress` for empty slugs, an empty final component, illegal
/// component characters, or more than [`MAX_SLUG_DEPTH`] components.
pub fn normalize_hierarchical_slug(raw: &str) -> AddressResult<String> {
    let slug = raw.trim().trim_start_matches('#');

    if !slug.contains('/') {
        if slug.is_empty() {
            return Err(AddressingError::invalid(raw, "section slug cannot be empty"));
        }
        return Ok(slug.to_string());
    }

    if slug.ends_with('/') {
        return Err(AddressingError::invalid(raw, "hierarchical slug has an empty final component"));
    }

    let components = split_slug_path(slug);
    if components.is_empty() {
        return Err(AddressingError::invalid(raw, "section slug cannot be empty"));
    }
    if components.len() > MAX_SLUG_DEPTH {
        return Err(AddressingError::InvalidAddress {
            message: format!("hierarchical slug is deeper than {MAX_SLUG_DEPTH} levels"),
            context: ErrorContext::empty()
                .add("value", raw)
                .add("depth", components.len().to_string()),
        });
    }
    if let Some(bad) = components.iter().find(|c| !is_valid_slug_component(c)) {
        return Err(AddressingError::InvalidAddress {
            message: format!(
                "slug component '{bad}' must be lowercase letters, digits and single hyphens"
            ),
            context: ErrorContext::empty()
                .add("value", raw)
                .add("component", *bad),
        });
    }

    Ok(components.join("/"))
}

/// Split a section reference into its document part and slug part
///
/// Only the first `#` separates document from slug. When the document
/// part is absent or empty the context document is used.
///
/// # Errors
/// `InvalidAddress` for empty references or a missing required context.
pub fn split_section_ref<'a>(
    reference: &'a str,
    context: Option<&'a str>,
) -> AddressResult<(&'a str, &'a str)> {
    let trimmed = reference.trim();
    if trimmed.is_empty() {
        return Err(AddressingError::invalid(reference, "section reference cannot be empty"));
    }

    let (document, slug) = match trimmed.split_once('#') {
        Some((doc, slug)) if !doc.trim().is_empty() => (Some(doc), slug),
        Some((_, slug)) => (None, slug),
        None => (None, trimmed),
    };

    match document.or(context) {
        Some(doc) => Ok((doc, slug)),
        None => Err(AddressingError::invalid(
            reference,
            "section reference requires a context document",
        )),
    }
}

/// Parser for document, section and task addresses
///
/// Every successful parse is stored in the injected cache under the raw
/// input; a repeated raw string returns the cached value without
/// re-validating.
#[derive(Debug, Clone)]
pub struct AddressParser {
    cache: Arc<dyn AddressCache>,
}

impl AddressParser {
    /// Create parser over a shared cache
    #[inline]
    #[must_use]
    pub fn new(cache: Arc<dyn AddressCache>) -> Self {
        Self { cache }
    }

    /// Create parser that caches nothing
    #[inline]
    #[must_use]
    pub fn uncached() -> Self {
        Self::new(Arc::new(NullCache))
    }

    /// The cache backing this parser
    #[inline]
    #[must_use]
    pub fn cache(&self) -> &Arc<dyn AddressCache> {
        &self.cache
    }

    /// Parse a document address
    ///
    /// # Errors
    /// `InvalidAddress` when the path is malformed.
    pub fn parse_document_address(&self, raw: &str) -> AddressResult<Arc<DocumentAddress>> {
        if let Some(cached) = self.cache.get_document(raw) {
            tracing::trace!(raw, "document address cache hit");
            return Ok(cached);
        }

        let address = Arc::new(build_document_address(raw)?);
        tracing::debug!(raw, path = address.path(), "parsed document address");
        self.cache.set_document(raw, Arc::clone(&address));
        Ok(address)
    }

    /// Parse a section address
    ///
    /// # Errors
    /// `InvalidAddress` for malformed documents or slugs, or when a bare
    /// slug is given without `context`.
    pub fn parse_section_address(
        &self,
        reference: &str,
        context: Option<&str>,
    ) -> AddressResult<Arc<SectionAddress>> {
        if let Some(cached) = self.cache.get_section(reference, context) {
            tracing::trace!(reference, "section address cache hit");
            return Ok(cached);
        }

        let (doc_part, slug_part) = split_section_ref(reference, context)?;
        let document = self
            .parse_document_address(doc_part)
            .map_err(|e| e.with_context("reference", reference))?;
        let slug = normalize_hierarchical_slug(slug_part)
            .map_err(|e| e.with_context("reference", reference))?;

        let address = Arc::new(SectionAddress::new(document, slug));
        tracing::debug!(reference, full_path = address.full_path(), "parsed section address");
        self.cache.set_section(reference, context, Arc::clone(&address));
        Ok(address)
    }

    /// Parse a task address
    ///
    /// Accepts the same forms as [`Self::parse_section_address`]. The result
    /// is cached separately from the plain section form.
    ///
    /// # Errors
    /// Same as [`Self::parse_section_address`].
    pub fn parse_task_address(
        &self,
        reference: &str,
        context: Option<&str>,
    ) -> AddressResult<Arc<TaskAddress>> {
        if let Some(cached) = self.cache.get_task(reference, context) {
            return Ok(cached);
        }

        let section = self.parse_section_address(reference, context)?;
        let address = Arc::new(TaskAddress::new(SectionAddress::clone(&section)));
        self.cache.set_task(reference, context, Arc::clone(&address));
        Ok(address)
    }

    /// Parse a document address from a JSON tool argument
    ///
    /// # Errors
    /// `InvalidAddress` when the value is not a string or is malformed.
    pub fn parse_document_value(&self, value: &Value) -> AddressResult<Arc<DocumentAddress>> {
        match value {
            Value::String(raw) => self.parse_document_address(raw),
            other => Err(AddressingError::invalid(
                other.to_string(),
                "document path must be a string",
            )),
        }
    }

    /// Parse one or many document addresses from a JSON tool argument
    ///
    /// Accepts a single string or an array of at most `max_items` strings.
    ///
    /// # Errors
    /// `ADDRESSING_ERROR` with sub-code `MISSING`, `EMPTY`, `TOO_MANY_ITEMS`
    /// or `WRONG_TYPE`; `InvalidAddress` for any malformed entry.
    pub fn parse_document_list(
        &self,
        value: &Value,
        max_items: usize,
    ) -> AddressResult<Vec<Arc<DocumentAddress>>> {
        match value {
            Value::String(raw) => Ok(vec![self.parse_document_address(raw)?]),
            Value::Array(items) => {
                if items.is_empty() {
                    return Err(AddressingError::parameter(
                        ParameterErrorKind::Empty,
                        "document list cannot be empty",
                    ));
                }
                if items.len() > max_items {
                    return Err(AddressingError::parameter(
                        ParameterErrorKind::TooManyItems,
                        format!("at most {max_items} documents per request, got {}", items.len()),
                    )
                    .with_context("count", items.len().to_string())
                    .with_context("max", max_items.to_string()));
                }
                items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| match item {
                        Value::String(raw) => self.parse_document_address(raw),
                        other => Err(AddressingError::parameter(
                            ParameterErrorKind::WrongType,
                            format!("document entry {index} must be a string"),
                        )
                        .with_context("index", index.to_string())
                        .with_context("value", other.to_string())),
                    })
                    .collect()
            }
            Value::Null => Err(AddressingError::parameter(
                ParameterErrorKind::Missing,
                "document parameter is required",
            )),
            other => Err(AddressingError::parameter(
                ParameterErrorKind::WrongType,
                "document parameter must be a string or an array of strings",
            )
            .with_context("value", other.to_string())),
        }
    }

    /// Invalidate every cached address owned by a document
    ///
    /// # Errors
    /// `InvalidAddress` when `raw_path` is not a document path.
    pub fn invalidate_document(&self, raw_path: &str) -> AddressResult<usize> {
        let path = normalize_document_path(raw_path)?;
        let removed = self.cache.invalidate_document(&path);
        tracing::debug!(path = path.as_str(), removed, "invalidated cached addresses");
        Ok(removed)
    }
}

impl Default for AddressParser {
    fn default() -> Self {
        Self::uncached()
    }
}
