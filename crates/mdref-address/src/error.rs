//! Error taxonomy for addressing
//!
//! Every failure surfaced to a tool handler falls into one of four kinds:
//! - `INVALID_ADDRESS`: the textual address is malformed
//! - `DOCUMENT_NOT_FOUND`: the address is valid but no such document exists
//! - `SECTION_NOT_FOUND`: the document exists but the section does not
//! - `ADDRESSING_ERROR`: a tool parameter had the wrong shape

use serde::Serialize;
use serde_json::{json, Value};

/// Structured payload attached to every addressing error
///
/// Carries the offending value plus any alternatives the caller could have
/// used instead, so tool handlers can render actionable messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ErrorContext {
    /// Ordered key/value pairs
    pub entries: Vec<(String, String)>,
    /// Valid alternatives (section slugs, task slugs, ...)
    pub alternatives: Vec<String>,
}

impl ErrorContext {
    /// Create empty context
    #[inline]
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add context entry
    #[inline]
    #[must_use]
    pub fn add(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Attach valid alternatives
    #[inline]
    #[must_use]
    pub fn with_alternatives(mut self, alternatives: Vec<String>) -> Self {
        self.alternatives = alternatives;
        self
    }

    /// Look up an entry by key
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (key, value) in &self.entries {
            map.insert(key.clone(), Value::String(value.clone()));
        }
        if !self.alternatives.is_empty() {
            map.insert("alternatives".to_string(), json!(self.alternatives));
        }
        Value::Object(map)
    }
}

/// Sub-codes for parameter validation failures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ParameterErrorKind {
    /// Value had the wrong JSON type
    WrongType,
    /// More items than the operation accepts
    TooManyItems,
    /// Empty list or empty string where content was required
    Empty,
    /// Required parameter absent
    Missing,
}

impl ParameterErrorKind {
    /// Machine-readable sub-code
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::WrongType => "WRONG_TYPE",
            Self::TooManyItems => "TOO_MANY_ITEMS",
            Self::Empty => "EMPTY",
            Self::Missing => "MISSING",
        }
    }
}

/// Addressing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressingError {
    /// Malformed textual address
    #[error("invalid address: {message}")]
    InvalidAddress {
        /// Human-readable reason
        message: String,
        /// Offending value and alternatives
        context: ErrorContext,
    },

    /// Address is valid but the document does not exist
    #[error("document not found: {path}")]
    DocumentNotFound {
        /// Normalized document path
        path: String,
        /// Additional context
        context: ErrorContext,
    },

    /// Document exists but the section does not
    #[error("section not found: {slug} in {document}")]
    SectionNotFound {
        /// Requested section slug
        slug: String,
        /// Owning document path
        document: String,
        /// Recovery hint, e.g. the parent section
        suggestion: Option<String>,
        /// Available slugs and other context
        context: ErrorContext,
    },

    /// Tool parameter validation failure
    #[error("{kind:?}: {message}")]
    Parameter {
        /// Sub-code
        kind: ParameterErrorKind,
        /// Human-readable reason
        message: String,
        /// Additional context
        context: ErrorContext,
    },
}

impl AddressingError {
    /// Create invalid address error for the given raw input
    pub fn invalid(value: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidAddress {
            message: message.into(),
            context: ErrorContext::empty().add("value", value),
        }
    }

    /// Create document-not-found error
    pub fn document_not_found(path: impl Into<String>) -> Self {
        let path = path.into();
        Self::DocumentNotFound {
            context: ErrorContext::empty().add("path", path.clone()),
            path,
        }
    }

    /// Create section-not-found error
    pub fn section_not_found(
        slug: impl Into<String>,
        document: impl Into<String>,
        available: Vec<String>,
        suggestion: Option<String>,
    ) -> Self {
        let slug = slug.into();
        let document = document.into();
        Self::SectionNotFound {
            context: ErrorContext::empty()
                .add("slug", slug.clone())
                .add("document", document.clone())
                .with_alternatives(available),
            slug,
            document,
            suggestion,
        }
    }

    /// Create parameter validation error
    pub fn parameter(kind: ParameterErrorKind, message: impl Into<String>) -> Self {
        Self::Parameter {
            kind,
            message: message.into(),
            context: ErrorContext::empty(),
        }
    }

    /// Machine-readable error code
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidAddress { .. } => "INVALID_ADDRESS",
            Self::DocumentNotFound { .. } => "DOCUMENT_NOT_FOUND",
            Self::SectionNotFound { .. } => "SECTION_NOT_FOUND",
            Self::Parameter { .. } => "ADDRESSING_ERROR",
        }
    }

    /// Sub-code for parameter errors
    #[must_use]
    pub const fn sub_code(&self) -> Option<&'static str> {
        match self {
            Self::Parameter { kind, .. } => Some(kind.as_str()),
            _ => None,
        }
    }

    /// Structured context payload
    #[must_use]
    pub fn context(&self) -> &ErrorContext {
        match self {
            Self::InvalidAddress { context, .. }
            | Self::DocumentNotFound { context, .. }
            | Self::SectionNotFound { context, .. }
            | Self::Parameter { context, .. } => context,
        }
    }

    /// Attach an extra context entry
    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let ctx = match &mut self {
            Self::InvalidAddress { context, .. }
            | Self::DocumentNotFound { context, .. }
            | Self::SectionNotFound { context, .. }
            | Self::Parameter { context, .. } => context,
        };
        ctx.entries.push((key.into(), value.into()));
        self
    }

    /// Render as a tool-facing JSON payload
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut payload = json!({
            "code": self.code(),
            "message": self.to_string(),
            "context": self.context().to_json(),
        });
        if let Some(sub) = self.sub_code() {
            payload["sub_code"] = json!(sub);
        }
        if let Self::SectionNotFound {
            suggestion: Some(s), ..
        } = self
        {
            payload["suggestion"] = json!(s);
        }
        payload
    }
}

/// Result alias for addressing operations
pub type AddressResult<T> = Result<T, AddressingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        assert_eq!(AddressingError::invalid("x", "bad").code(), "INVALID_ADDRESS");
        assert_eq!(
            AddressingError::document_not_found("/a.md").code(),
            "DOCUMENT_NOT_FOUND"
        );
        assert_eq!(
            AddressingError::section_not_found("s", "/a.md", vec![], None).code(),
            "SECTION_NOT_FOUND"
        );
        let err = AddressingError::parameter(ParameterErrorKind::TooManyItems, "too many");
        assert_eq!(err.code(), "ADDRESSING_ERROR");
        assert_eq!(err.sub_code(), Some("TOO_MANY_ITEMS"));
    }

    #[test]
    fn invalid_address_display() {
        let err = AddressingError::invalid("/nope", "must end with .md");
        assert_eq!(err.to_string(), "invalid address: must end with .md");
        assert_eq!(err.context().get("value"), Some("/nope"));
    }

    #[test]
    fn json_payload_carries_alternatives_and_suggestion() {
        let err = AddressingError::section_not_found(
            "setup/missing",
            "/guide.md",
            vec!["setup".into(), "usage".into()],
            Some("setup".into()),
        );
        let json = err.to_json();
        assert_eq!(json["code"], "SECTION_NOT_FOUND");
        assert_eq!(json["suggestion"], "setup");
        assert_eq!(json["context"]["alternatives"][1], "usage");
        assert_eq!(json["context"]["document"], "/guide.md");
    }

    #[test]
    fn with_context_appends() {
        let err = AddressingError::document_not_found("/a.md").with_context("tool", "view");
        assert_eq!(err.context().get("tool"), Some("view"));
        assert_eq!(err.context().get("path"), Some("/a.md"));
    }
}
