//! `@`-reference extraction and normalization
//!
//! Documents link to each other with tokens such as:
//!
//! - `@/api/auth.md` (absolute document)
//! - `@guides/start.md` or `@../shared/terms.md` (relative to the citing document)
//! - `@/api/auth.md#login` (section, possibly hierarchical)
//! - `@#login` (section of the citing document)
//!
//! Tokens inside code blocks (fenced or indented) and inline code spans are
//! ignored.

use indexmap::{IndexMap, IndexSet};
use mdref_address::{build_document_address, normalize_hierarchical_slug, DOCUMENT_EXTENSION};
use once_cell::sync::Lazy;
use pulldown_cmark::{Event, Options, Parser as MdParser, Tag};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// A reference resolved against its citing document
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedReference {
    /// Canonical path of the target document
    pub document_path: String,
    /// Target section, if the reference names one
    pub section_slug: Option<String>,
    /// The token as written, for messages
    pub original_ref: String,
}

impl NormalizedReference {
    /// Reference to a whole document
    pub fn document(path: impl Into<String>, original: impl Into<String>) -> Self {
        Self {
            document_path: path.into(),
            section_slug: None,
            original_ref: original.into(),
        }
    }

    /// Reference to a section
    pub fn section(
        path: impl Into<String>,
        slug: impl Into<String>,
        original: impl Into<String>,
    ) -> Self {
        Self {
            document_path: path.into(),
            section_slug: Some(slug.into()),
            original_ref: original.into(),
        }
    }

    /// Path of the node this reference loads: the document path, or
    /// `{document}#{slug}` for sections
    #[must_use]
    pub fn target_path(&self) -> String {
        match &self.section_slug {
            Some(slug) => format!("{}#{slug}", self.document_path),
            None => self.document_path.clone(),
        }
    }
}

impl fmt::Display for NormalizedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.target_path())
    }
}

/// Finds raw reference tokens in text and resolves them against a context
pub trait ReferenceExtractor: Send + Sync + fmt::Debug {
    /// Raw tokens in first-seen order, without duplicates
    fn extract_references(&self, text: &str) -> Vec<String>;

    /// Resolve raw tokens against the citing document
    ///
    /// Tokens that cannot be resolved are dropped.
    fn normalize_references(
        &self,
        tokens: &[String],
        context_document: &str,
    ) -> Vec<NormalizedReference>;

    /// Extract and normalize in one step
    fn extract_normalized(&self, text: &str, context_document: &str) -> Vec<NormalizedReference> {
        let tokens = self.extract_references(text);
        self.normalize_references(&tokens, context_document)
    }
}

// The leading group stands in for a lookbehind so that e-mail addresses
// such as `me@host.md` are not matched.
static AT_REFERENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:^|[^A-Za-z0-9_])(@(?:[A-Za-z0-9_./-]*\.md)?(?:#[A-Za-z0-9_/-]+)?)")
        .expect("reference pattern is valid")
});

/// Extractor for `@path.md#slug` style references
#[derive(Debug, Clone, Copy, Default)]
pub struct AtReferenceExtractor;

impl AtReferenceExtractor {
    /// Create extractor
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn normalize_one(token: &str, context_document: &str) -> Option<NormalizedReference> {
        let body = token.strip_prefix('@').unwrap_or(token).trim();
        let (path_part, slug_part) = match body.split_once('#') {
            Some((path, slug)) => (path, Some(slug)),
            None => (body, None),
        };

        let document = if path_part.is_empty() {
            build_document_address(context_document).ok()?
        } else if path_part.starts_with('/') {
            build_document_address(path_part).ok()?
        } else {
            build_document_address(&resolve_relative(context_document, path_part)?).ok()?
        };

        match slug_part {
            None => Some(NormalizedReference::document(document.path(), token)),
            Some(raw) => {
                let slug = normalize_hierarchical_slug(raw).ok()?;
                Some(NormalizedReference::section(document.path(), slug, token))
            }
        }
    }
}

impl ReferenceExtractor for AtReferenceExtractor {
    fn extract_references(&self, text: &str) -> Vec<String> {
        let prose = mask_code(text);

        AT_REFERENCE
            .captures_iter(&prose)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|token| token.len() > 1)
            .map(str::to_string)
            .collect::<IndexSet<_>>()
            .into_iter()
            .collect()
    }

    fn normalize_references(
        &self,
        tokens: &[String],
        context_document: &str,
    ) -> Vec<NormalizedReference> {
        let mut normalized: IndexMap<String, NormalizedReference> = IndexMap::new();

        for token in tokens {
            match Self::normalize_one(token, context_document) {
                Some(reference) => {
                    normalized.entry(reference.target_path()).or_insert(reference);
                }
                None => {
                    tracing::debug!(token = token.as_str(), context = context_document, "dropping unresolvable reference");
                }
            }
        }

        normalized.into_values().collect()
    }
}

/// Resolve `relative` against the folder of `context_document`
///
/// `.` segments are dropped and `..` climbs one folder, stopping at the root.
fn resolve_relative(context_document: &str, relative: &str) -> Option<String> {
    let context = context_document.trim();
    if !context.ends_with(DOCUMENT_EXTENSION) {
        return None;
    }

    let mut segments: Vec<&str> = context
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();
    segments.pop();

    for segment in relative.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }

    Some(format!("/{}", segments.join("/")))
}

/// Byte ranges of code blocks (fenced or indented) and inline code spans
fn code_ranges(text: &str) -> Vec<Range<usize>> {
    MdParser::new_ext(text, Options::empty())
        .into_offset_iter()
        .filter(|(event, _)| matches!(event, Event::Start(Tag::CodeBlock(_)) | Event::Code(_)))
        .map(|(_, range)| range)
        .collect()
}

/// Replace code with spaces, keeping line breaks and byte offsets
fn mask_code(text: &str) -> String {
    let ranges = code_ranges(text);
    if ranges.is_empty() {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut ranges = ranges.iter().peekable();
    for (offset, c) in text.char_indices() {
        while ranges.next_if(|r| r.end <= offset).is_some() {}
        let masked = ranges.peek().is_some_and(|r| r.contains(&offset));
        if masked && c != '\n' {
            out.extend(std::iter::repeat(' ').take(c.len_utf8()));
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> Vec<String> {
        AtReferenceExtractor.extract_references(text)
    }

    #[test]
    fn extracts_all_token_forms() {
        let text = "See @/api/auth.md and @guides/start.md#install, also @#overview.";
        assert_eq!(
            extract(text),
            vec!["@/api/auth.md", "@guides/start.md#install", "@#overview"]
        );
    }

    #[test]
    fn ignores_emails_and_non_documents() {
        assert!(extract("mail me@host.md or ping @someone").is_empty());
        assert!(extract("@notes.txt").is_empty());
    }

    #[test]
    fn skips_code() {
        let text = "Real @/a.md\n\n```\n@/in-fence.md\n```\n\nInline `@/inline.md` here @/b.md\n";
        assert_eq!(extract(text), vec!["@/a.md", "@/b.md"]);
    }

    #[test]
    fn multi_backtick_span_does_not_hide_later_text() {
        assert_eq!(extract("Use ``a ` @/in-span.md `` here @/b.md"), vec!["@/b.md"]);
    }

    #[test]
    fn skips_indented_code_blocks() {
        let text = "Text\n\n    @/in-indented-code.md\n\nReal @/a.md";
        assert_eq!(extract(text), vec!["@/a.md"]);
    }

    #[test]
    fn tilde_fences_and_unicode_prose() {
        let text = "Café @/c.md\n\n~~~\n@/hidden.md\n~~~\n\nnaïve `x` @/d.md\n";
        assert_eq!(extract(text), vec!["@/c.md", "@/d.md"]);
    }

    #[test]
    fn deduplicates_preserving_order() {
        assert_eq!(extract("@/b.md @/a.md @/b.md"), vec!["@/b.md", "@/a.md"]);
    }

    #[test]
    fn normalizes_relative_and_same_document() {
        let tokens: Vec<String> = ["@./sibling.md", "@../shared/terms.md#glossary", "@#intro", "@/abs.md"]
            .iter()
            .map(ToString::to_string)
            .collect();
        let refs = AtReferenceExtractor.normalize_references(&tokens, "/guides/setup/start.md");

        let targets: Vec<String> = refs.iter().map(NormalizedReference::target_path).collect();
        assert_eq!(
            targets,
            vec![
                "/guides/setup/sibling.md",
                "/guides/shared/terms.md#glossary",
                "/guides/setup/start.md#intro",
                "/abs.md",
            ]
        );
        assert_eq!(refs[1].original_ref, "@../shared/terms.md#glossary");
    }

    #[test]
    fn parent_segments_stop_at_root() {
        let tokens = vec!["@../../../top.md".to_string()];
        let refs = AtReferenceExtractor.normalize_references(&tokens, "/a/doc.md");
        assert_eq!(refs[0].document_path, "/top.md");
    }

    #[test]
    fn drops_invalid_tokens() {
        let tokens = vec!["@#bad/UPPER".to_string(), "@/ok.md".to_string()];
        let refs = AtReferenceExtractor.normalize_references(&tokens, "/doc.md");
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].document_path, "/ok.md");
    }

    #[test]
    fn same_target_from_different_tokens_kept_once() {
        let refs = AtReferenceExtractor.extract_normalized("@/api/auth.md and @auth.md", "/api/index.md");
        assert_eq!(refs.len(), 1);
    }

    #[test]
    fn target_path_forms() {
        let doc = NormalizedReference::document("/a.md", "@/a.md");
        let section = NormalizedReference::section("/a.md", "x/y", "@/a.md#x/y");
        assert_eq!(doc.target_path(), "/a.md");
        assert_eq!(section.to_string(), "/a.md#x/y");
    }
}
