//! Document metadata, heading outline and fingerprints

use chrono::{DateTime, Utc};
use mdref_address::{find_heading, Heading};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Metadata describing one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Canonical document path
    pub path: String,
    /// Frontmatter title, first H1, or the file slug
    pub title: String,
    /// Folder namespace
    pub namespace: String,
    /// File name without extension
    pub slug: String,
    /// Blake3 hash of the full source (hex)
    pub content_hash: String,
    /// Whitespace-separated words in the body
    pub word_count: usize,
    /// Number of headings
    pub heading_count: usize,
    /// Modification time when known
    pub last_modified: Option<DateTime<Utc>>,
}

/// A document: metadata plus its heading outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Metadata
    pub metadata: DocumentMetadata,
    /// Headings in document order
    pub headings: Vec<Heading>,
}

impl Document {
    /// Canonical path
    #[inline]
    #[must_use]
    pub fn path(&self) -> &str {
        &self.metadata.path
    }

    /// Resolved title
    #[inline]
    #[must_use]
    pub fn title(&self) -> &str {
        &self.metadata.title
    }

    /// Heading for a (possibly hierarchical) slug
    #[inline]
    #[must_use]
    pub fn heading(&self, slug: &str) -> Option<&Heading> {
        find_heading(&self.headings, slug)
    }

    /// Whether the document has a section with this slug
    #[inline]
    #[must_use]
    pub fn has_section(&self, slug: &str) -> bool {
        self.heading(slug).is_some()
    }

    /// All heading slugs in document order
    #[must_use]
    pub fn slugs(&self) -> Vec<String> {
        mdref_address::heading_slugs(&self.headings)
    }
}

/// Lightweight per-document summary for coarse relevance filtering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FingerprintEntry {
    /// Canonical document path
    pub path: String,
    /// Folder namespace
    pub namespace: String,
    /// Most frequent meaningful terms of the title and headings
    pub keywords: Vec<String>,
    /// Blake3 hash of the source (hex)
    pub content_hash: String,
    /// Modification time when known
    pub last_modified: Option<DateTime<Utc>>,
}

/// Maximum keywords kept per fingerprint
pub const MAX_FINGERPRINT_KEYWORDS: usize = 10;

const STOPWORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "that", "this", "into", "your", "you", "are", "how",
    "what", "when", "why", "use", "using", "about", "not", "but", "all", "can", "its",
];

/// Rank the meaningful terms in `texts` by frequency
///
/// Terms are lowercase alphanumeric runs of at least three characters that
/// are not stopwords. Ties are broken alphabetically.
#[must_use]
pub fn extract_keywords<'a>(texts: impl IntoIterator<Item = &'a str>, limit: usize) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for text in texts {
        for word in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.chars().count() >= 3)
        {
            let word = word.to_lowercase();
            if !STOPWORDS.contains(&word.as_str()) {
                *counts.entry(word).or_default() += 1;
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.into_iter().take(limit).map(|(word, _)| word).collect()
}

impl Document {
    /// Build the fingerprint of this document
    #[must_use]
    pub fn fingerprint(&self) -> FingerprintEntry {
        let texts = std::iter::once(self.metadata.title.as_str())
            .chain(self.headings.iter().map(|h| h.title.as_str()));
        FingerprintEntry {
            path: self.metadata.path.clone(),
            namespace: self.metadata.namespace.clone(),
            keywords: extract_keywords(texts, MAX_FINGERPRINT_KEYWORDS),
            content_hash: self.metadata.content_hash.clone(),
            last_modified: self.metadata.last_modified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        Document {
            metadata: DocumentMetadata {
                path: "/api/auth.md".into(),
                title: "Authentication API".into(),
                namespace: "api".into(),
                slug: "auth".into(),
                content_hash: "abc".into(),
                word_count: 10,
                heading_count: 3,
                last_modified: None,
            },
            headings: vec![
                Heading::new(0, 1, "Authentication API", "authentication-api"),
                Heading::new(1, 2, "Token refresh", "token-refresh"),
                Heading::new(2, 2, "Token revocation", "token-revocation"),
            ],
        }
    }

    #[test]
    fn keywords_rank_by_frequency() {
        let keywords = extract_keywords(["the token and the token", "refresh api"], 10);
        assert_eq!(keywords, vec!["token", "api", "refresh"]);
    }

    #[test]
    fn keywords_respect_limit() {
        let keywords = extract_keywords(["alpha beta gamma delta"], 2);
        assert_eq!(keywords.len(), 2);
    }

    #[test]
    fn fingerprint_uses_title_and_headings() {
        let fp = sample().fingerprint();
        // api, authentication and token each appear twice
        assert_eq!(fp.keywords[..3], ["api", "authentication", "token"]);
        assert_eq!(fp.keywords.len(), 5);
        assert_eq!(fp.namespace, "api");
    }

    #[test]
    fn section_lookup() {
        let doc = sample();
        assert!(doc.has_section("token-refresh"));
        assert!(!doc.has_section("missing"));
        assert_eq!(doc.slugs().len(), 3);
    }
}
