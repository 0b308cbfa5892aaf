//! Markdown document parser
//!
//! Uses pulldown-cmark to build the heading outline of a document and to
//! slice section bodies out of the source.

use crate::document::{Document, DocumentMetadata};
use crate::error::{ProviderError, ProviderResult};
use chrono::{DateTime, Utc};
use mdref_address::{build_document_address, find_heading, slugify, Heading};
use pulldown_cmark::{Event, Options, Parser as MdParser, Tag, TagEnd};
use std::collections::{HashMap, HashSet};

/// Slug used for headings whose title has no alphanumeric characters
const FALLBACK_SLUG: &str = "section";

/// A parsed document together with its source
///
/// Section content is sliced from the source on demand using the byte
/// offset recorded for each heading.
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    document: Document,
    source: String,
    /// Byte offset of each heading's first character, parallel to `headings`
    heading_offsets: Vec<usize>,
}

impl ParsedDocument {
    /// Parse markdown source for the document at `path`
    ///
    /// # Errors
    /// Returns error if `path` is not a valid document path or the
    /// frontmatter is not valid YAML.
    pub fn parse(path: &str, source: impl Into<String>) -> ProviderResult<Self> {
        let source = source.into();
        let address = build_document_address(path)?;

        let (frontmatter, body_offset) = split_frontmatter(&source);
        let metadata_title = match frontmatter {
            Some(raw) => frontmatter_title(raw).map_err(|message| ProviderError::Frontmatter {
                path: address.path().to_string(),
                message,
            })?,
            None => None,
        };

        let body = &source[body_offset..];
        let (headings, offsets) = parse_headings(body);
        let heading_offsets = offsets.into_iter().map(|o| o + body_offset).collect();

        let title = metadata_title
            .or_else(|| {
                headings
                    .iter()
                    .find(|h| h.depth == 1)
                    .map(|h| h.title.clone())
            })
            .unwrap_or_else(|| address.slug().to_string());

        let metadata = DocumentMetadata {
            path: address.path().to_string(),
            title,
            namespace: address.namespace().to_string(),
            slug: address.slug().to_string(),
            content_hash: blake3::hash(source.as_bytes()).to_hex().to_string(),
            word_count: body.split_whitespace().count(),
            heading_count: headings.len(),
            last_modified: None,
        };

        tracing::trace!(path = address.path(), headings = headings.len(), "parsed markdown document");

        Ok(Self {
            document: Document { metadata, headings },
            source,
            heading_offsets,
        })
    }

    /// Attach a modification time
    #[must_use]
    pub fn with_last_modified(mut self, last_modified: Option<DateTime<Utc>>) -> Self {
        self.document.metadata.last_modified = last_modified;
        self
    }

    /// Document metadata and outline
    #[inline]
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Full source, frontmatter included
    #[inline]
    #[must_use]
    pub fn content(&self) -> &str {
        &self.source
    }

    /// Body of a section: its heading line up to the next heading of equal
    /// or lower depth
    #[must_use]
    pub fn section_content(&self, slug: &str) -> Option<&str> {
        let headings = &self.document.headings;
        let heading = find_heading(headings, slug)?;
        let start = self.heading_offsets[heading.index];
        let end = headings[heading.index + 1..]
            .iter()
            .find(|h| h.depth <= heading.depth)
            .map_or(self.source.len(), |next| self.heading_offsets[next.index]);

        Some(self.source[start..end].trim_end())
    }
}

/// Split off a leading `---` YAML block, returning it and the body offset
fn split_frontmatter(source: &str) -> (Option<&str>, usize) {
    let Some(rest) = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))
    else {
        return (None, 0);
    };
    let opening = source.len() - rest.len();

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == "---" {
            let body_offset = opening + offset + line.len();
            return (Some(&rest[..offset]), body_offset);
        }
        offset += line.len();
    }

    (None, 0)
}

fn frontmatter_title(raw: &str) -> Result<Option<String>, String> {
    let value: serde_yaml::Value = serde_yaml::from_str(raw).map_err(|e| e.to_string())?;
    Ok(value
        .get("title")
        .and_then(serde_yaml::Value::as_str)
        .map(str::to_string))
}

/// Collect headings and their byte offsets within `body`
fn parse_headings(body: &str) -> (Vec<Heading>, Vec<usize>) {
    let mut headings = Vec::new();
    let mut offsets = Vec::new();
    let mut issued = IssuedSlugs::default();
    let mut current: Option<(u8, usize, String)> = None;

    for (event, range) in MdParser::new_ext(body, Options::empty()).into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((level as u8, range.start, String::new()));
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((_, _, title)) = current.as_mut() {
                    title.push_str(&text);
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((depth, start, title)) = current.take() {
                    let title = title.trim().to_string();
                    let slug = issued.issue(&title);
                    headings.push(Heading::new(headings.len(), depth, title, slug));
                    offsets.push(start);
                }
            }
            _ => {}
        }
    }

    (headings, offsets)
}

/// Slugs handed out so far within one document
#[derive(Default)]
struct IssuedSlugs {
    issued: HashSet<String>,
    next_suffix: HashMap<String, usize>,
}

impl IssuedSlugs {
    /// Slugify a title, suffixing `-1`, `-2`, ... until the slug is unused
    fn issue(&mut self, title: &str) -> String {
        let mut base = slugify(title);
        if base.is_empty() {
            base = FALLBACK_SLUG.to_string();
        }

        let slug = if self.issued.contains(&base) {
            let suffix = self.next_suffix.entry(base.clone()).or_insert(1);
            loop {
                let candidate = format!("{base}-{suffix}");
                *suffix += 1;
                if !self.issued.contains(&candidate) {
                    break candidate;
                }
            }
        } else {
            base
        };

        self.issued.insert(slug.clone());
        slug
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const GUIDE: &str = "# Getting Started

Intro text with @/api/auth.md reference.

## Install

Run the installer.

### Linux

Use the package manager.

## Configure

Edit the file.

## Install

Second install section.
";

    #[test]
    fn outline_and_title() {
        let parsed = ParsedDocument::parse("/guides/start.md", GUIDE).unwrap();
        let doc = parsed.document();
        assert_eq!(doc.title(), "Getting Started");
        assert_eq!(doc.metadata.namespace, "guides");
        assert_eq!(
            doc.slugs(),
            vec!["getting-started", "install", "linux", "configure", "install-1"]
        );
        assert_eq!(doc.headings[2].depth, 3);
        assert_eq!(doc.metadata.heading_count, 5);
    }

    #[test]
    fn section_content_stops_at_sibling() {
        let parsed = ParsedDocument::parse("/guides/start.md", GUIDE).unwrap();
        let install = parsed.section_content("install").unwrap();
        assert!(install.starts_with("## Install"));
        assert!(install.contains("### Linux"));
        assert!(!install.contains("## Configure"));

        let linux = parsed.section_content("install/linux").unwrap();
        assert_eq!(linux, "### Linux\n\nUse the package manager.");

        let last = parsed.section_content("install-1").unwrap();
        assert_eq!(last, "## Install\n\nSecond install section.");
    }

    #[test]
    fn missing_section() {
        let parsed = ParsedDocument::parse("/guides/start.md", GUIDE).unwrap();
        assert!(parsed.section_content("nope").is_none());
    }

    #[test]
    fn frontmatter_title_wins() {
        let source = "---\ntitle: From Frontmatter\ntags: [a]\n---\n# Heading Title\n\nBody\n";
        let parsed = ParsedDocument::parse("/a.md", source).unwrap();
        assert_eq!(parsed.document().title(), "From Frontmatter");
        assert_eq!(
            parsed.section_content("heading-title").unwrap(),
            "# Heading Title\n\nBody"
        );
    }

    #[test]
    fn bad_frontmatter_is_an_error() {
        let source = "---\ntitle: [unclosed\n---\n# T\n";
        let err = ParsedDocument::parse("/a.md", source).unwrap_err();
        assert!(matches!(err, ProviderError::Frontmatter { .. }));
    }

    #[test]
    fn title_falls_back_to_slug() {
        let parsed = ParsedDocument::parse("/notes/todo.md", "## Only H2\n").unwrap();
        assert_eq!(parsed.document().title(), "todo");
    }

    #[test]
    fn headings_in_code_blocks_are_ignored() {
        let source = "# Real\n\n```md\n# Not a heading\n```\n";
        let parsed = ParsedDocument::parse("/a.md", source).unwrap();
        assert_eq!(parsed.document().slugs(), vec!["real"]);
    }

    #[test]
    fn punctuation_only_heading_gets_fallback_slug() {
        let parsed = ParsedDocument::parse("/a.md", "# !!!\n\n# ???\n").unwrap();
        assert_eq!(parsed.document().slugs(), vec!["section", "section-1"]);
    }

    #[test]
    fn suffixed_slugs_never_collide_with_literal_titles() {
        let source = "# Setup\n\nfirst\n\n## Setup\n\nsecond\n\n## Setup 1\n\nthird\n";
        let parsed = ParsedDocument::parse("/p.md", source).unwrap();
        assert_eq!(parsed.document().slugs(), vec!["setup", "setup-1", "setup-1-1"]);
        assert_eq!(parsed.section_content("setup-1").unwrap(), "## Setup\n\nsecond");
        assert_eq!(parsed.section_content("setup-1-1").unwrap(), "## Setup 1\n\nthird");
    }

    #[test]
    fn literal_suffix_first_pushes_repeat_further() {
        let source = "# Setup 1\n\n# Setup\n\n# Setup\n";
        let parsed = ParsedDocument::parse("/p.md", source).unwrap();
        assert_eq!(parsed.document().slugs(), vec!["setup-1", "setup", "setup-2"]);
    }

    #[test]
    fn invalid_path_is_rejected() {
        let err = ParsedDocument::parse("/a.txt", "# A").unwrap_err();
        assert!(matches!(err, ProviderError::Address(_)));
    }

    #[test]
    fn hash_is_stable() {
        let a = ParsedDocument::parse("/a.md", "# A").unwrap();
        let b = ParsedDocument::parse("/b.md", "# A").unwrap();
        assert_eq!(a.document().metadata.content_hash, b.document().metadata.content_hash);
        assert_eq!(a.document().metadata.content_hash.len(), 64);
    }
}
