//! Heading outline used to resolve slugs against a document

use crate::slug::split_slug_path;
use serde::{Deserialize, Serialize};

/// One heading of a document, in document order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Position in the heading list
    pub index: usize,
    /// Heading level (1-6)
    pub depth: u8,
    /// Heading text
    pub title: String,
    /// Unique slug within the document
    pub slug: String,
}

impl Heading {
    /// Create heading
    #[inline]
    #[must_use]
    pub fn new(index: usize, depth: u8, title: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            index,
            depth,
            title: title.into(),
            slug: slug.into(),
        }
    }
}

/// Index one past the last heading inside the subtree rooted at `idx`
fn subtree_end(headings: &[Heading], idx: usize) -> usize {
    let depth = headings[idx].depth;
    headings[idx + 1..]
        .iter()
        .position(|h| h.depth <= depth)
        .map_or(headings.len(), |offset| idx + 1 + offset)
}

/// Find the heading a (possibly hierarchical) slug refers to
///
/// A flat slug matches the first heading with that slug. For `a/b/c`, `b`
/// must be found inside the subtree of `a`, and `c` inside the subtree of `b`.
#[must_use]
pub fn find_heading<'a>(headings: &'a [Heading], slug: &str) -> Option<&'a Heading> {
    let components = split_slug_path(slug);
    let (first, rest) = components.split_first()?;

    let mut current = headings.iter().position(|h| h.slug == *first)?;
    for component in rest {
        let end = subtree_end(headings, current);
        let offset = headings[current + 1..end]
            .iter()
            .position(|h| h.slug == *component)?;
        current = current + 1 + offset;
    }

    headings.get(current)
}

/// Slugs of every heading, in document order
#[must_use]
pub fn heading_slugs(headings: &[Heading]) -> Vec<String> {
    headings.iter().map(|h| h.slug.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outline() -> Vec<Heading> {
        vec![
            Heading::new(0, 1, "Guide", "guide"),
            Heading::new(1, 2, "Phase 1", "phase1"),
            Heading::new(2, 3, "Setup", "setup"),
            Heading::new(3, 4, "Infrastructure", "infrastructure"),
            Heading::new(4, 2, "Phase 2", "phase2"),
            Heading::new(5, 3, "Setup", "setup-1"),
            Heading::new(6, 3, "Infrastructure", "infrastructure-1"),
        ]
    }

    #[test]
    fn flat_slug_matches_first() {
        let headings = outline();
        assert_eq!(find_heading(&headings, "setup").unwrap().index, 2);
        assert!(find_heading(&headings, "missing").is_none());
    }

    #[test]
    fn hierarchical_slug_walks_subtrees() {
        let headings = outline();
        let found = find_heading(&headings, "phase1/setup/infrastructure").unwrap();
        assert_eq!(found.index, 3);

        // infrastructure-1 is not under phase1
        assert!(find_heading(&headings, "phase1/infrastructure-1").is_none());
        assert_eq!(
            find_heading(&headings, "phase2/infrastructure-1").unwrap().index,
            6
        );
    }

    #[test]
    fn sibling_is_not_descendant() {
        let headings = outline();
        assert!(find_heading(&headings, "phase1/phase2").is_none());
    }

    #[test]
    fn empty_slug_finds_nothing() {
        assert!(find_heading(&outline(), "").is_none());
    }
}
