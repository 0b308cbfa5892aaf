//! Section slugs
//!
//! A slug is a lowercase identifier derived from a heading title. Slugs may
//! be hierarchical (`phase1/setup/infrastructure`), in which case every
//! `/`-separated component must match `[a-z0-9]+(-[a-z0-9]+)*`.

use once_cell::sync::Lazy;
use regex::Regex;

static SLUG_COMPONENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("slug component pattern is valid"));

/// Maximum number of components in a hierarchical slug
pub const MAX_SLUG_DEPTH: usize = 10;

/// Separator between hierarchical slug components
pub const SLUG_SEPARATOR: char = '/';

/// Derive a slug from a heading title
///
/// Lowercases, drops punctuation, turns whitespace and underscores into
/// `-`, and collapses runs of `-`.
///
/// # Examples
/// - `"Getting Started"` → `getting-started`
/// - `"API: v2 (beta)"` → `api-v2-beta`
#[must_use]
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;

    for c in title.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() || c == '-' || c == '_' {
            pending_dash = true;
        }
    }

    slug
}

/// Check a single slug component against `[a-z0-9]+(-[a-z0-9]+)*`
#[must_use]
pub fn is_valid_slug_component(component: &str) -> bool {
    SLUG_COMPONENT.is_match(component)
}

/// Split a hierarchical slug into its components
///
/// Empty components produced by repeated separators are dropped.
#[must_use]
pub fn split_slug_path(slug: &str) -> Vec<&str> {
    slug.split(SLUG_SEPARATOR).filter(|c| !c.is_empty()).collect()
}

/// Join components into a hierarchical slug
#[must_use]
pub fn join_slug_path<S: AsRef<str>>(components: &[S]) -> String {
    components
        .iter()
        .map(AsRef::as_ref)
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

/// Number of components in a slug (`""` has depth 0)
#[must_use]
pub fn get_slug_depth(slug: &str) -> usize {
    split_slug_path(slug).len()
}

/// Parent of a hierarchical slug, `None` for single-component slugs
#[must_use]
pub fn get_parent_slug(slug: &str) -> Option<String> {
    let components = split_slug_path(slug);
    if components.len() <= 1 {
        return None;
    }
    Some(join_slug_path(&components[..components.len() - 1]))
}

/// Last component of a slug
#[must_use]
pub fn get_slug_leaf(slug: &str) -> Option<&str> {
    split_slug_path(slug).last().copied()
}

/// Whether `slug` lies strictly beneath `ancestor`
#[must_use]
pub fn is_descendant_slug(slug: &str, ancestor: &str) -> bool {
    let child = split_slug_path(slug);
    let parent = split_slug_path(ancestor);
    !parent.is_empty() && child.len() > parent.len() && child[..parent.len()] == parent[..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_titles() {
        assert_eq!(slugify("Getting Started"), "getting-started");
        assert_eq!(slugify("API: v2 (beta)"), "api-v2-beta");
        assert_eq!(slugify("  Leading and trailing  "), "leading-and-trailing");
        assert_eq!(slugify("snake_case_title"), "snake-case-title");
        assert_eq!(slugify("Already-slugged--twice"), "already-slugged-twice");
        assert_eq!(slugify("!!!"), "");
    }

    #[test]
    fn component_validation() {
        assert!(is_valid_slug_component("setup"));
        assert!(is_valid_slug_component("phase-1"));
        assert!(is_valid_slug_component("a1-b2-c3"));
        assert!(!is_valid_slug_component(""));
        assert!(!is_valid_slug_component("-leading"));
        assert!(!is_valid_slug_component("trailing-"));
        assert!(!is_valid_slug_component("double--dash"));
        assert!(!is_valid_slug_component("Upper"));
        assert!(!is_valid_slug_component("under_score"));
        assert!(!is_valid_slug_component("setup\n"));
        assert!(!is_valid_slug_component("a/b"));
    }

    #[test]
    fn parent_and_depth() {
        assert_eq!(
            get_parent_slug("phase1/setup/infrastructure").as_deref(),
            Some("phase1/setup")
        );
        assert_eq!(get_slug_depth("phase1/setup/infrastructure"), 3);
        assert_eq!(get_parent_slug("phase1"), None);
        assert_eq!(get_slug_depth(""), 0);
        assert_eq!(get_slug_depth("a//b"), 2);
    }

    #[test]
    fn leaf_and_descendants() {
        assert_eq!(get_slug_leaf("a/b/c"), Some("c"));
        assert_eq!(get_slug_leaf(""), None);
        assert!(is_descendant_slug("a/b/c", "a/b"));
        assert!(is_descendant_slug("a/b", "a"));
        assert!(!is_descendant_slug("a/b", "a/b"));
        assert!(!is_descendant_slug("ab/c", "a"));
        assert!(!is_descendant_slug("a", ""));
    }

    #[test]
    fn join_skips_empty() {
        assert_eq!(join_slug_path(&["a", "", "b"]), "a/b");
        assert_eq!(join_slug_path::<&str>(&[]), "");
    }
}
