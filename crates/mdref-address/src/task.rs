//! Structural task identification
//!
//! A task is a heading that sits exactly one level below the document's
//! `Tasks` heading. Deeper headings belong to a task; they are not tasks.

use crate::heading::{find_heading, Heading};

/// Slug of the heading that groups tasks
pub const TASKS_SLUG: &str = "tasks";

fn is_tasks_heading(heading: &Heading) -> bool {
    heading.slug == TASKS_SLUG || heading.title.trim().eq_ignore_ascii_case(TASKS_SLUG)
}

/// Locate the tasks heading and the range of its subtree
fn tasks_region(headings: &[Heading]) -> Option<(usize, usize)> {
    let start = headings.iter().position(is_tasks_heading)?;
    let depth = headings[start].depth;
    let end = headings[start + 1..]
        .iter()
        .position(|h| h.depth <= depth)
        .map_or(headings.len(), |offset| start + 1 + offset);
    Some((start, end))
}

/// Whether `slug` names a task in a document with the given headings
///
/// True when a tasks heading exists, the candidate follows it inside its
/// subtree, and the candidate's depth is the tasks depth + 1.
#[must_use]
pub fn is_task_section(slug: &str, headings: &[Heading]) -> bool {
    let Some((start, end)) = tasks_region(headings) else {
        return false;
    };
    let Some(candidate) = find_heading(headings, slug) else {
        return false;
    };

    candidate.index > start
        && candidate.index < end
        && candidate.depth == headings[start].depth + 1
}

/// Slugs of every task, in document order
#[must_use]
pub fn list_task_slugs(headings: &[Heading]) -> Vec<String> {
    let Some((start, end)) = tasks_region(headings) else {
        return Vec::new();
    };
    let task_depth = headings[start].depth + 1;
    headings[start + 1..end]
        .iter()
        .filter(|h| h.depth == task_depth)
        .map(|h| h.slug.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> Vec<Heading> {
        vec![
            Heading::new(0, 1, "Plan", "plan"),
            Heading::new(1, 2, "Overview", "overview"),
            Heading::new(2, 2, "Tasks", "tasks"),
            Heading::new(3, 3, "Write Parser", "write-parser"),
            Heading::new(4, 4, "Notes", "notes"),
            Heading::new(5, 3, "Write Cache", "write-cache"),
            Heading::new(6, 2, "Appendix", "appendix"),
            Heading::new(7, 3, "Glossary", "glossary"),
        ]
    }

    #[test]
    fn immediate_children_are_tasks() {
        let headings = plan();
        assert!(is_task_section("write-parser", &headings));
        assert!(is_task_section("write-cache", &headings));
    }

    #[test]
    fn grandchildren_are_not_tasks() {
        assert!(!is_task_section("notes", &plan()));
    }

    #[test]
    fn headings_outside_tasks_are_not_tasks() {
        let headings = plan();
        assert!(!is_task_section("overview", &headings));
        assert!(!is_task_section("tasks", &headings));
        // Same depth as a task but under a different parent
        assert!(!is_task_section("glossary", &headings));
    }

    #[test]
    fn tasks_title_matches_case_insensitively() {
        let headings = vec![
            Heading::new(0, 2, "TASKS", "todo-list"),
            Heading::new(1, 3, "Ship It", "ship-it"),
        ];
        assert!(is_task_section("ship-it", &headings));
    }

    #[test]
    fn no_tasks_heading() {
        let headings = vec![Heading::new(0, 1, "Doc", "doc"), Heading::new(1, 2, "A", "a")];
        assert!(!is_task_section("a", &headings));
        assert!(list_task_slugs(&headings).is_empty());
    }

    #[test]
    fn list_tasks_in_order() {
        assert_eq!(list_task_slugs(&plan()), vec!["write-parser", "write-cache"]);
    }
}
