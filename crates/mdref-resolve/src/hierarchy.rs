//! Resolved content tree and pure tree utilities

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One loaded document or section in a resolution tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchicalContent {
    /// Document path, or `{document}#{slug}` for sections
    pub path: String,
    /// Document title or section heading
    pub title: String,
    /// Loaded content
    pub content: String,
    /// Distance from the references passed to the resolution call (0-based)
    pub depth: usize,
    /// Namespace of the owning document
    pub namespace: String,
    /// Nodes loaded from references inside `content`, in extraction order
    pub children: Vec<HierarchicalContent>,
}

impl HierarchicalContent {
    /// Number of nodes in this subtree, self included
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Self::node_count).sum::<usize>()
    }

    /// Depth-first iterator over this subtree
    pub fn iter(&self) -> impl Iterator<Item = &HierarchicalContent> {
        let mut stack = vec![self];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children.iter().rev());
            Some(node)
        })
    }
}

/// Summary of a resolution forest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyStats {
    /// Total nodes
    pub total_nodes: usize,
    /// Deepest `depth` present
    pub max_depth: usize,
    /// Distinct namespaces, sorted
    pub namespaces: Vec<String>,
}

/// Every node path, depth first
#[must_use]
pub fn flatten_hierarchy(nodes: &[HierarchicalContent]) -> Vec<String> {
    nodes
        .iter()
        .flat_map(HierarchicalContent::iter)
        .map(|node| node.path.clone())
        .collect()
}

/// Node count, deepest depth and namespaces of a forest
///
/// An empty forest has `max_depth` 0.
#[must_use]
pub fn hierarchy_stats(nodes: &[HierarchicalContent]) -> HierarchyStats {
    let mut stats = HierarchyStats::default();
    let mut namespaces = BTreeSet::new();

    for node in nodes.iter().flat_map(HierarchicalContent::iter) {
        stats.total_nodes += 1;
        stats.max_depth = stats.max_depth.max(node.depth);
        namespaces.insert(node.namespace.as_str());
    }

    stats.namespaces = namespaces.into_iter().map(str::to_string).collect();
    stats
}
