//! Plain-text rendering of command results

use mdref_resolve::{HierarchicalContent, HierarchyStats, Resolution};
use std::fmt::Write;

/// Indented tree, one node per line, followed by skipped references
pub(crate) fn render_resolution(resolution: &Resolution) -> String {
    let mut out = String::new();
    for node in &resolution.nodes {
        render_node(&mut out, node);
    }
    if !resolution.skipped.is_empty() {
        let _ = writeln!(out, "\nskipped:");
        for skipped in &resolution.skipped {
            let _ = writeln!(out, "  {skipped}");
        }
    }
    let _ = writeln!(
        out,
        "\n{} nodes, {} skipped, {}ms",
        resolution.stats.nodes_loaded, resolution.stats.skipped, resolution.stats.elapsed_ms
    );
    out
}

fn render_node(out: &mut String, node: &HierarchicalContent) {
    let indent = "  ".repeat(node.depth);
    let _ = writeln!(out, "{indent}{} ({})", node.path, node.title);
    for child in &node.children {
        render_node(out, child);
    }
}

pub(crate) fn render_stats(stats: &HierarchyStats) -> String {
    format!(
        "nodes:      {}\nmax depth:  {}\nnamespaces: {}\n",
        stats.total_nodes,
        stats.max_depth,
        stats.namespaces.join(", ")
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdref_resolve::{SkipReason, SkippedReference, TraversalStats};
    use pretty_assertions::assert_eq;

    fn leaf(path: &str, depth: usize) -> HierarchicalContent {
        HierarchicalContent {
            path: path.into(),
            title: path.trim_start_matches('/').into(),
            content: String::new(),
            depth,
            namespace: "root".into(),
            children: Vec::new(),
        }
    }

    #[test]
    fn tree_is_indented_by_depth() {
        let mut root = leaf("/a.md", 0);
        root.children.push(leaf("/b.md", 1));
        let resolution = Resolution {
            nodes: vec![root],
            skipped: vec![SkippedReference {
                reference: "@/c.md".into(),
                target: "/c.md".into(),
                depth: 1,
                reason: SkipReason::DocumentNotFound,
            }],
            stats: TraversalStats {
                nodes_loaded: 2,
                skipped: 1,
                max_depth_reached: 1,
                elapsed_ms: 3,
            },
        };

        assert_eq!(
            render_resolution(&resolution),
            "/a.md (a.md)\n  /b.md (b.md)\n\nskipped:\n  @/c.md (depth 1): document not found\n\n2 nodes, 1 skipped, 3ms\n"
        );
    }

    #[test]
    fn stats_lines() {
        let stats = HierarchyStats {
            total_nodes: 3,
            max_depth: 1,
            namespaces: vec!["api".into(), "root".into()],
        };
        assert_eq!(
            render_stats(&stats),
            "nodes:      3\nmax depth:  1\nnamespaces: api, root\n"
        );
    }
}
