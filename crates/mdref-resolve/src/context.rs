//! Traversal state shared by every step of one resolution call

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Why a reference produced no node
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// Target already loaded earlier in this traversal
    #[error("already visited")]
    AlreadyVisited,

    /// Reference sits at or beyond the depth limit
    #[error("depth limit {max_depth} reached")]
    DepthLimit {
        /// Configured limit
        max_depth: usize,
    },

    /// Node budget exhausted
    #[error("node budget {max_nodes} exhausted")]
    NodeBudget {
        /// Configured budget
        max_nodes: usize,
    },

    /// Reference does not parse as an address
    #[error("invalid reference: {message}")]
    InvalidReference {
        /// Parser message
        message: String,
    },

    /// Target document does not exist
    #[error("document not found")]
    DocumentNotFound,

    /// Target section does not exist in its document
    #[error("section '{slug}' not found")]
    SectionNotFound {
        /// Requested slug
        slug: String,
    },

    /// Provider failed while loading
    #[error("provider failure: {message}")]
    ProviderFailure {
        /// Provider message
        message: String,
    },
}

/// A reference that was dropped from the tree, and why
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedReference {
    /// The reference as written
    pub reference: String,
    /// Node path it would have produced
    pub target: String,
    /// Depth it was encountered at
    pub depth: usize,
    /// Cause
    #[serde(flatten)]
    pub reason: SkipReason,
}

impl fmt::Display for SkippedReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (depth {}): {}", self.reference, self.depth, self.reason)
    }
}

/// Mutable state of one top-level resolution
///
/// Created once per call and threaded by `&mut` through every recursive
/// step. Never shared between two resolutions.
#[derive(Debug)]
pub struct TraversalContext {
    visited: HashSet<String>,
    nodes: usize,
    deepest: usize,
    started: Instant,
    skipped: Vec<SkippedReference>,
}

impl TraversalContext {
    /// Start a fresh traversal now
    #[must_use]
    pub fn new() -> Self {
        Self {
            visited: HashSet::new(),
            nodes: 0,
            deepest: 0,
            started: Instant::now(),
            skipped: Vec::new(),
        }
    }

    /// Start a traversal whose origin counts as already visited
    #[must_use]
    pub fn seeded(origin: impl Into<String>) -> Self {
        let mut ctx = Self::new();
        ctx.visited.insert(origin.into());
        ctx
    }

    /// Whether a node path was already claimed
    #[inline]
    #[must_use]
    pub fn is_visited(&self, path: &str) -> bool {
        self.visited.contains(path)
    }

    /// Claim a node path and count it against the node budget
    ///
    /// Returns `false` if the path was already claimed.
    pub fn claim(&mut self, path: String) -> bool {
        if !self.visited.insert(path) {
            return false;
        }
        self.nodes += 1;
        true
    }

    /// Note that a node was assembled at `depth`
    pub fn record_node(&mut self, depth: usize) {
        self.deepest = self.deepest.max(depth);
    }

    /// Nodes claimed so far
    #[inline]
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes
    }

    /// Deepest depth of an assembled node
    #[inline]
    #[must_use]
    pub fn deepest(&self) -> usize {
        self.deepest
    }

    /// Time since the traversal started
    #[inline]
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Record a dropped reference
    pub fn record_skip(&mut self, skipped: SkippedReference) {
        self.skipped.push(skipped);
    }

    /// Dropped references so far
    #[inline]
    #[must_use]
    pub fn skipped(&self) -> &[SkippedReference] {
        &self.skipped
    }

    /// Take the dropped references, leaving none behind
    pub fn take_skipped(&mut self) -> Vec<SkippedReference> {
        std::mem::take(&mut self.skipped)
    }
}

impl Default for TraversalContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn claim_once() {
        let mut ctx = TraversalContext::new();
        assert!(ctx.claim("/a.md".into()));
        assert!(!ctx.claim("/a.md".into()));
        assert_eq!(ctx.node_count(), 1);
    }

    #[test]
    fn deepest_tracks_assembled_nodes_only() {
        let mut ctx = TraversalContext::new();
        assert!(ctx.claim("/a.md".into()));
        assert!(ctx.claim("/b.md".into()));
        assert_eq!(ctx.deepest(), 0);
        ctx.record_node(1);
        ctx.record_node(0);
        assert_eq!(ctx.deepest(), 1);
    }

    #[test]
    fn seeded_origin_is_visited_but_not_counted() {
        let ctx = TraversalContext::seeded("/origin.md");
        assert!(ctx.is_visited("/origin.md"));
        assert_eq!(ctx.node_count(), 0);
    }

    #[test]
    fn section_and_document_are_distinct_nodes() {
        let mut ctx = TraversalContext::new();
        assert!(ctx.claim("/a.md".into()));
        assert!(ctx.claim("/a.md#intro".into()));
        assert_eq!(ctx.node_count(), 2);
    }

    #[test]
    fn skip_reason_json() {
        let skipped = SkippedReference {
            reference: "@/b.md".into(),
            target: "/b.md".into(),
            depth: 1,
            reason: SkipReason::DepthLimit { max_depth: 1 },
        };
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["reason"], "depth_limit");
        assert_eq!(json["max_depth"], 1);
        assert_eq!(skipped.to_string(), "@/b.md (depth 1): depth limit 1 reached");
    }

    #[tokio::test(start_paused = true)]
    async fn elapsed_follows_tokio_clock() {
        let ctx = TraversalContext::new();
        tokio::time::advance(Duration::from_secs(5)).await;
        assert!(ctx.elapsed() >= Duration::from_secs(5));
    }
}
