//! Recursive reference loader
//!
//! Expands a document's outbound references into a tree of loaded content.
//! Each reference is handled in four steps:
//!
//! 1. Budget check: time (hard failure), depth and node count (silent stop)
//! 2. Cycle check against the traversal's visited set
//! 3. Load the document or section from the content provider
//! 4. Extract nested references from the loaded content and recurse
//!
//! A failing reference removes only its own branch. Siblings keep loading.

use crate::config::ResolverConfig;
use crate::context::{SkipReason, SkippedReference, TraversalContext};
use crate::error::{ResolveError, ResolveResult};
use crate::hierarchy::HierarchicalContent;
use futures::future::BoxFuture;
use mdref_address::AddressParser;
use mdref_content::{ContentProvider, NormalizedReference, ReferenceExtractor};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Counters for one resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    /// Nodes loaded into the tree
    pub nodes_loaded: usize,
    /// References dropped
    pub skipped: usize,
    /// Deepest depth loaded
    pub max_depth_reached: usize,
    /// Wall-clock time spent
    pub elapsed_ms: u64,
}

/// Result of a resolution call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Root nodes, one per loadable input reference, in input order
    pub nodes: Vec<HierarchicalContent>,
    /// Every reference that produced no node
    pub skipped: Vec<SkippedReference>,
    /// Counters
    pub stats: TraversalStats,
}

/// Content loaded for one reference
struct Loaded {
    title: String,
    content: String,
    namespace: String,
}

type Branch = Result<HierarchicalContent, SkipReason>;

/// Resolves references into bounded, cycle-free content trees
#[derive(Debug, Clone)]
pub struct ReferenceLoader {
    provider: Arc<dyn ContentProvider>,
    extractor: Arc<dyn ReferenceExtractor>,
    parser: AddressParser,
    config: ResolverConfig,
}

impl ReferenceLoader {
    /// Create loader with an uncached address parser
    pub fn new(
        provider: Arc<dyn ContentProvider>,
        extractor: Arc<dyn ReferenceExtractor>,
        config: ResolverConfig,
    ) -> Self {
        Self {
            provider,
            extractor,
            parser: AddressParser::uncached(),
            config,
        }
    }

    /// Validate reference targets through a shared parser
    #[must_use]
    pub fn with_parser(mut self, parser: AddressParser) -> Self {
        self.parser = parser;
        self
    }

    /// Budgets in effect
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve references with a fresh traversal
    ///
    /// Nothing is pre-visited, so when `A` references `B` and `B` references
    /// `A`, the result is `B` with an `A` child. Use
    /// [`load_references_from`](Self::load_references_from) when the
    /// referencing document is known so that links back to it are cut.
    ///
    /// # Errors
    /// Only [`ResolveError::Timeout`]; every other failure drops a branch.
    pub async fn load_references(&self, references: &[NormalizedReference]) -> ResolveResult<Resolution> {
        let mut ctx = TraversalContext::new();
        self.resolve(references, &mut ctx).await
    }

    /// Resolve references taken from `origin`
    ///
    /// The origin counts as visited, so references back to it are cut.
    ///
    /// # Errors
    /// Only [`ResolveError::Timeout`]; every other failure drops a branch.
    pub async fn load_references_from(
        &self,
        origin: &str,
        references: &[NormalizedReference],
    ) -> ResolveResult<Resolution> {
        let origin = self
            .parser
            .parse_document_address(origin)
            .map_or_else(|_| origin.to_string(), |doc| doc.path().to_string());
        let mut ctx = TraversalContext::seeded(origin);
        self.resolve(references, &mut ctx).await
    }

    /// Resolve the references found in a document's own content
    ///
    /// # Errors
    /// `DocumentNotFound` if the document does not exist, provider errors
    /// for the root load, and [`ResolveError::Timeout`].
    pub async fn load_document(&self, path: &str) -> ResolveResult<Resolution> {
        let document = self.parser.parse_document_address(path)?;
        let content = self
            .provider
            .read_document_content(document.path())
            .await?
            .ok_or_else(|| mdref_address::AddressingError::document_not_found(document.path()))?;
        let references = self.extractor.extract_normalized(&content, document.path());
        self.load_references_from(document.path(), &references).await
    }

    async fn resolve(
        &self,
        references: &[NormalizedReference],
        ctx: &mut TraversalContext,
    ) -> ResolveResult<Resolution> {
        let nodes = self.load_level(references, 0, ctx).await?;
        let skipped = ctx.take_skipped();
        let stats = TraversalStats {
            nodes_loaded: ctx.node_count(),
            skipped: skipped.len(),
            max_depth_reached: ctx.deepest(),
            elapsed_ms: millis(ctx.elapsed()),
        };

        tracing::info!(
            roots = nodes.len(),
            nodes = stats.nodes_loaded,
            skipped = stats.skipped,
            elapsed_ms = stats.elapsed_ms,
            "resolved references"
        );

        Ok(Resolution {
            nodes,
            skipped,
            stats,
        })
    }

    fn load_level<'a>(
        &'a self,
        references: &'a [NormalizedReference],
        depth: usize,
        ctx: &'a mut TraversalContext,
    ) -> BoxFuture<'a, ResolveResult<Vec<HierarchicalContent>>> {
        Box::pin(async move {
            let mut nodes = Vec::with_capacity(references.len());
            for reference in references {
                match self.load_one(reference, depth, ctx).await? {
                    Ok(node) => nodes.push(node),
                    Err(reason) => ctx.record_skip(SkippedReference {
                        reference: reference.original_ref.clone(),
                        target: reference.target_path(),
                        depth,
                        reason,
                    }),
                }
            }
            Ok(nodes)
        })
    }

    async fn load_one(
        &self,
        reference: &NormalizedReference,
        depth: usize,
        ctx: &mut TraversalContext,
    ) -> ResolveResult<Branch> {
        let elapsed = ctx.elapsed();
        if elapsed > self.config.timeout() {
            tracing::error!(
                elapsed_ms = millis(elapsed),
                limit_ms = self.config.timeout_ms,
                reference = reference.original_ref.as_str(),
                "reference resolution timed out"
            );
            return Err(ResolveError::Timeout {
                elapsed_ms: millis(elapsed),
                limit_ms: self.config.timeout_ms,
            });
        }
        if depth >= self.config.max_depth {
            tracing::debug!(depth, reference = reference.original_ref.as_str(), "depth limit reached");
            return Ok(Err(SkipReason::DepthLimit {
                max_depth: self.config.max_depth,
            }));
        }
        if ctx.node_count() >= self.config.max_nodes {
            tracing::warn!(
                max_nodes = self.config.max_nodes,
                reference = reference.original_ref.as_str(),
                "node budget exhausted"
            );
            return Ok(Err(SkipReason::NodeBudget {
                max_nodes: self.config.max_nodes,
            }));
        }

        let target = match self.target_path(reference) {
            Ok(target) => target,
            Err(reason) => return Ok(Err(reason)),
        };
        if !ctx.claim(target.clone()) {
            tracing::warn!(node = target.as_str(), depth, "reference already visited, skipping");
            return Ok(Err(SkipReason::AlreadyVisited));
        }

        let loaded = match self.fetch(reference).await {
            Ok(loaded) => loaded,
            Err(reason) => {
                tracing::warn!(node = target.as_str(), %reason, "failed to load reference");
                return Ok(Err(reason));
            }
        };
        tracing::debug!(node = target.as_str(), depth, "loaded reference");

        let nested: Vec<NormalizedReference> = self
            .extractor
            .extract_normalized(&loaded.content, &reference.document_path)
            .into_iter()
            .filter(|nested| !ctx.is_visited(&nested.target_path()))
            .collect();
        let children = self.load_level(&nested, depth + 1, ctx).await?;
        ctx.record_node(depth);

        Ok(Ok(HierarchicalContent {
            path: target,
            title: loaded.title,
            content: loaded.content,
            depth,
            namespace: loaded.namespace,
            children,
        }))
    }

    /// Canonical node path of a reference, validated through the parser
    fn target_path(&self, reference: &NormalizedReference) -> Result<String, SkipReason> {
        let invalid = |e: mdref_address::AddressingError| SkipReason::InvalidReference {
            message: e.to_string(),
        };
        match &reference.section_slug {
            None => self
                .parser
                .parse_document_address(&reference.document_path)
                .map(|doc| doc.path().to_string())
                .map_err(invalid),
            Some(slug) => self
                .parser
                .parse_section_address(slug, Some(&reference.document_path))
                .map(|section| section.full_path().to_string())
                .map_err(invalid),
        }
    }

    async fn fetch(&self, reference: &NormalizedReference) -> Result<Loaded, SkipReason> {
        let path = reference.document_path.as_str();
        let failure = |e: mdref_content::ProviderError| SkipReason::ProviderFailure {
            message: e.to_string(),
        };

        let document = self
            .provider
            .get_document(path)
            .await
            .map_err(failure)?
            .ok_or(SkipReason::DocumentNotFound)?;

        let (title, content) = match &reference.section_slug {
            None => {
                let content = self
                    .provider
                    .read_document_content(path)
                    .await
                    .map_err(failure)?
                    .ok_or(SkipReason::DocumentNotFound)?;
                (document.title().to_string(), content)
            }
            Some(slug) => {
                let missing = || SkipReason::SectionNotFound { slug: slug.clone() };
                let heading = document.heading(slug).ok_or_else(missing)?;
                let content = self
                    .provider
                    .get_section_content(path, slug)
                    .await
                    .map_err(failure)?
                    .ok_or_else(missing)?;
                (heading.title.clone(), content)
            }
        };

        Ok(Loaded {
            title,
            content,
            namespace: document.metadata.namespace.clone(),
        })
    }
}

fn millis(duration: std::time::Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
