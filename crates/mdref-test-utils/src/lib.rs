//! Testing utilities for the mdref workspace
//!
//! Scripted content providers and synthetic reference graphs.

#![allow(missing_docs)]

use async_trait::async_trait;
use dashmap::DashMap;
use mdref_content::{
    AtReferenceExtractor, ContentProvider, Document, FingerprintEntry, MemoryContentProvider,
    NormalizedReference, ProviderError, ProviderResult, ReferenceExtractor,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// In-memory provider that can be told to fail or stall for given documents
#[derive(Debug, Default)]
pub struct ScriptedProvider {
    inner: MemoryContentProvider,
    failures: DashMap<String, String>,
    delays: DashMap<String, Duration>,
    loads: AtomicUsize,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(self, path: &str, source: &str) -> Self {
        self.insert(path, source);
        self
    }

    pub fn insert(&self, path: &str, source: &str) {
        self.inner.insert(path, source).unwrap();
    }

    /// Every load of `path` fails with `message`
    pub fn fail_on(&self, path: &str, message: &str) {
        self.failures.insert(path.to_string(), message.to_string());
    }

    /// Every load of `path` sleeps for `delay` first
    pub fn delay_on(&self, path: &str, delay: Duration) {
        self.delays.insert(path.to_string(), delay);
    }

    /// Number of `get_document` calls served so far
    pub fn load_count(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn inner(&self) -> &MemoryContentProvider {
        &self.inner
    }

    async fn script(&self, path: &str) -> ProviderResult<()> {
        let delay = self.delays.get(path).map(|d| *d.value());
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        match self.failures.get(path) {
            Some(message) => Err(ProviderError::unavailable(path, message.value().clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ContentProvider for ScriptedProvider {
    async fn get_document(&self, path: &str) -> ProviderResult<Option<Document>> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        self.script(path).await?;
        self.inner.get_document(path).await
    }

    async fn get_section_content(&self, path: &str, slug: &str) -> ProviderResult<Option<String>> {
        self.script(path).await?;
        self.inner.get_section_content(path, slug).await
    }

    async fn read_document_content(&self, path: &str) -> ProviderResult<Option<String>> {
        self.script(path).await?;
        self.inner.read_document_content(path).await
    }

    async fn list_document_fingerprints(&self) -> ProviderResult<Vec<FingerprintEntry>> {
        self.inner.list_document_fingerprints().await
    }
}

/// A synthetic document graph plus the references of its entry document
#[derive(Debug)]
pub struct GraphFixture {
    pub provider: Arc<ScriptedProvider>,
    /// Path of the document the references were taken from
    pub origin: String,
    /// Normalized references of the origin document
    pub references: Vec<NormalizedReference>,
    /// Number of documents in the graph, origin included
    pub documents: usize,
}

impl GraphFixture {
    fn build(origin: &str, sources: Vec<(String, String)>) -> Self {
        let provider = ScriptedProvider::new();
        let mut origin_source = String::new();
        for (path, source) in &sources {
            provider.insert(path, source);
            if path == origin {
                origin_source.clone_from(source);
            }
        }
        let references = AtReferenceExtractor.extract_normalized(&origin_source, origin);
        Self {
            provider: Arc::new(provider),
            origin: origin.to_string(),
            references,
            documents: sources.len(),
        }
    }
}

fn doc_source(title: &str, targets: &[String]) -> String {
    let mut source = format!("# {title}\n\n");
    for target in targets {
        source.push_str(&format!("- @{target}\n"));
    }
    source
}

/// `/chain/0.md -> /chain/1.md -> ... -> /chain/{len-1}.md`
pub fn chain_graph(len: usize) -> GraphFixture {
    let sources = (0..len)
        .map(|i| {
            let next: Vec<String> = if i + 1 < len {
                vec![format!("/chain/{}.md", i + 1)]
            } else {
                Vec::new()
            };
            (format!("/chain/{i}.md"), doc_source(&format!("Chain {i}"), &next))
        })
        .collect();
    GraphFixture::build("/chain/0.md", sources)
}

/// `/cycle/0.md -> /cycle/1.md -> ... -> /cycle/{len-1}.md -> /cycle/0.md`
pub fn cycle_graph(len: usize) -> GraphFixture {
    let sources = (0..len)
        .map(|i| {
            let next = vec![format!("/cycle/{}.md", (i + 1) % len)];
            (format!("/cycle/{i}.md"), doc_source(&format!("Cycle {i}"), &next))
        })
        .collect();
    GraphFixture::build("/cycle/0.md", sources)
}

/// A tree of distinct documents: `/wide/root.md` references `fanout`
/// documents, each of which references `fanout` more, for `levels` levels
///
/// Reachable documents below the root: `fanout + fanout^2 + ... + fanout^levels`.
pub fn wide_graph(fanout: usize, levels: usize) -> GraphFixture {
    let mut sources = Vec::new();
    let mut frontier = vec!["/wide/root.md".to_string()];

    for level in 1..=levels {
        let mut next_frontier = Vec::new();
        for (parent_idx, parent) in frontier.iter().enumerate() {
            let children: Vec<String> = (0..fanout)
                .map(|i| format!("/wide/l{level}/n{}.md", parent_idx * fanout + i))
                .collect();
            sources.push((parent.clone(), doc_source(parent, &children)));
            next_frontier.extend(children);
        }
        frontier = next_frontier;
    }
    for leaf in frontier {
        sources.push((leaf.clone(), doc_source(&leaf, &[])));
    }

    GraphFixture::build("/wide/root.md", sources)
}
