use mdref_content::{
    AtReferenceExtractor, ContentProvider, MemoryContentProvider, ReferenceExtractor,
};

const INDEX: &str = "# Index

Start with @guides/start.md then @/api/auth.md#login.

```text
@/never.md
```

## Tasks

### Write docs

Depends on @#tasks/review-docs.

### Review docs
";

#[tokio::test]
async fn section_content_feeds_extractor() {
    let provider = MemoryContentProvider::new();
    provider.insert("/index.md", INDEX).unwrap();

    let extractor = AtReferenceExtractor::new();
    let section = provider
        .get_section_content("/index.md", "tasks/write-docs")
        .await
        .unwrap()
        .unwrap();

    let refs = extractor.extract_normalized(&section, "/index.md");
    assert_eq!(refs.len(), 1);
    assert_eq!(refs[0].target_path(), "/index.md#tasks/review-docs");
}

#[tokio::test]
async fn whole_document_references_in_order() {
    let provider = MemoryContentProvider::new();
    provider.insert("/index.md", INDEX).unwrap();

    let body = provider.read_document_content("/index.md").await.unwrap().unwrap();
    let targets: Vec<String> = AtReferenceExtractor
        .extract_normalized(&body, "/index.md")
        .iter()
        .map(|r| r.target_path())
        .collect();

    assert_eq!(
        targets,
        vec![
            "/guides/start.md",
            "/api/auth.md#login",
            "/index.md#tasks/review-docs",
        ]
    );
}

#[tokio::test]
async fn task_outline_is_structural() {
    let provider = MemoryContentProvider::new();
    provider.insert("/index.md", INDEX).unwrap();
    let doc = provider.get_document("/index.md").await.unwrap().unwrap();

    assert_eq!(
        mdref_address::list_task_slugs(&doc.headings),
        vec!["write-docs", "review-docs"]
    );
    assert!(mdref_address::is_task_section("write-docs", &doc.headings));
    assert!(!mdref_address::is_task_section("tasks", &doc.headings));
}
