use mdref_address::{AddressCache, AddressParser};
use mdref_cache::{BatchAddressCache, LruAddressCache};
use proptest::prelude::*;
use std::sync::Arc;

fn strategies() -> Vec<Arc<dyn AddressCache>> {
    vec![
        Arc::new(LruAddressCache::default()),
        Arc::new(BatchAddressCache::default()),
    ]
}

#[test]
fn invalidation_removes_document_and_its_sections() {
    for cache in strategies() {
        let parser = AddressParser::new(Arc::clone(&cache));

        parser.parse_document_address("/api/auth.md").unwrap();
        parser.parse_section_address("login", Some("/api/auth.md")).unwrap();
        parser.parse_section_address("/api/auth.md#logout", None).unwrap();
        parser.parse_document_address("/api/users.md").unwrap();
        parser.parse_section_address("/api/users.md#list", None).unwrap();

        parser.invalidate_document("api/auth.md").unwrap();

        assert!(cache.get_document("/api/auth.md").is_none(), "{cache:?}");
        assert!(cache.get_section("login", Some("/api/auth.md")).is_none());
        assert!(cache.get_section("/api/auth.md#logout", None).is_none());

        assert!(cache.get_document("/api/users.md").is_some());
        assert!(cache.get_section("/api/users.md#list", None).is_some());
    }
}

#[test]
fn task_and_section_entries_are_distinct() {
    for cache in strategies() {
        let parser = AddressParser::new(Arc::clone(&cache));
        let section = parser.parse_section_address("/plan.md#ship", None).unwrap();
        let task = parser.parse_task_address("/plan.md#ship", None).unwrap();

        assert_eq!(section.full_path(), task.full_path());
        assert!(cache.get_section("/plan.md#ship", None).is_some());
        assert!(cache.get_task("/plan.md#ship", None).is_some());
    }
}

#[test]
fn repeated_parse_returns_cached_instance() {
    for cache in strategies() {
        let parser = AddressParser::new(Arc::clone(&cache));
        let first = parser.parse_document_address("/a.md").unwrap();
        let second = parser.parse_document_address("/a.md").unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        // Different raw text, equal value, separate slot
        let third = parser.parse_document_address("a.md").unwrap();
        assert_eq!(*first, *third);
        assert_eq!(cache.len(), 2);
    }
}

#[test]
fn context_is_part_of_the_section_key() {
    for cache in strategies() {
        let parser = AddressParser::new(Arc::clone(&cache));
        let a = parser.parse_section_address("intro", Some("/a.md")).unwrap();
        let b = parser.parse_section_address("intro", Some("/b.md")).unwrap();
        assert_eq!(a.full_path(), "/a.md#intro");
        assert_eq!(b.full_path(), "/b.md#intro");
    }
}

#[test]
fn clear_drops_everything() {
    for cache in strategies() {
        let parser = AddressParser::new(Arc::clone(&cache));
        parser.parse_section_address("/a.md#x", None).unwrap();
        cache.clear();
        assert!(cache.is_empty());
    }
}

proptest! {
    #[test]
    fn prop_lru_never_exceeds_capacity(
        capacity in 1..20usize,
        names in proptest::collection::vec("[a-z]{1,6}", 1..80),
    ) {
        let cache = Arc::new(LruAddressCache::new(capacity));
        let parser = AddressParser::new(cache.clone());
        for name in &names {
            parser.parse_document_address(&format!("/{name}.md")).unwrap();
            prop_assert!(cache.len() <= capacity);
        }
        // The most recent parse always survives
        let last = format!("/{}.md", names[names.len() - 1]);
        prop_assert!(cache.get_document(&last).is_some());
    }
}
