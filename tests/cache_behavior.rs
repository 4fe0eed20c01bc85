//! Result caching: in-process memoization, persisted hits, staleness
//! checking in debug mode, and cache key shapes.

mod common;

use std::collections::HashMap;
use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use taghint::cache::{CacheStore, CachedEntry, CachedReader, MemoryStore, file_mtime};
use taghint::{Annotation, GenericTag};

/// Store that counts traffic and exposes its keys.
#[derive(Default)]
struct SpyStore {
    entries: Mutex<HashMap<String, CachedEntry>>,
    fetches: AtomicUsize,
    saves: AtomicUsize,
}

impl SpyStore {
    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.lock().keys().cloned().collect();
        keys.sort();
        keys
    }
}

impl CacheStore for SpyStore {
    fn fetch(&self, key: &str) -> Option<CachedEntry> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().get(key).cloned()
    }

    fn save(&self, key: &str, entry: CachedEntry) {
        self.saves.fetch_add(1, Ordering::SeqCst);
        self.entries.lock().insert(key.to_string(), entry);
    }
}

/// A marker sequence that no doc comment in these tests produces, so a
/// cache hit is distinguishable from a recomputation.
fn sentinel() -> Vec<Annotation> {
    vec![Annotation::Generic(GenericTag {
        name: "sentinel".into(),
        class: "Sentinel".into(),
        value: None,
    })]
}

/// `App\User` with a class-level generic tag, a property, and a method.
fn user_class() -> taghint::ClassMeta {
    let mut user = common::class("App\\User");
    user.doc_comment = Some("/** @\\Vendor\\Marker */".into());
    user.properties = vec![common::property("age", "/** @var int */")];
    user.methods = vec![common::method("load", "/** @return bool */")];
    user
}

#[test]
fn repeated_reads_hit_the_in_process_map() {
    let store = Arc::new(SpyStore::default());
    let reader = CachedReader::new(common::reader(vec![user_class()]), store.clone(), false);

    let first = reader.get_class_annotations("App\\User").unwrap();
    let second = reader.get_class_annotations("App\\User").unwrap();

    assert_eq!(first, second);
    assert_eq!(store.fetches(), 1, "second read must not touch the store");
    assert_eq!(store.saves(), 1, "result is persisted exactly once");
}

#[test]
fn persisted_hits_skip_computation_outside_debug() {
    let store = Arc::new(MemoryStore::new());
    store.save("App\\User", CachedEntry::Annotations(sentinel()));

    let reader = CachedReader::new(common::reader(vec![user_class()]), store, false);
    let annotations = reader.get_class_annotations("App\\User").unwrap();

    assert_eq!(annotations, sentinel());
}

#[test]
fn debug_recomputes_entries_older_than_the_source() {
    let file = tempfile::NamedTempFile::new().unwrap();
    fs::write(file.path(), "<?php class User {}").unwrap();

    let mut user = user_class();
    user.file = Some(file.path().to_path_buf());

    let store = Arc::new(SpyStore::default());
    store.save("App\\User", CachedEntry::Annotations(sentinel()));
    store.save("[C]App\\User", CachedEntry::Timestamp(0));

    let reader = CachedReader::new(common::reader(vec![user]), store.clone(), true);
    let annotations = reader.get_class_annotations("App\\User").unwrap();

    assert_ne!(annotations, sentinel(), "stale entry must be recomputed");
    assert_eq!(
        store.entries.lock().get("App\\User"),
        Some(&CachedEntry::Annotations(annotations)),
        "recomputed result overwrites the stale entry"
    );
    match store.entries.lock().get("[C]App\\User") {
        Some(CachedEntry::Timestamp(ts)) => {
            assert!(*ts >= file_mtime(file.path()), "timestamp must be renewed")
        }
        other => panic!("expected a renewed timestamp, got {:?}", other),
    }
}

#[test]
fn debug_trusts_entries_newer_than_the_source() {
    let file = tempfile::NamedTempFile::new().unwrap();
    fs::write(file.path(), "<?php class User {}").unwrap();

    let mut user = user_class();
    user.file = Some(file.path().to_path_buf());

    let store = Arc::new(MemoryStore::new());
    store.save("App\\User", CachedEntry::Annotations(sentinel()));
    store.save("[C]App\\User", CachedEntry::Timestamp(u64::MAX));

    let reader = CachedReader::new(common::reader(vec![user]), store, true);
    assert_eq!(
        reader.get_class_annotations("App\\User").unwrap(),
        sentinel()
    );
}

#[test]
fn entries_for_fileless_classes_are_always_fresh() {
    // No known source files means last modification 0, so even an entry
    // without a stored timestamp passes the debug check.
    let store = Arc::new(MemoryStore::new());
    store.save("App\\User", CachedEntry::Annotations(sentinel()));

    let reader = CachedReader::new(common::reader(vec![user_class()]), store, true);
    assert_eq!(
        reader.get_class_annotations("App\\User").unwrap(),
        sentinel()
    );
}

#[test]
fn clearing_the_loaded_map_refetches_from_the_store() {
    let store = Arc::new(MemoryStore::new());
    let reader = CachedReader::new(common::reader(vec![user_class()]), store.clone(), false);

    let computed = reader.get_class_annotations("App\\User").unwrap();
    store.save("App\\User", CachedEntry::Annotations(sentinel()));

    // Still served from the in-process map.
    assert_eq!(reader.get_class_annotations("App\\User").unwrap(), computed);

    reader.clear_loaded_annotations();
    assert_eq!(
        reader.get_class_annotations("App\\User").unwrap(),
        sentinel()
    );
}

#[test]
fn entity_kinds_get_distinct_cache_keys() {
    let store = Arc::new(SpyStore::default());
    let reader = CachedReader::new(common::reader(vec![user_class()]), store.clone(), false);

    reader.get_class_annotations("App\\User").unwrap();
    reader.get_property_annotations("App\\User", "age").unwrap();
    reader.get_method_annotations("App\\User", "load").unwrap();

    assert_eq!(
        store.keys(),
        vec!["App\\User", "App\\User#load", "App\\User$age"]
    );
}
