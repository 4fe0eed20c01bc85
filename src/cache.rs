//! Dependency-aware annotation result caching.
//!
//! [`CachedReader`] wraps an [`AnnotationReader`] behind a two-level
//! cache: an in-process map of results already materialized this run,
//! and a pluggable [`CacheStore`] for persisted results. In debug mode
//! every persisted hit is checked for staleness against the newest
//! modification time of the class and everything it inherits from; a
//! stale entry is recomputed and overwritten.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::AnnotationError;
use crate::imports::ImportTable;
use crate::reader::{AnnotationReader, annotation_matches};
use crate::reflect::{ClassMeta, EntityReflector};
use crate::types::Annotation;

/// Prefix distinguishing a freshness-timestamp entry from the result
/// entry it accompanies.
const TIME_KEY_PREFIX: &str = "[C]";

/// A persisted cache value: either a computed annotation sequence or
/// the save-time timestamp that guards one.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum CachedEntry {
    Annotations(Vec<Annotation>),
    Timestamp(u64),
}

/// Persistence for computed annotation results.
///
/// Keys are opaque strings; implementations only store and retrieve.
/// A `fetch` miss and a corrupt entry look the same to the reader, so
/// stores may evict or drop entries freely.
pub trait CacheStore: Send + Sync {
    fn fetch(&self, key: &str) -> Option<CachedEntry>;
    fn save(&self, key: &str, entry: CachedEntry);
}

/// A [`CacheStore`] holding entries in process memory. Useful as a
/// default and in tests; survives exactly as long as the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, CachedEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl CacheStore for MemoryStore {
    fn fetch(&self, key: &str) -> Option<CachedEntry> {
        self.entries.lock().get(key).cloned()
    }

    fn save(&self, key: &str, entry: CachedEntry) {
        self.entries.lock().insert(key.to_string(), entry);
    }
}

/// A caching decorator over [`AnnotationReader`].
pub struct CachedReader {
    delegate: AnnotationReader,
    cache: Arc<dyn CacheStore>,
    /// With debug on, persisted entries are validated against source
    /// file modification times before use and timestamps are written
    /// alongside results. With debug off, a persisted hit is always
    /// trusted.
    debug: bool,
    loaded: Mutex<HashMap<String, Vec<Annotation>>>,
}

impl CachedReader {
    pub fn new(delegate: AnnotationReader, cache: Arc<dyn CacheStore>, debug: bool) -> Self {
        CachedReader {
            delegate,
            cache,
            debug,
            loaded: Mutex::new(HashMap::new()),
        }
    }

    pub fn delegate(&self) -> &AnnotationReader {
        &self.delegate
    }

    /// Drop the in-process result map. Persisted entries are kept; the
    /// next read re-fetches (and in debug mode re-validates) them.
    pub fn clear_loaded_annotations(&self) {
        self.loaded.lock().clear();
    }

    // ─── Annotation retrieval ───────────────────────────────────────────

    pub fn get_class_annotations(&self, class: &str) -> Result<Vec<Annotation>, AnnotationError> {
        let meta = self.class_meta(class)?;
        let key = meta.name.clone();
        self.cached(&key, &meta, || self.delegate.get_class_annotations(class))
    }

    pub fn get_property_annotations(
        &self,
        class: &str,
        property: &str,
    ) -> Result<Vec<Annotation>, AnnotationError> {
        let meta = self.class_meta(class)?;
        let key = format!("{}${}", meta.name, property);
        self.cached(&key, &meta, || {
            self.delegate.get_property_annotations(class, property)
        })
    }

    pub fn get_method_annotations(
        &self,
        class: &str,
        method: &str,
    ) -> Result<Vec<Annotation>, AnnotationError> {
        let meta = self.class_meta(class)?;
        let key = format!("{}#{}", meta.name, method);
        self.cached(&key, &meta, || {
            self.delegate.get_method_annotations(class, method)
        })
    }

    pub fn get_class_annotation(
        &self,
        class: &str,
        annotation: &str,
    ) -> Result<Option<Annotation>, AnnotationError> {
        Ok(self
            .get_class_annotations(class)?
            .into_iter()
            .find(|a| annotation_matches(a, annotation)))
    }

    pub fn get_property_annotation(
        &self,
        class: &str,
        property: &str,
        annotation: &str,
    ) -> Result<Option<Annotation>, AnnotationError> {
        Ok(self
            .get_property_annotations(class, property)?
            .into_iter()
            .find(|a| annotation_matches(a, annotation)))
    }

    pub fn get_method_annotation(
        &self,
        class: &str,
        method: &str,
        annotation: &str,
    ) -> Result<Option<Annotation>, AnnotationError> {
        Ok(self
            .get_method_annotations(class, method)?
            .into_iter()
            .find(|a| annotation_matches(a, annotation)))
    }

    // ─── Import pass-through ────────────────────────────────────────────

    // Import tables are already memoized per class by the delegate, so
    // they bypass the result cache entirely.

    pub fn get_class_imports(&self, class: &str) -> Result<ImportTable, AnnotationError> {
        self.delegate.get_class_imports(class)
    }

    pub fn get_property_imports(
        &self,
        class: &str,
        property: &str,
    ) -> Result<ImportTable, AnnotationError> {
        self.delegate.get_property_imports(class, property)
    }

    pub fn get_method_imports(
        &self,
        class: &str,
        method: &str,
    ) -> Result<ImportTable, AnnotationError> {
        self.delegate.get_method_imports(class, method)
    }

    // ─── Internals ──────────────────────────────────────────────────────

    fn class_meta(&self, name: &str) -> Result<ClassMeta, AnnotationError> {
        self.delegate
            .reflector()
            .class(name)
            .ok_or_else(|| AnnotationError::UnknownClass(name.to_string()))
    }

    fn cached<F>(
        &self,
        key: &str,
        meta: &ClassMeta,
        compute: F,
    ) -> Result<Vec<Annotation>, AnnotationError>
    where
        F: FnOnce() -> Result<Vec<Annotation>, AnnotationError>,
    {
        if let Some(annotations) = self.loaded.lock().get(key) {
            trace!(key, "in-process cache hit");
            return Ok(annotations.clone());
        }

        if let Some(CachedEntry::Annotations(annotations)) = self.cache.fetch(key)
            && (!self.debug || self.is_fresh(key, meta))
        {
            trace!(key, "persisted cache hit");
            self.loaded
                .lock()
                .insert(key.to_string(), annotations.clone());
            return Ok(annotations);
        }

        debug!(key, "cache miss, computing annotations");
        let annotations = compute()?;
        self.save(key, &annotations);
        self.loaded
            .lock()
            .insert(key.to_string(), annotations.clone());
        Ok(annotations)
    }

    /// Whether the persisted entry for `key` postdates every source
    /// file the class transitively depends on. A class with no known
    /// files has last modification 0 and is always fresh.
    fn is_fresh(&self, key: &str, meta: &ClassMeta) -> bool {
        let last_mod = last_modification(meta, self.delegate.reflector().as_ref());
        let stored = match self.cache.fetch(&format!("{TIME_KEY_PREFIX}{key}")) {
            Some(CachedEntry::Timestamp(ts)) => ts,
            _ => 0,
        };
        stored >= last_mod
    }

    fn save(&self, key: &str, annotations: &[Annotation]) {
        self.cache
            .save(key, CachedEntry::Annotations(annotations.to_vec()));
        if self.debug {
            self.cache.save(
                &format!("{TIME_KEY_PREFIX}{key}"),
                CachedEntry::Timestamp(unix_now()),
            );
        }
    }
}

// ─── Modification times ─────────────────────────────────────────────────

/// The newest modification time (unix seconds) across the class's own
/// file, its parent chain, its interfaces, and its traits, all walked
/// recursively. Entities without a backing file contribute 0.
pub fn last_modification(meta: &ClassMeta, reflector: &dyn EntityReflector) -> u64 {
    let mut newest = meta.file.as_deref().map(file_mtime).unwrap_or(0);

    if let Some(parent) = &meta.parent
        && let Some(parent_meta) = reflector.class(parent)
    {
        newest = newest.max(last_modification(&parent_meta, reflector));
    }
    for interface in &meta.interfaces {
        if let Some(interface_meta) = reflector.class(interface) {
            newest = newest.max(last_modification(&interface_meta, reflector));
        }
    }
    for trait_name in &meta.traits {
        if let Some(trait_meta) = reflector.class(trait_name) {
            newest = newest.max(trait_last_modification(&trait_meta, reflector));
        }
    }

    newest
}

/// Trait modification times only recurse into further traits; traits
/// have no parent chain or interface list of their own to consider.
pub fn trait_last_modification(meta: &ClassMeta, reflector: &dyn EntityReflector) -> u64 {
    let mut newest = meta.file.as_deref().map(file_mtime).unwrap_or(0);
    for trait_name in &meta.traits {
        if let Some(trait_meta) = reflector.class(trait_name) {
            newest = newest.max(trait_last_modification(&trait_meta, reflector));
        }
    }
    newest
}

/// Modification time of a file in unix seconds. A missing or unreadable
/// file yields 0, which means "always fresh" to the staleness check.
pub fn file_mtime(path: &Path) -> u64 {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
