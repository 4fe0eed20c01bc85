//! Docblock type-expression parsing and annotation reading.
//!
//! Reads `/** ... */` doc comments attached to reflected classes,
//! properties, and methods, and turns their tags into a typed model:
//!
//! - `@var`, `@param`, and `@return` tag text becomes a [`TypeHint`] —
//!   unions split on `|`, `Type[]` and `array<Type>` notation, `mixed`
//!   expansion, and configurable type filtering, with class names
//!   resolved against the entity's import table.
//! - every other tag resolves through the imports into a generic
//!   annotation, or is skipped when its name is registered as ignored
//!   (including via `@IgnoreAnnotation` on the class itself).
//!
//! [`AnnotationReader`] coordinates the above per entity; wrap it in a
//! [`CachedReader`] to memoize results in-process and persist them
//! through a [`CacheStore`], with modification-time staleness checks in
//! debug mode.
//!
//! Reflection is abstracted behind [`EntityReflector`] and
//! [`ImportScanner`]; [`InMemoryReflector`] implements both for tests
//! and embedders that build class metadata themselves.
//!
//! [`TypeHint`]: types::TypeHint
//! [`AnnotationReader`]: reader::AnnotationReader
//! [`CachedReader`]: cache::CachedReader
//! [`CacheStore`]: cache::CacheStore
//! [`EntityReflector`]: reflect::EntityReflector
//! [`ImportScanner`]: reflect::ImportScanner
//! [`InMemoryReflector`]: reflect::InMemoryReflector

pub mod cache;
pub mod docblock;
pub mod error;
pub mod imports;
pub mod reader;
pub mod reflect;
pub mod registry;
pub mod resolution;
pub mod types;
mod util;

pub use cache::{CacheStore, CachedEntry, CachedReader, MemoryStore};
pub use docblock::{DocParser, ParseContext, TagParser, Target};
pub use error::AnnotationError;
pub use imports::ImportTable;
pub use reader::AnnotationReader;
pub use reflect::{
    ClassMeta, EntityReflector, ImportScanner, InMemoryReflector, MethodMeta, ParameterMeta,
    PropertyMeta,
};
pub use registry::IgnoreRegistry;
pub use types::{Annotation, GenericTag, HintKind, HintOutcome, Type, TypeHint};
