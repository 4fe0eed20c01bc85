//! Crate-wide error type.

use thiserror::Error;

/// Errors surfaced by the annotation reader and tag parser.
///
/// Per-token and per-tag resolution failures are deliberately *not*
/// errors — they degrade silently (see the hint parser). Only
/// configuration problems, unknown entities, and unrecognized
/// non-ignored tags reach the caller.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AnnotationError {
    /// The reflector reports that doc comments are discarded by the host
    /// runtime configuration. No annotation can ever be recovered, so
    /// reader construction fails immediately.
    #[error("doc comments are unavailable: comment retention is disabled in the host configuration")]
    CommentsUnavailable,

    /// A tag name could not be resolved to a known annotation class and
    /// was not in the ignored names or namespaces.
    #[error("unrecognized annotation `@{name}` in {context}")]
    UnresolvedTag { name: String, context: String },

    #[error("unknown class `{0}`")]
    UnknownClass(String),

    #[error("unknown property `{class}::${property}`")]
    UnknownProperty { class: String, property: String },

    #[error("unknown method `{class}::{method}()`")]
    UnknownMethod { class: String, method: String },
}
