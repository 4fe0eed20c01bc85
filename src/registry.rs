//! Registry of tag names and namespaces that never cause a parse error.
//!
//! Docblocks are full of tags that are documentation, not annotations —
//! `@see`, `@since`, `@author` and friends. The registry suppresses the
//! unrecognized-tag error for those. It is a caller-owned value seeded
//! from an immutable built-in list; extending it is an explicit mutation
//! on the reader's registry, not ambient global state.

use std::collections::HashSet;

/// Built-in tag names that are ignored when they cannot be resolved to
/// an annotation class. Names are case sensitive.
pub const DEFAULT_IGNORED_NAMES: &[&str] = &[
    // Annotation tooling tags
    "Annotation",
    "Attribute",
    "Attributes",
    "Required",
    "Target",
    // Widely used tags that are not part of any phpdoc standard
    "fix",
    "fixme",
    "override",
    // PHPDocumentor 1 tags
    "abstract",
    "access",
    "code",
    "deprec",
    "endcode",
    "exception",
    "final",
    "ingroup",
    "inheritdoc",
    "inheritDoc",
    "magic",
    "name",
    "toc",
    "tutorial",
    "private",
    "static",
    "staticvar",
    "staticVar",
    "throw",
    // PHPDocumentor 2 tags
    "api",
    "author",
    "category",
    "copyright",
    "deprecated",
    "example",
    "filesource",
    "global",
    "ignore",
    "internal",
    "license",
    "link",
    "method",
    "package",
    "property",
    "property-read",
    "property-write",
    "see",
    "since",
    "source",
    "subpackage",
    "throws",
    "todo",
    "TODO",
    "usedby",
    "uses",
    "version",
    // PHPUnit tags
    "codeCoverageIgnore",
    "codeCoverageIgnoreStart",
    "codeCoverageIgnoreEnd",
    // PHPCheckStyle
    "SuppressWarnings",
    // PHPStorm
    "noinspection",
    // PEAR
    "package_version",
    // PlantUML
    "startuml",
    "enduml",
];

/// Ignored tag names and namespaces, extendable by the caller.
#[derive(Debug, Clone)]
pub struct IgnoreRegistry {
    names: HashSet<String>,
    namespaces: HashSet<String>,
}

impl Default for IgnoreRegistry {
    fn default() -> Self {
        IgnoreRegistry {
            names: DEFAULT_IGNORED_NAMES
                .iter()
                .map(|name| name.to_string())
                .collect(),
            namespaces: HashSet::new(),
        }
    }
}

impl IgnoreRegistry {
    /// An empty registry, without the built-in defaults.
    pub fn empty() -> Self {
        IgnoreRegistry {
            names: HashSet::new(),
            namespaces: HashSet::new(),
        }
    }

    /// Add a tag name to the ignored set. Case sensitive.
    pub fn add_ignored_name(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Add a namespace prefix whose tags are all ignored.
    pub fn add_ignored_namespace(&mut self, namespace: impl Into<String>) {
        self.namespaces.insert(namespace.into());
    }

    pub fn is_ignored_name(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn names(&self) -> &HashSet<String> {
        &self.names
    }

    pub fn namespaces(&self) -> &HashSet<String> {
        &self.namespaces
    }
}
