//! Reflected entity metadata and the reflector/scanner traits.
//!
//! The reader never introspects source itself; it consumes metadata
//! through [`EntityReflector`] (class lookup) and [`ImportScanner`]
//! (use-statement extraction). [`InMemoryReflector`] is a map-backed
//! implementation of both, suitable for embedders that extract class
//! information up front (and for tests).

use std::collections::HashMap;
use std::path::PathBuf;

use serde_json::Value;

/// Reflected information about one method parameter.
#[derive(Debug, Clone, Default)]
pub struct ParameterMeta {
    /// The parameter name WITHOUT the `$` prefix.
    pub name: String,
    /// The declared default value, when reflection reports one.
    pub default_value: Option<Value>,
}

/// Reflected information about one property.
#[derive(Debug, Clone, Default)]
pub struct PropertyMeta {
    /// The property name WITHOUT the `$` prefix.
    pub name: String,
    /// The property's doc comment, `/** ... */` markers included.
    pub doc_comment: Option<String>,
}

/// Reflected information about one method.
#[derive(Debug, Clone, Default)]
pub struct MethodMeta {
    pub name: String,
    /// The method's doc comment, `/** ... */` markers included.
    pub doc_comment: Option<String>,
    /// Ordered parameter list.
    pub parameters: Vec<ParameterMeta>,
    /// The file the method body physically lives in. Differs from the
    /// class file when the method comes from a trait.
    pub file: Option<PathBuf>,
}

/// Reflected information about one class, interface, or trait.
///
/// All data is owned so nothing depends on the lifetime of whatever
/// produced it.
#[derive(Debug, Clone, Default)]
pub struct ClassMeta {
    /// Fully-qualified name, no leading `\`.
    pub name: String,
    /// Namespace portion of the name. Empty for the global namespace.
    pub namespace: String,
    /// The class-level doc comment, `/** ... */` markers included.
    pub doc_comment: Option<String>,
    /// Path of the defining source file, when known.
    pub file: Option<PathBuf>,
    /// FQN of the parent class from the `extends` clause, if any.
    pub parent: Option<String>,
    /// FQNs of implemented interfaces.
    pub interfaces: Vec<String>,
    /// FQNs of used traits.
    pub traits: Vec<String>,
    /// Declared use-statement imports of the defining file:
    /// alias → fully-qualified name.
    pub imports: HashMap<String, String>,
    /// Declared property default values, keyed by property name.
    pub default_properties: HashMap<String, Value>,
    pub properties: Vec<PropertyMeta>,
    pub methods: Vec<MethodMeta>,
}

impl ClassMeta {
    pub fn property(&self, name: &str) -> Option<&PropertyMeta> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn method(&self, name: &str) -> Option<&MethodMeta> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn has_property(&self, name: &str) -> bool {
        self.property(name).is_some()
    }

    pub fn has_method(&self, name: &str) -> bool {
        self.method(name).is_some()
    }
}

/// Source of reflected class metadata.
pub trait EntityReflector: Send + Sync {
    /// Look up a class by fully-qualified name. A leading `\` is
    /// accepted and ignored.
    fn class(&self, name: &str) -> Option<ClassMeta>;

    /// Whether a class with this name is known/loadable. Used by name
    /// resolution to validate candidate qualified names.
    fn class_exists(&self, name: &str) -> bool {
        self.class(name).is_some()
    }

    /// Whether the host configuration retains doc comments at all.
    /// When false, reader construction fails — nothing can be read.
    fn doc_comments_available(&self) -> bool {
        true
    }
}

/// Source of use-statement imports for a class's defining file.
pub trait ImportScanner: Send + Sync {
    /// Mapping from short alias to fully-qualified name.
    fn imports_of(&self, class: &ClassMeta) -> HashMap<String, String>;
}

/// Map-backed reflector holding pre-extracted class metadata.
#[derive(Debug, Default)]
pub struct InMemoryReflector {
    classes: HashMap<String, ClassMeta>,
}

impl InMemoryReflector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a class under its own fully-qualified name.
    pub fn add(&mut self, class: ClassMeta) {
        self.classes.insert(class.name.clone(), class);
    }

    pub fn with(mut self, class: ClassMeta) -> Self {
        self.add(class);
        self
    }
}

impl EntityReflector for InMemoryReflector {
    fn class(&self, name: &str) -> Option<ClassMeta> {
        let name = name.strip_prefix('\\').unwrap_or(name);
        self.classes.get(name).cloned()
    }

    fn class_exists(&self, name: &str) -> bool {
        let name = name.strip_prefix('\\').unwrap_or(name);
        self.classes.contains_key(name)
    }
}

impl ImportScanner for InMemoryReflector {
    fn imports_of(&self, class: &ClassMeta) -> HashMap<String, String> {
        // The metadata already carries the declared imports; classes
        // registered here take precedence over the snapshot passed in.
        self.classes
            .get(&class.name)
            .map(|c| c.imports.clone())
            .unwrap_or_else(|| class.imports.clone())
    }
}
