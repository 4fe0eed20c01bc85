//! The annotation reader: per-entity coordination.
//!
//! For each class, property, or method the reader derives the
//! applicable import table and ignored-name set (both memoized per
//! class), obtains the generic annotation sequence from the tag parser,
//! runs the type-expression parser over `@var`/`@param`/`@return` tag
//! text, and splices the derived hints into the sequence in place of
//! their placeholder markers, in encounter order.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tracing::debug;

use crate::docblock::hint::parse_hint;
use crate::docblock::tags::tag_values;
use crate::docblock::{DocParser, ParseContext, TagParser, Target};
use crate::error::AnnotationError;
use crate::imports::ImportTable;
use crate::reflect::{ClassMeta, EntityReflector, ImportScanner, MethodMeta, PropertyMeta};
use crate::registry::IgnoreRegistry;
use crate::types::{Annotation, HintKind, HintOutcome};
use crate::util::is_falsy;

/// Reads the annotations of reflected entities.
pub struct AnnotationReader {
    reflector: Arc<dyn EntityReflector>,
    scanner: Arc<dyn ImportScanner>,
    parser: Box<dyn TagParser>,
    registry: IgnoreRegistry,
    ignored_input_types: HashSet<String>,
    ignored_output_types: HashSet<String>,
    /// Per-class import tables, built once and reused.
    imports: Mutex<HashMap<String, ImportTable>>,
    /// Per-class ignored tag names (registry defaults plus the class's
    /// own `@IgnoreAnnotation` declarations), built once and reused.
    ignored_names: Mutex<HashMap<String, HashSet<String>>>,
}

impl AnnotationReader {
    /// Create a reader over the given reflector and import scanner.
    ///
    /// Fails with [`AnnotationError::CommentsUnavailable`] when the
    /// reflector reports that doc comments are discarded by the host
    /// configuration — nothing could ever be read, so there is no point
    /// constructing the reader.
    pub fn new(
        reflector: Arc<dyn EntityReflector>,
        scanner: Arc<dyn ImportScanner>,
    ) -> Result<Self, AnnotationError> {
        if !reflector.doc_comments_available() {
            return Err(AnnotationError::CommentsUnavailable);
        }

        Ok(AnnotationReader {
            reflector,
            scanner,
            parser: Box::new(DocParser::new()),
            registry: IgnoreRegistry::default(),
            ignored_input_types: HashSet::new(),
            ignored_output_types: HashSet::new(),
            imports: Mutex::new(HashMap::new()),
            ignored_names: Mutex::new(HashMap::new()),
        })
    }

    /// Convenience constructor for a value that is both reflector and
    /// scanner (e.g. [`crate::reflect::InMemoryReflector`]).
    pub fn from_reflector<R>(reflector: Arc<R>) -> Result<Self, AnnotationError>
    where
        R: EntityReflector + ImportScanner + 'static,
    {
        Self::new(reflector.clone(), reflector)
    }

    /// Replace the tag parser.
    pub fn with_tag_parser(mut self, parser: Box<dyn TagParser>) -> Self {
        self.parser = parser;
        self
    }

    /// Replace the ignore registry.
    pub fn with_registry(mut self, registry: IgnoreRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Type names to drop from `@var`/`@param` hints.
    pub fn with_ignored_input_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.ignored_input_types = types.into_iter().collect();
        self
    }

    /// Type names to drop from `@return` hints.
    pub fn with_ignored_output_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        self.ignored_output_types = types.into_iter().collect();
        self
    }

    pub fn reflector(&self) -> &Arc<dyn EntityReflector> {
        &self.reflector
    }

    pub fn registry(&self) -> &IgnoreRegistry {
        &self.registry
    }

    /// Mutable access to the ignore registry. Drops the memoized
    /// per-class ignored-name sets so later parses see the change.
    pub fn registry_mut(&mut self) -> &mut IgnoreRegistry {
        self.ignored_names.lock().clear();
        &mut self.registry
    }

    // ─── Annotation retrieval ───────────────────────────────────────────

    /// All annotations on a class's doc comment, in source order.
    pub fn get_class_annotations(&self, class: &str) -> Result<Vec<Annotation>, AnnotationError> {
        let meta = self.class_meta(class)?;
        let context = format!("class {}", meta.name);
        debug!(class = %meta.name, "reading class annotations");

        let imports = self.class_imports_for(&meta)?;
        let ignored = self.ignored_annotation_names(&meta)?;
        let doc = meta.doc_comment.as_deref().unwrap_or("");

        self.parser.parse(
            doc,
            &context,
            &ParseContext {
                target: Target::Class,
                imports: &imports,
                ignored_names: &ignored,
                ignored_namespaces: self.registry.namespaces(),
            },
        )
    }

    /// All annotations on a property's doc comment, with the `@var`
    /// placeholder replaced by the derived input hint when the tag text
    /// parses. The variable name always comes from reflection, never
    /// from the tag text; the default value is the class's declared
    /// default for the property, if any.
    pub fn get_property_annotations(
        &self,
        class: &str,
        property: &str,
    ) -> Result<Vec<Annotation>, AnnotationError> {
        let meta = self.class_meta(class)?;
        let prop = meta
            .property(property)
            .ok_or_else(|| AnnotationError::UnknownProperty {
                class: class.to_string(),
                property: property.to_string(),
            })?
            .clone();
        let context = format!("property {}::${}", meta.name, prop.name);
        debug!(class = %meta.name, property = %prop.name, "reading property annotations");

        let imports = self.property_imports_for(&meta, &prop)?;
        let ignored = self.ignored_annotation_names(&meta)?;
        let doc = prop.doc_comment.as_deref().unwrap_or("");

        let mut results = self.parser.parse(
            doc,
            &context,
            &ParseContext {
                target: Target::Property,
                imports: &imports,
                ignored_names: &ignored,
                ignored_namespaces: self.registry.namespaces(),
            },
        )?;

        if let Some(raw) = tag_values(doc, "var").into_iter().next() {
            let default = meta.default_properties.get(&prop.name).cloned();
            if let HintOutcome::Hint(hint) = parse_hint(
                &raw,
                &imports,
                self.reflector.as_ref(),
                HintKind::Input,
                Some(&prop.name),
                default,
                &self.ignored_input_types,
            ) {
                replace_placeholder(&mut results, PlaceholderKind::VarParam, hint);
            }
        }

        Ok(results)
    }

    /// All annotations on a method's doc comment, with `@param` and
    /// `@return` placeholders replaced by derived hints in encounter
    /// order. Parameter default values are attached by name, and only
    /// when reflection reports a truthy default.
    pub fn get_method_annotations(
        &self,
        class: &str,
        method: &str,
    ) -> Result<Vec<Annotation>, AnnotationError> {
        let meta = self.class_meta(class)?;
        let method = meta
            .method(method)
            .ok_or_else(|| AnnotationError::UnknownMethod {
                class: class.to_string(),
                method: method.to_string(),
            })?
            .clone();
        let context = format!("method {}::{}()", meta.name, method.name);
        debug!(class = %meta.name, method = %method.name, "reading method annotations");

        let imports = self.method_imports_for(&meta, &method)?;
        let ignored = self.ignored_annotation_names(&meta)?;
        let doc = method.doc_comment.as_deref().unwrap_or("");

        let mut results = self.parser.parse(
            doc,
            &context,
            &ParseContext {
                target: Target::Method,
                imports: &imports,
                ignored_names: &ignored,
                ignored_namespaces: self.registry.namespaces(),
            },
        )?;

        let mut defaults: HashMap<String, Value> = HashMap::new();
        for parameter in &method.parameters {
            if let Some(value) = &parameter.default_value
                && !is_falsy(value)
            {
                defaults.insert(parameter.name.clone(), value.clone());
            }
        }

        for raw in tag_values(doc, "param") {
            if let HintOutcome::Hint(mut hint) = parse_hint(
                &raw,
                &imports,
                self.reflector.as_ref(),
                HintKind::Input,
                None,
                None,
                &self.ignored_input_types,
            ) {
                if let Some(name) = hint.variable_name.as_deref()
                    && let Some(default) = defaults.get(name)
                {
                    hint.default_value = Some(default.clone());
                }
                replace_placeholder(&mut results, PlaceholderKind::VarParam, hint);
            }
        }

        for raw in tag_values(doc, "return") {
            if let HintOutcome::Hint(hint) = parse_hint(
                &raw,
                &imports,
                self.reflector.as_ref(),
                HintKind::Output,
                None,
                None,
                &self.ignored_output_types,
            ) {
                replace_placeholder(&mut results, PlaceholderKind::Return, hint);
            }
        }

        Ok(results)
    }

    /// First class annotation whose resolved annotation class matches.
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

    /// First property annotation whose resolved annotation class matches.
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

    /// First method annotation whose resolved annotation class matches.
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

    // ─── Import tables ──────────────────────────────────────────────────

    /// The import table applicable to a class's own doc comment.
    pub fn get_class_imports(&self, class: &str) -> Result<ImportTable, AnnotationError> {
        let meta = self.class_meta(class)?;
        self.class_imports_for(&meta)
    }

    /// The import table applicable to a property: the class imports,
    /// merged with the imports of every used trait that declares a
    /// property of the same name.
    pub fn get_property_imports(
        &self,
        class: &str,
        property: &str,
    ) -> Result<ImportTable, AnnotationError> {
        let meta = self.class_meta(class)?;
        let prop = meta
            .property(property)
            .ok_or_else(|| AnnotationError::UnknownProperty {
                class: class.to_string(),
                property: property.to_string(),
            })?
            .clone();
        self.property_imports_for(&meta, &prop)
    }

    /// The import table applicable to a method: the class imports,
    /// merged with the imports of every used trait that declares a
    /// method of the same name in the same file the method physically
    /// lives in.
    pub fn get_method_imports(
        &self,
        class: &str,
        method: &str,
    ) -> Result<ImportTable, AnnotationError> {
        let meta = self.class_meta(class)?;
        let method = meta
            .method(method)
            .ok_or_else(|| AnnotationError::UnknownMethod {
                class: class.to_string(),
                method: method.to_string(),
            })?
            .clone();
        self.method_imports_for(&meta, &method)
    }

    // ─── Internals ──────────────────────────────────────────────────────

    fn class_meta(&self, name: &str) -> Result<ClassMeta, AnnotationError> {
        self.reflector
            .class(name)
            .ok_or_else(|| AnnotationError::UnknownClass(name.to_string()))
    }

    fn class_imports_for(&self, meta: &ClassMeta) -> Result<ImportTable, AnnotationError> {
        if let Some(table) = self.imports.lock().get(&meta.name) {
            return Ok(table.clone());
        }
        self.collect_parsing_metadata(meta)?;
        Ok(self
            .imports
            .lock()
            .get(&meta.name)
            .cloned()
            .unwrap_or_default())
    }

    fn property_imports_for(
        &self,
        meta: &ClassMeta,
        property: &PropertyMeta,
    ) -> Result<ImportTable, AnnotationError> {
        let mut table = self.class_imports_for(meta)?;
        for trait_name in &meta.traits {
            if let Some(trait_meta) = self.reflector.class(trait_name)
                && trait_meta.has_property(&property.name)
            {
                table.merge(&self.scanner.imports_of(&trait_meta));
            }
        }
        Ok(table)
    }

    fn method_imports_for(
        &self,
        meta: &ClassMeta,
        method: &MethodMeta,
    ) -> Result<ImportTable, AnnotationError> {
        let mut table = self.class_imports_for(meta)?;
        for trait_name in &meta.traits {
            if let Some(trait_meta) = self.reflector.class(trait_name)
                && trait_meta.has_method(&method.name)
                && trait_meta.file == method.file
            {
                table.merge(&self.scanner.imports_of(&trait_meta));
            }
        }
        Ok(table)
    }

    fn ignored_annotation_names(
        &self,
        meta: &ClassMeta,
    ) -> Result<HashSet<String>, AnnotationError> {
        if let Some(names) = self.ignored_names.lock().get(&meta.name) {
            return Ok(names.clone());
        }
        self.collect_parsing_metadata(meta)?;
        Ok(self
            .ignored_names
            .lock()
            .get(&meta.name)
            .cloned()
            .unwrap_or_default())
    }

    /// Compute and memoize both per-class tables: the import table from
    /// the scanner, and the ignored-name set from the registry defaults
    /// plus any `@IgnoreAnnotation` declarations on the class itself.
    /// The pre-parse is lenient — imports are not known yet, so unknown
    /// tags must not raise.
    fn collect_parsing_metadata(&self, meta: &ClassMeta) -> Result<(), AnnotationError> {
        let mut ignored = self.registry.names().clone();

        let doc = meta.doc_comment.as_deref().unwrap_or("");
        let context = format!("class {}", meta.name);
        let empty = ImportTable::new(&meta.namespace);
        let annotations = DocParser::lenient().parse(
            doc,
            &context,
            &ParseContext {
                target: Target::Class,
                imports: &empty,
                ignored_names: self.registry.names(),
                ignored_namespaces: self.registry.namespaces(),
            },
        )?;
        for annotation in annotations {
            if let Annotation::Ignore(names) = annotation {
                ignored.extend(names);
            }
        }

        let mut table = ImportTable::new(&meta.namespace);
        table.merge(&self.scanner.imports_of(meta));

        self.imports.lock().insert(meta.name.clone(), table);
        self.ignored_names.lock().insert(meta.name.clone(), ignored);
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum PlaceholderKind {
    VarParam,
    Return,
}

/// Replace the first unconsumed placeholder of the matching kind with
/// the derived hint. At most one placeholder is consumed per hint; if
/// none is left, the hint is discarded (the tag parser and the text
/// scan disagreed about the comment, which only happens on malformed
/// input).
fn replace_placeholder(
    results: &mut [Annotation],
    kind: PlaceholderKind,
    hint: crate::types::TypeHint,
) {
    let slot = results.iter_mut().find(|a| match kind {
        PlaceholderKind::VarParam => matches!(a, Annotation::VarParamPlaceholder),
        PlaceholderKind::Return => matches!(a, Annotation::ReturnPlaceholder),
    });
    if let Some(slot) = slot {
        *slot = Annotation::Hint(hint);
    }
}

/// Whether an annotation is a generic tag resolved to the given class.
pub(crate) fn annotation_matches(annotation: &Annotation, class: &str) -> bool {
    annotation.as_generic().is_some_and(|tag| tag.class == class)
}
