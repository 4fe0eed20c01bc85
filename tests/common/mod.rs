#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use taghint::{
    AnnotationReader, ClassMeta, InMemoryReflector, MethodMeta, ParameterMeta, PropertyMeta,
};

/// A bare class whose namespace is derived from the qualified name.
pub fn class(name: &str) -> ClassMeta {
    let namespace = name
        .rsplit_once('\\')
        .map(|(ns, _)| ns.to_string())
        .unwrap_or_default();
    ClassMeta {
        name: name.to_string(),
        namespace,
        ..ClassMeta::default()
    }
}

pub fn property(name: &str, doc: &str) -> PropertyMeta {
    PropertyMeta {
        name: name.to_string(),
        doc_comment: Some(doc.to_string()),
    }
}

pub fn method(name: &str, doc: &str) -> MethodMeta {
    MethodMeta {
        name: name.to_string(),
        doc_comment: Some(doc.to_string()),
        ..MethodMeta::default()
    }
}

pub fn param(name: &str) -> ParameterMeta {
    ParameterMeta {
        name: name.to_string(),
        default_value: None,
    }
}

pub fn imports(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(alias, fqn)| (alias.to_string(), fqn.to_string()))
        .collect()
}

pub fn reflector(classes: Vec<ClassMeta>) -> Arc<InMemoryReflector> {
    let mut reflector = InMemoryReflector::new();
    for class in classes {
        reflector.add(class);
    }
    Arc::new(reflector)
}

pub fn reader(classes: Vec<ClassMeta>) -> AnnotationReader {
    AnnotationReader::from_reflector(reflector(classes)).expect("doc comments are available")
}
