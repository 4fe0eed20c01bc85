//! Doc comment tag discovery.
//!
//! The reader consumes a [`TagParser`] — the capability of turning a
//! doc comment into an ordered sequence of [`Annotation`]s. The
//! built-in [`DocParser`] scans line-start tags: the three typed tag
//! kinds become placeholder markers, `@IgnoreAnnotation` declarations
//! are decoded, everything else is resolved through the import table
//! into a generic annotation or rejected.

pub mod hint;
pub mod tags;

use std::collections::HashSet;

use tracing::trace;

use crate::error::AnnotationError;
use crate::imports::ImportTable;
use crate::types::{Annotation, GenericTag};

/// The kind of entity a doc comment is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Class,
    Property,
    Method,
}

/// Per-parse configuration handed to the tag parser: target kind,
/// applicable imports, and the ignore sets in force.
pub struct ParseContext<'a> {
    pub target: Target,
    pub imports: &'a ImportTable,
    pub ignored_names: &'a HashSet<String>,
    pub ignored_namespaces: &'a HashSet<String>,
}

/// Turns a doc comment into an ordered annotation sequence.
///
/// `context` is a human-readable label for the entity being parsed
/// (`class Foo`, `property Foo::$bar`, `method Foo::baz()`), used in
/// error messages.
pub trait TagParser: Send + Sync {
    fn parse(
        &self,
        doc: &str,
        context: &str,
        ctx: &ParseContext<'_>,
    ) -> Result<Vec<Annotation>, AnnotationError>;
}

/// Built-in line-scanning tag parser.
#[derive(Debug, Clone, Default)]
pub struct DocParser {
    /// When set, tags that resolve to nothing are skipped instead of
    /// raising [`AnnotationError::UnresolvedTag`]. Used by the reader's
    /// metadata pre-parse, which runs before imports are known.
    pub ignore_not_imported: bool,
}

impl DocParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// A parser that silently skips unresolvable tags.
    pub fn lenient() -> Self {
        DocParser {
            ignore_not_imported: true,
        }
    }

    fn classify(
        &self,
        name: &str,
        value: Option<String>,
        context: &str,
        ctx: &ParseContext<'_>,
    ) -> Result<Option<Annotation>, AnnotationError> {
        match name.to_ascii_lowercase().as_str() {
            "var" | "param" => Ok(Some(Annotation::VarParamPlaceholder)),
            "return" => Ok(Some(Annotation::ReturnPlaceholder)),
            "ignoreannotation" => Ok(Some(Annotation::Ignore(parse_ignore_names(
                value.as_deref().unwrap_or(""),
            )))),
            _ => {
                if ctx.ignored_names.contains(name) {
                    trace!(name, "skipping ignored tag");
                    return Ok(None);
                }
                if ctx
                    .ignored_namespaces
                    .iter()
                    .any(|ns| in_namespace(name, ns))
                {
                    trace!(name, "skipping tag in ignored namespace");
                    return Ok(None);
                }

                // A leading `\` makes the tag name its own FQN.
                if let Some(fqn) = name.strip_prefix('\\') {
                    return Ok(Some(Annotation::Generic(GenericTag {
                        name: name.to_string(),
                        class: fqn.to_string(),
                        value,
                    })));
                }

                // Otherwise the first segment must be an imported alias.
                let (first, rest) = match name.find('\\') {
                    Some(i) => (&name[..i], &name[i..]),
                    None => (name, ""),
                };
                if let Some(fqn) = ctx.imports.resolve_alias(first) {
                    return Ok(Some(Annotation::Generic(GenericTag {
                        name: name.to_string(),
                        class: format!("{}{}", fqn, rest),
                        value,
                    })));
                }

                if self.ignore_not_imported {
                    trace!(name, "skipping not-imported tag");
                    return Ok(None);
                }
                Err(AnnotationError::UnresolvedTag {
                    name: name.to_string(),
                    context: context.to_string(),
                })
            }
        }
    }
}

impl TagParser for DocParser {
    fn parse(
        &self,
        doc: &str,
        context: &str,
        ctx: &ParseContext<'_>,
    ) -> Result<Vec<Annotation>, AnnotationError> {
        let mut annotations = Vec::new();
        if doc.is_empty() {
            return Ok(annotations);
        }

        for line in tags::doc_body(doc).lines() {
            let trimmed = line.trim().trim_start_matches('*').trim();
            let Some(rest) = trimmed.strip_prefix('@') else {
                continue;
            };

            let name_len = rest
                .find(|c: char| !(c.is_alphanumeric() || matches!(c, '_' | '-' | '\\')))
                .unwrap_or(rest.len());
            if name_len == 0 {
                continue;
            }
            let name = &rest[..name_len];

            let value = rest[name_len..].trim();
            let value = (!value.is_empty()).then(|| value.to_string());

            if let Some(annotation) = self.classify(name, value, context, ctx)? {
                annotations.push(annotation);
            }
        }

        Ok(annotations)
    }
}

/// Whether `name` lives under the namespace prefix `ns`.
fn in_namespace(name: &str, ns: &str) -> bool {
    name == ns
        || name
            .strip_prefix(ns)
            .is_some_and(|rest| rest.starts_with('\\'))
}

/// Decode the argument list of an `@IgnoreAnnotation` declaration:
/// `("foo")`, `("foo", "bar")`, and `({"foo", "bar"})` all work.
fn parse_ignore_names(value: &str) -> Vec<String> {
    value
        .trim_matches(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '{' | '}'))
        .split(',')
        .map(|name| name.trim().trim_matches(['"', '\'']).to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignore_names_decode_all_forms() {
        assert_eq!(parse_ignore_names("(\"foo\")"), vec!["foo"]);
        assert_eq!(parse_ignore_names("(\"foo\", \"bar\")"), vec!["foo", "bar"]);
        assert_eq!(parse_ignore_names("({\"foo\", \"bar\"})"), vec!["foo", "bar"]);
        assert!(parse_ignore_names("").is_empty());
    }

    #[test]
    fn namespace_prefix_requires_separator() {
        assert!(in_namespace("Vendor\\Tag", "Vendor"));
        assert!(in_namespace("Vendor", "Vendor"));
        assert!(!in_namespace("VendorX\\Tag", "Vendor"));
    }
}
