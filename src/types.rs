//! Data types used throughout the taghint crate.
//!
//! This module contains the "model" structs and enums that represent
//! extracted docblock type information: a single type occurrence
//! ([`Type`]), a parsed variable/parameter/return hint ([`TypeHint`]),
//! and the tagged annotation sequence element ([`Annotation`]) returned
//! by the reader.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The array kind, as it appears after sanitization (`"array"`).
pub const ARRAY_TYPE: &str = "array";

/// The short array suffix (`User[]`, `int[]`).
pub const ARRAY_TYPE_SHORT: &str = "[]";

/// Rendering token for the null type.
pub const NULL_TYPE: &str = "null";

/// Separator between union members in a type expression.
pub const TYPE_SEPARATOR: char = '|';

/// Map of basic type spellings to their canonical form.
///
/// `None` on the right-hand side is the null type; `"mixed"` is a
/// pseudo-type that the hint parser expands into every basic type plus
/// a bare array.
pub const BASIC_TYPES: &[(&str, Option<&str>)] = &[
    ("string", Some("string")),
    ("int", Some("int")),
    ("integer", Some("int")),
    ("float", Some("float")),
    ("double", Some("float")),
    ("bool", Some("bool")),
    ("boolean", Some("bool")),
    (NULL_TYPE, None),
    ("mixed", Some("mixed")),
];

/// A single type occurrence: a canonical base type plus, for arrays,
/// an optional element type.
///
/// Invariant: `element` is only `Some` when `base` is the array kind.
/// A `base` of `None` denotes the null type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type {
    pub base: Option<String>,
    pub element: Option<String>,
}

impl Type {
    /// A non-array type (`string`, `int`, a class FQN, ...).
    pub fn scalar(base: impl Into<String>) -> Self {
        Type {
            base: Some(base.into()),
            element: None,
        }
    }

    /// The null type.
    pub fn null() -> Self {
        Type {
            base: None,
            element: None,
        }
    }

    /// An array type, optionally carrying its element type.
    pub fn array(element: Option<String>) -> Self {
        Type {
            base: Some(ARRAY_TYPE.to_string()),
            element,
        }
    }

    /// Whether this occurrence is the array kind.
    pub fn is_array(&self) -> bool {
        self.base.as_deref() == Some(ARRAY_TYPE)
    }

    /// The effective payload type: the element type if present, else the
    /// base type. Callers that don't care about array wrapping use this.
    pub fn type_of_interest(&self) -> Option<&str> {
        self.element.as_deref().or(self.base.as_deref())
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_array() {
            match &self.element {
                Some(element) => write!(f, "{}{}", element, ARRAY_TYPE_SHORT),
                None => f.write_str(ARRAY_TYPE),
            }
        } else {
            f.write_str(self.base.as_deref().unwrap_or(NULL_TYPE))
        }
    }
}

/// Which lifecycle variant of hint a tag produces.
///
/// `Input` hints come from `@var`/`@param` tags and carry a variable
/// name; `Output` hints come from `@return` tags and never do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HintKind {
    Input,
    Output,
}

/// A parsed type hint: the resolved union members in source order plus
/// the variable name, trailing description, and default value where
/// applicable.
///
/// Invariant: `types` is never empty — parsing a tag that yields zero
/// resolved types fails with [`HintOutcome::Unresolved`] instead of
/// constructing a hint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeHint {
    pub kind: HintKind,
    pub types: Vec<Type>,
    /// Always `None` for [`HintKind::Output`].
    pub variable_name: Option<String>,
    pub description: Option<String>,
    pub default_value: Option<Value>,
}

impl fmt::Display for TypeHint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.types.is_empty() {
            return f.write_str(NULL_TYPE);
        }
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", TYPE_SEPARATOR)?;
            }
            write!(f, "{}", ty)?;
        }
        Ok(())
    }
}

/// Outcome of parsing one raw tag text.
///
/// `Unresolved` distinguishes "a type tag was present but no member of
/// it survived resolution and filtering" from "no tag at all" — the
/// caller treats the tag as contributing nothing either way, but tests
/// (and embedders) can tell the two apart.
#[derive(Debug, Clone, PartialEq)]
pub enum HintOutcome {
    Hint(TypeHint),
    Unresolved,
}

impl HintOutcome {
    pub fn hint(self) -> Option<TypeHint> {
        match self {
            HintOutcome::Hint(hint) => Some(hint),
            HintOutcome::Unresolved => None,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, HintOutcome::Unresolved)
    }
}

/// A tag that did not produce a type hint: its name as written, the
/// annotation class it resolved to, and its raw argument text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericTag {
    /// The tag name as written in the comment (without the `@`).
    pub name: String,
    /// The fully-qualified annotation class the name resolved to.
    pub class: String,
    /// Raw text following the tag name, if any.
    pub value: Option<String>,
}

/// One element of the merged annotation sequence for an entity.
///
/// Placeholder variants mark where a typed tag appeared in the comment;
/// the coordinator replaces them in-place with the derived [`TypeHint`],
/// first unconsumed placeholder of the matching kind first. A
/// placeholder whose tag text turned out to be unparseable survives to
/// the output unmodified.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Annotation {
    /// Position marker for a `@var` or `@param` tag.
    VarParamPlaceholder,
    /// Position marker for a `@return` tag.
    ReturnPlaceholder,
    /// An `@IgnoreAnnotation("name", ...)` declaration.
    Ignore(Vec<String>),
    /// Any other recognized tag.
    Generic(GenericTag),
    /// A typed tag, after placeholder replacement.
    Hint(TypeHint),
}

impl Annotation {
    pub fn as_hint(&self) -> Option<&TypeHint> {
        match self {
            Annotation::Hint(hint) => Some(hint),
            _ => None,
        }
    }

    /// The hint, if this is a replaced `@var`/`@param` tag.
    pub fn as_input_hint(&self) -> Option<&TypeHint> {
        self.as_hint().filter(|h| h.kind == HintKind::Input)
    }

    /// The hint, if this is a replaced `@return` tag.
    pub fn as_output_hint(&self) -> Option<&TypeHint> {
        self.as_hint().filter(|h| h.kind == HintKind::Output)
    }

    pub fn as_generic(&self) -> Option<&GenericTag> {
        match self {
            Annotation::Generic(tag) => Some(tag),
            _ => None,
        }
    }

    /// Whether this is a placeholder that was never consumed.
    pub fn is_placeholder(&self) -> bool {
        matches!(
            self,
            Annotation::VarParamPlaceholder | Annotation::ReturnPlaceholder
        )
    }
}
