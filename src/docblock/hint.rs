//! The docblock type-expression parser.
//!
//! Turns one raw tag text line — everything after `@var`, `@param`, or
//! `@return` — into a [`TypeHint`]: union splitting on `|`, array and
//! generic notation, `mixed` expansion, and ignored-type filtering.
//! Resolution failures are best-effort: an unresolvable union member is
//! dropped without diagnostic, and only a tag with *no* surviving types
//! fails as a whole.

use std::collections::HashSet;

use serde_json::Value;
use tracing::trace;

use crate::imports::ImportTable;
use crate::reflect::EntityReflector;
use crate::resolution::{generic_element, sanitized_name};
use crate::types::{
    ARRAY_TYPE, ARRAY_TYPE_SHORT, BASIC_TYPES, HintKind, HintOutcome, TYPE_SEPARATOR, Type,
    TypeHint,
};

/// Parse one raw tag text into a type hint.
///
/// `variable_name` is supplied externally for property `@var` tags
/// (reflection knows the property name); for `@param` tags it is `None`
/// and the name is read from the second whitespace-separated segment of
/// the text. Output hints never carry a name, whatever the text says.
///
/// Returns [`HintOutcome::Unresolved`] when no type survives resolution
/// and filtering — the caller treats the tag as contributing nothing.
pub fn parse_hint(
    raw: &str,
    imports: &ImportTable,
    reflector: &dyn EntityReflector,
    kind: HintKind,
    variable_name: Option<&str>,
    default_value: Option<Value>,
    ignored_types: &HashSet<String>,
) -> HintOutcome {
    let wants_name_from_text = kind == HintKind::Input && variable_name.is_none();
    let limit = if wants_name_from_text { 3 } else { 2 };
    let parts = split_limit(raw, limit);

    let Some(&type_expr) = parts.first() else {
        return HintOutcome::Unresolved;
    };

    let (variable_token, description) = if wants_name_from_text {
        (parts.get(1).copied(), parts.get(2).copied())
    } else {
        (variable_name, parts.get(1).copied())
    };
    let description = description.and_then(clean_description);

    let mut types: Vec<Type> = Vec::new();
    for token in type_expr
        .split(TYPE_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
    {
        let Some(base) = sanitized_name(token, imports, reflector) else {
            trace!(token, "dropping unresolvable type token");
            continue;
        };

        match base.as_deref() {
            Some("mixed") => expand_mixed(&mut types),
            Some(b) if b == ARRAY_TYPE => {
                // Element detection: the `[]` suffix on the token itself,
                // or `array<...>` notation anywhere in the full raw text.
                let element_text = match token.strip_suffix(ARRAY_TYPE_SHORT) {
                    Some(stripped) => Some(stripped.trim()),
                    None => generic_element(raw),
                };
                // A failed (or null) element resolution degrades to a
                // bare array, never to a parse failure.
                let element = element_text
                    .and_then(|text| sanitized_name(text, imports, reflector))
                    .flatten();
                types.push(Type::array(element));
            }
            _ => types.push(Type {
                base,
                element: None,
            }),
        }
    }

    types.retain(|ty| {
        let ignored = ty
            .base
            .as_deref()
            .is_some_and(|b| ignored_types.contains(b))
            || ty
                .element
                .as_deref()
                .is_some_and(|e| ignored_types.contains(e));
        if ignored {
            trace!(%ty, "filtering ignored type");
        }
        !ignored
    });

    if types.is_empty() {
        return HintOutcome::Unresolved;
    }

    let variable_name = match kind {
        HintKind::Output => None,
        HintKind::Input => variable_token.map(|v| v.trim_start_matches('$').to_string()),
    };

    HintOutcome::Hint(TypeHint {
        kind,
        types,
        variable_name,
        description,
        default_value,
    })
}

/// `mixed` is sugar for "any basic type or an array": one type per
/// distinct canonical basic type (the null type included, `mixed`
/// itself excluded) plus one bare array.
fn expand_mixed(types: &mut Vec<Type>) {
    let mut seen: Vec<Option<&str>> = Vec::new();
    for (_, canonical) in BASIC_TYPES {
        if *canonical == Some("mixed") || seen.contains(canonical) {
            continue;
        }
        seen.push(*canonical);
        types.push(Type {
            base: canonical.map(str::to_string),
            element: None,
        });
    }
    types.push(Type::array(None));
}

/// Split on runs of whitespace into at most `limit` segments; the last
/// segment keeps its internal spacing.
fn split_limit(s: &str, limit: usize) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = s.trim();
    while parts.len() + 1 < limit {
        let Some(split_at) = rest.find(char::is_whitespace) else {
            break;
        };
        parts.push(&rest[..split_at]);
        rest = rest[split_at..].trim_start();
        if rest.is_empty() {
            return parts;
        }
    }
    if !rest.is_empty() {
        parts.push(rest);
    }
    parts
}

/// Strip residual comment-block markers from a description segment.
fn clean_description(desc: &str) -> Option<String> {
    let d = desc.trim();
    let d = d.strip_prefix("/*").map(str::trim_start).unwrap_or(d);
    let d = d.strip_suffix("*/").map(str::trim_end).unwrap_or(d);
    let d = d.trim();
    (!d.is_empty()).then(|| d.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_limit_preserves_remainder_spacing() {
        assert_eq!(
            split_limit("string $name The  name.", 3),
            vec!["string", "$name", "The  name."]
        );
        assert_eq!(
            split_limit("bool|null Some default text", 2),
            vec!["bool|null", "Some default text"]
        );
        assert_eq!(split_limit("   ", 3), Vec::<&str>::new());
    }

    #[test]
    fn clean_description_strips_markers() {
        assert_eq!(clean_description("A string. */"), Some("A string.".into()));
        assert_eq!(clean_description("/* inline */"), Some("inline".into()));
        assert_eq!(clean_description("*/"), None);
        assert_eq!(clean_description(""), None);
    }
}
