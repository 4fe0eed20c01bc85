//! Type-token name resolution.
//!
//! Resolves a single bare type token from a docblock — `integer`,
//! `string[]`, `Logger`, `\App\Models\User` — into a canonical name,
//! the way a reader of the comment would disambiguate it using only
//! locally visible imports. No full semantic pass: basic-type aliases,
//! array notation, then successively wider name lookups.

use crate::imports::ImportTable;
use crate::reflect::EntityReflector;
use crate::types::{ARRAY_TYPE, ARRAY_TYPE_SHORT, BASIC_TYPES};
use crate::util::short_name;

/// Sanitize a type token into a canonical name, if possible.
///
/// Returns `None` when the token cannot be resolved (the caller drops
/// it). On success the inner value is the canonical base type, where
/// `None` denotes the null type.
///
/// Resolution order, first match wins:
///   1. basic-type alias table (case sensitive: `integer` → `int`,
///      `double` → `float`, `boolean` → `bool`, `null` → the null type,
///      `mixed` passes through for the hint parser to expand)
///   2. the bare `array` keyword
///   3. the `[]` short array suffix
///   4. the `array<...>` generic notation
///   5. the token is itself a loadable qualified name
///   6. the token qualified by the current namespace is loadable
///   7. the token matches the trailing segment of an imported name
pub fn sanitized_name(
    token: &str,
    imports: &ImportTable,
    reflector: &dyn EntityReflector,
) -> Option<Option<String>> {
    if token.is_empty() {
        return None;
    }

    if let Some((_, canonical)) = BASIC_TYPES.iter().find(|(alias, _)| *alias == token) {
        return Some(canonical.map(str::to_string));
    }

    if token == ARRAY_TYPE
        || token.ends_with(ARRAY_TYPE_SHORT)
        || generic_element(token).is_some()
    {
        return Some(Some(ARRAY_TYPE.to_string()));
    }

    if reflector.class_exists(token) {
        return Some(Some(token.trim_start_matches('\\').to_string()));
    }

    let ns_qualified = format!("{}\\{}", imports.namespace(), token);
    if reflector.class_exists(&ns_qualified) {
        return Some(Some(ns_qualified.trim_start_matches('\\').to_string()));
    }

    for import in imports.values() {
        if short_name(import) == token {
            return Some(Some(import.trim_start_matches('\\').to_string()));
        }
    }

    None
}

/// Capture the element text of the first `array<...>` notation in
/// `text`, if present. The capture is non-greedy: it ends at the first
/// `>` after `array<`.
pub(crate) fn generic_element(text: &str) -> Option<&str> {
    let start = text.find("array<")? + "array<".len();
    let end = text[start..].find('>')?;
    Some(text[start..start + end].trim())
}
