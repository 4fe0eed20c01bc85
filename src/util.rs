//! Small helper functions shared across the crate.

use serde_json::Value;

/// Last segment of a backslash-separated name.
///
/// `"App\\Models\\User"` → `"User"`, `"User"` → `"User"`.
pub(crate) fn short_name(name: &str) -> &str {
    name.rsplit('\\').next().unwrap_or(name)
}

/// PHP truthiness for reflected default values.
///
/// `null`, `false`, `0`, `0.0`, `""`, `"0"`, and the empty array are
/// falsy; everything else is truthy. Parameter defaults are only
/// attached to hints when truthy, matching how reflection-sourced
/// defaults are filtered.
pub(crate) fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}
