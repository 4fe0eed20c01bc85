//! Raw tag text extraction from doc comments.
//!
//! Helpers for pulling the rest-of-line text of `@var` / `@param` /
//! `@return` occurrences out of a `/** ... */` comment, matching the
//! tag anywhere in the comment (including inline one-liners).

use memchr::memchr_iter;

/// Strip the `/** ... */` markers from a doc comment, leaving the body.
pub(crate) fn doc_body(doc: &str) -> &str {
    let inner = doc.trim();
    let inner = inner.strip_prefix("/**").unwrap_or(inner);
    inner.strip_suffix("*/").unwrap_or(inner)
}

/// Collect the raw text following every `@{tag}` occurrence, in order.
///
/// The tag name must be followed by whitespace (so `@variable` never
/// matches a search for `var`), and the captured text runs to the end
/// of the line, trimmed. Empty captures are skipped.
pub fn tag_values(doc: &str, tag: &str) -> Vec<String> {
    let bytes = doc.as_bytes();
    let mut values = Vec::new();

    for at in memchr_iter(b'@', bytes) {
        let after = &doc[at + 1..];
        let Some(rest) = after.strip_prefix(tag) else {
            continue;
        };
        // Require whitespace right after the tag name.
        if !rest.starts_with([' ', '\t']) {
            continue;
        }
        let line = rest.lines().next().unwrap_or(rest).trim();
        if !line.is_empty() {
            values.push(line.to_string());
        }
    }

    values
}

/// Whether the comment contains at least one `@{tag}` occurrence.
pub fn contains_tag(doc: &str, tag: &str) -> bool {
    !tag_values(doc, tag).is_empty()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_rest_of_line() {
        let doc = concat!(
            "/**\n",
            " * @param string $name The name.\n",
            " * @param int $age The age.\n",
            " * @return bool\n",
            " */",
        );

        assert_eq!(
            tag_values(doc, "param"),
            vec!["string $name The name.", "int $age The age."]
        );
        assert_eq!(tag_values(doc, "return"), vec!["bool"]);
    }

    #[test]
    fn inline_comment_keeps_trailing_marker() {
        // The closing `*/` is part of the captured line; the hint parser
        // strips it from descriptions.
        let doc = "/** @var string A string. */";
        assert_eq!(tag_values(doc, "var"), vec!["string A string. */"]);
    }

    #[test]
    fn tag_name_must_be_followed_by_whitespace() {
        let doc = "/** @variable string */";
        assert!(tag_values(doc, "var").is_empty());
        assert!(!contains_tag(doc, "var"));
    }

    #[test]
    fn doc_body_strips_markers() {
        assert_eq!(doc_body("/** hello */"), " hello ");
        assert_eq!(doc_body("no markers"), "no markers");
    }
}
