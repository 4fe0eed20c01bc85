//! Parsing raw tag text into type hints: unions, array notation,
//! `mixed` expansion, ignored-type filtering, names and descriptions.

mod common;

use std::collections::HashSet;

use taghint::docblock::hint::parse_hint;
use taghint::{HintKind, HintOutcome, ImportTable, Type};

fn ignored(names: &[&str]) -> HashSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

fn parse(raw: &str, kind: HintKind, ignored_types: &HashSet<String>) -> HintOutcome {
    let imports = ImportTable::new("App");
    let reflector = common::reflector(vec![common::class("App\\Models\\User")]);
    parse_hint(
        raw,
        &imports,
        reflector.as_ref(),
        kind,
        None,
        None,
        ignored_types,
    )
}

#[test]
fn union_members_keep_source_order() {
    let hint = parse("bool|null|string $flag", HintKind::Input, &ignored(&[]))
        .hint()
        .expect("union should parse");

    assert_eq!(
        hint.types,
        vec![Type::scalar("bool"), Type::null(), Type::scalar("string")]
    );
    assert_eq!(hint.to_string(), "bool|null|string");
}

#[test]
fn basic_aliases_are_canonicalized() {
    let hint = parse("integer|double|boolean $n", HintKind::Input, &ignored(&[]))
        .hint()
        .expect("aliases should parse");

    assert_eq!(hint.to_string(), "int|float|bool");
}

#[test]
fn short_array_notation_carries_element_type() {
    let hint = parse("string[] $names", HintKind::Input, &ignored(&[]))
        .hint()
        .expect("array should parse");

    assert_eq!(hint.types, vec![Type::array(Some("string".into()))]);
    assert_eq!(hint.to_string(), "string[]");
}

#[test]
fn generic_array_notation_carries_element_type() {
    let hint = parse("array<int> $ids", HintKind::Input, &ignored(&[]))
        .hint()
        .expect("generic array should parse");

    assert_eq!(hint.types, vec![Type::array(Some("int".into()))]);
    assert_eq!(hint.to_string(), "int[]");
}

#[test]
fn array_element_resolves_through_the_namespace() {
    let imports = ImportTable::new("App\\Models");
    let reflector = common::reflector(vec![common::class("App\\Models\\User")]);
    let hint = parse_hint(
        "User[] $users",
        &imports,
        reflector.as_ref(),
        HintKind::Input,
        None,
        None,
        &ignored(&[]),
    )
    .hint()
    .expect("class array should parse");

    assert_eq!(
        hint.types,
        vec![Type::array(Some("App\\Models\\User".into()))]
    );
}

#[test]
fn unresolvable_array_element_degrades_to_bare_array() {
    let hint = parse("Unknown[] $stuff", HintKind::Input, &ignored(&[]))
        .hint()
        .expect("array itself still parses");

    assert_eq!(hint.types, vec![Type::array(None)]);
    assert_eq!(hint.to_string(), "array");
}

#[test]
fn mixed_expands_to_every_basic_type_and_array() {
    let hint = parse("mixed $anything", HintKind::Input, &ignored(&[]))
        .hint()
        .expect("mixed should parse");

    assert_eq!(hint.to_string(), "string|int|float|bool|null|array");
}

#[test]
fn ignored_types_are_filtered_from_the_union() {
    let hint = parse("string|int $x", HintKind::Input, &ignored(&["string"]))
        .hint()
        .expect("one member survives");

    assert_eq!(hint.types, vec![Type::scalar("int")]);
}

#[test]
fn ignored_element_type_drops_the_array_member() {
    let hint = parse("string[]|int $x", HintKind::Input, &ignored(&["string"]))
        .hint()
        .expect("one member survives");

    assert_eq!(hint.types, vec![Type::scalar("int")]);
}

#[test]
fn fully_filtered_union_is_unresolved() {
    let outcome = parse(
        "string|int $x",
        HintKind::Input,
        &ignored(&["string", "int"]),
    );
    assert!(outcome.is_unresolved());
}

#[test]
fn unresolvable_members_are_dropped_silently() {
    let hint = parse("NoSuchClass|int $x", HintKind::Input, &ignored(&[]))
        .hint()
        .expect("resolvable member survives");

    assert_eq!(hint.types, vec![Type::scalar("int")]);
}

#[test]
fn all_members_unresolvable_is_unresolved() {
    assert!(parse("NoSuchClass $x", HintKind::Input, &ignored(&[])).is_unresolved());
    assert!(parse("", HintKind::Input, &ignored(&[])).is_unresolved());
}

#[test]
fn input_hints_read_name_and_description_from_the_text() {
    let hint = parse(
        "string $name The name,  with  spacing.",
        HintKind::Input,
        &ignored(&[]),
    )
    .hint()
    .expect("should parse");

    assert_eq!(hint.variable_name.as_deref(), Some("name"));
    assert_eq!(
        hint.description.as_deref(),
        Some("The name,  with  spacing.")
    );
}

#[test]
fn supplied_variable_name_takes_precedence_over_the_text() {
    let imports = ImportTable::new("App");
    let reflector = common::reflector(vec![]);
    let hint = parse_hint(
        "int A counter.",
        &imports,
        reflector.as_ref(),
        HintKind::Input,
        Some("count"),
        None,
        &ignored(&[]),
    )
    .hint()
    .expect("should parse");

    assert_eq!(hint.variable_name.as_deref(), Some("count"));
    assert_eq!(hint.description.as_deref(), Some("A counter."));
}

#[test]
fn output_hints_never_carry_a_variable_name() {
    let hint = parse("bool|null whether it worked", HintKind::Output, &ignored(&[]))
        .hint()
        .expect("should parse");

    assert_eq!(hint.kind, HintKind::Output);
    assert_eq!(hint.variable_name, None);
    assert_eq!(hint.description.as_deref(), Some("whether it worked"));
    assert_eq!(hint.to_string(), "bool|null");
}

#[test]
fn inline_comment_markers_are_stripped_from_descriptions() {
    let hint = parse("string $s A string. */", HintKind::Input, &ignored(&[]))
        .hint()
        .expect("should parse");

    assert_eq!(hint.description.as_deref(), Some("A string."));
}
