//! End-to-end tests across the lexer, parser, serializer, and validator.

use ton_format::{
    format, parse, parse_with_options, serialize, serialize_with_options, validate, ParseOptions,
    SerializeOptions, TonError, TonFormatStyle, TonValue,
};

// ---- parsing ----

#[test]
fn duplicate_property_last_wins() {
    let doc = parse("{name='first', name='second'}").unwrap();
    assert_eq!(doc.get_string("/name"), Some("second"));
}

#[test]
fn numeric_property_names_are_distinct() {
    let doc = parse("{2022=1,2023=2}").unwrap();
    assert_eq!(doc.get_integer("/2022"), Some(1));
    assert_eq!(doc.get_integer("/2023"), Some(2));

    let doc = parse("{3.14 = 'pi'}").unwrap();
    assert_eq!(doc.get_string("/3.14"), Some("pi"));
}

#[test]
fn hex_and_binary_literals() {
    let doc = parse("{h = 0xFF, b = 0b1010}").unwrap();
    assert_eq!(doc.get_integer("/h"), Some(255));
    assert_eq!(doc.get_integer("/b"), Some(10));
}

#[test]
fn guid_values_parse_and_round_trip() {
    let doc = parse("{id = 550e8400-e29b-41d4-a716-446655440000}").unwrap();
    assert!(matches!(doc.get_value("/id"), Some(TonValue::Guid(_))));

    let out = serialize_with_options(&doc, &SerializeOptions::compact()).unwrap();
    assert_eq!(out, "{id = 550e8400-e29b-41d4-a716-446655440000}");
}

#[test]
fn multiline_string_dedent() {
    // Outer property indented 4, inner content indented 8: content comes
    // out dedented to the inner-relative 0/2 columns.
    let text = "{\n    text = \"\"\"\n        Hello\n          World\n        \"\"\"\n}";
    let doc = parse(text).unwrap();
    assert_eq!(doc.get_string("/text"), Some("Hello\n  World"));
}

#[test]
fn multiline_string_preserves_blank_lines() {
    let text = "{text = \"\"\"\n    first\n\n    last\n    \"\"\"}";
    let doc = parse(text).unwrap();
    assert_eq!(doc.get_string("/text"), Some("first\n\nlast"));
}

#[test]
fn nesting_depth_error_names_the_limit() {
    let mut text = String::new();
    for _ in 0..10 {
        text.push_str("{a = ");
    }
    text.push('1');
    for _ in 0..10 {
        text.push('}');
    }
    let options = ParseOptions {
        max_nesting_depth: 5,
        ..ParseOptions::default()
    };
    match parse_with_options(&text, &options) {
        Err(TonError::Parse { msg, .. }) => {
            assert!(msg.contains("Maximum nesting depth 5"), "{}", msg);
        }
        other => panic!("expected a parse error, got {:?}", other),
    }
}

#[test]
fn empty_document_is_an_argument_error() {
    for text in ["", "   ", "// only a comment", "/* block */"] {
        assert!(
            matches!(parse(text), Err(TonError::Argument(_))),
            "input {:?}",
            text
        );
    }
}

#[test]
fn empty_enum_set() {
    let doc = parse("{perms = ||}").unwrap();
    assert_eq!(doc.get_value("/perms"), Some(&TonValue::EnumSet(vec![])));
}

#[test]
fn child_objects_and_class_clauses() {
    let doc = parse("{(Company:1) name = 'Acme', {(Dept) title = 'R&D'}}").unwrap();
    let root = doc.root_object().unwrap();
    assert_eq!(root.class_name(), Some("Company"));
    assert_eq!(root.instance_count(), Some(1));
    assert_eq!(root.children().len(), 1);
    assert_eq!(doc.get_string("/Dept/title"), Some("R&D"));
}

// ---- round trips ----

fn assert_round_trips(text: &str) {
    let doc = parse(text).unwrap();
    for options in [SerializeOptions::pretty(), SerializeOptions::compact()] {
        let out = serialize_with_options(&doc, &options).unwrap();
        let reparsed = parse(&out).unwrap();
        assert_eq!(
            reparsed.root(),
            doc.root(),
            "round trip through {:?} for {:?}",
            options.indentation,
            text
        );
    }
}

#[test]
fn round_trip_all_value_kinds() {
    assert_round_trips(
        "{s = 'text', i = 42, neg = -7, h = 0xFF, b = 0b101, f = 3.25, w = 2.0, \
         t = true, g = 550e8400-e29b-41d4-a716-446655440000, \
         d = ^'2024-01-15T10:30:00Z', e = |active|, es = |read|write|, \
         arr = [1, 'two', [true]], nested = {x = 1}}",
    );
}

#[test]
fn round_trip_keeps_nulls_in_pretty() {
    let doc = parse("{a = null, b = undefined}").unwrap();
    let out = serialize(&doc).unwrap();
    let reparsed = parse(&out).unwrap();
    assert_eq!(reparsed.root(), doc.root());
}

#[test]
fn round_trip_quoted_names_and_escapes() {
    assert_round_trips("{'has space' = 1, 'quote\\'s' = 'a\\nb\\tc', '' = 'empty'}");
}

#[test]
fn round_trip_class_tagged_children() {
    assert_round_trips("{(Root) p = 1, {(Child:3) q = 2, {(Grand) r = 3}}}");
}

#[test]
fn round_trip_header_and_schemas() {
    let text = "#@ tonVersion = '1', @schema = 'types.ton'\n{(person) status = |1|}\n#! enum(status) [active, inactive]\n#! {(person) /status = enum:status(required)}";
    let doc = parse(text).unwrap();
    let out = serialize(&doc).unwrap();
    let reparsed = parse(&out).unwrap();

    assert_eq!(reparsed.header(), doc.header());
    assert_eq!(reparsed.schemas(), doc.schemas());
    assert_eq!(reparsed.root(), doc.root());
}

#[test]
fn formatting_is_idempotent() {
    let text = "{b = 0x10, a = {list = [1, 2.5, 'x']}, s = 'l1\\nl2\\nl3'}";
    for style in [TonFormatStyle::Pretty, TonFormatStyle::Compact] {
        let once = format(text, style).unwrap();
        let twice = format(&once, style).unwrap();
        assert_eq!(once, twice, "style {:?}", style);
    }
}

// ---- validation ----

#[test]
fn validation_aggregates_every_failure() {
    let doc = parse(
        "{(person) age = 200}\n#! {(person) /name = string(required), /age = int(min(0), max(150))}",
    )
    .unwrap();
    let result = validate(&doc);
    assert!(!result.is_valid());
    assert_eq!(result.errors().len(), 2);

    let paths: Vec<&str> = result.errors().iter().map(|e| e.path.as_str()).collect();
    assert_eq!(paths, ["/name", "/age"]);
}

#[test]
fn enum_by_index_validates_as_named_member() {
    let doc = parse(
        "{(person) status = |1|}\n#! enum(status) [active, inactive]\n#! {(person) /status = enum:status}",
    )
    .unwrap();
    assert!(validate(&doc).is_valid());

    match doc.get_value("/status") {
        Some(TonValue::Enum(member)) => {
            assert_eq!(member.raw(), "1");
            assert_eq!(member.canonical(), "inactive");
        }
        other => panic!("expected an enum value, got {:?}", other),
    }
}

#[test]
fn validation_is_case_insensitive_on_class_names() {
    let doc = parse("{(PERSON) age = -5}\n#! {(person) /age = int(min(0))}").unwrap();
    let result = validate(&doc);
    assert_eq!(result.errors().len(), 1);
}

// ---- serialization presets ----

#[test]
fn compact_is_single_line() {
    let doc = parse("{a = 1, b = {c = [1, 2]}}").unwrap();
    let out = serialize_with_options(&doc, &SerializeOptions::compact()).unwrap();
    assert!(!out.contains('\n'));
    assert_eq!(out, "{a = 1, b = {c = [1, 2]}}");
}

#[test]
fn pretty_emits_hints_and_indentation() {
    let doc = parse("{name = 'Ada', age = 36}").unwrap();
    let out = serialize(&doc).unwrap();
    assert_eq!(out, "{\n    name = $'Ada',\n    age = %36\n}");
}

#[test]
fn at_prefix_reads_back_equivalently() {
    let plain = parse("{name = 'Ada'}").unwrap();
    let prefixed = parse("{@name = 'Ada'}").unwrap();
    assert_eq!(plain.root(), prefixed.root());
}

#[test]
fn serde_export_to_json() {
    let doc = parse("{(Person) name = 'Ada', scores = [1, 2]}").unwrap();
    let json = serde_json::to_value(&doc).unwrap();
    assert_eq!(json["_className"], "Person");
    assert_eq!(json["name"], "Ada");
    assert_eq!(json["scores"][1], 2);
}
