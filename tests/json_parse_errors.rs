//! Purpose: Regression coverage for parse-failure category mapping.
//! Exports: Integration tests only.
//! Role: Verify stable category labels used by decode diagnostics.
//! Invariants: Category mapping remains deterministic for representative errors.
//! Notes: Uses source include to exercise internal helper logic without widening API surface.

#[allow(dead_code)]
#[path = "../src/json/parse.rs"]
mod parse;

use parse::ParseFailureCategory;
use serde_json::Value;

#[test]
fn category_mapping_handles_syntax_and_truncation() {
    let syntax_err = serde_json::from_str::<Value>(r#"{"a":}"#).unwrap_err();
    assert_eq!(
        parse::categorize_error(&syntax_err),
        ParseFailureCategory::Syntax
    );

    let eof_err = parse::from_reader::<_, Value>(br#"{"a":[1,"#.as_slice()).unwrap_err();
    assert_eq!(
        parse::categorize_error(&eof_err),
        ParseFailureCategory::Truncated
    );
}

#[test]
fn category_mapping_handles_depth_and_shape() {
    let depth = 256usize;
    let payload = format!("{}0{}", "[".repeat(depth), "]".repeat(depth));
    let depth_err = serde_json::from_str::<Value>(&payload).unwrap_err();
    assert_eq!(
        parse::categorize_error(&depth_err),
        ParseFailureCategory::DepthLimit
    );

    let shape_err = serde_json::from_str::<Vec<u8>>(r#"{"a":1}"#).unwrap_err();
    assert_eq!(
        parse::categorize_error(&shape_err),
        ParseFailureCategory::Shape
    );
}

#[test]
fn type_tag_messages_are_recognized() {
    assert_eq!(
        parse::categorize_message("missing $type metadata on object"),
        ParseFailureCategory::TypeTag
    );
    let err = <serde_json::Error as serde::de::Error>::custom("enum object is missing its $variant name");
    assert_eq!(parse::categorize_error(&err), ParseFailureCategory::TypeTag);
}

#[test]
fn hint_contains_category_and_context() {
    let err = serde_json::from_str::<Value>("[1,").unwrap_err();
    let hint = parse::hint_for_error(&err, "test.context");
    assert!(hint.contains("parse category: truncated"));
    assert!(hint.contains("context: test.context"));
}

#[test]
fn unknown_category_fallback_is_stable() {
    assert_eq!(
        parse::categorize_message("opaque parser issue"),
        ParseFailureCategory::Unknown
    );
}
