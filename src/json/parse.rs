//! Purpose: Decode documents and classify decode failures for diagnostics.
//! Exports: `from_reader`, `ParseFailureCategory`, `categorize_error`,
//! `categorize_message`, `hint_for_error`.
//! Role: Parser boundary around serde_json used by every document read.
//! Invariants: Category labels are stable; callers and tests match on them.
//! Invariants: Hints never echo document content, only category and context.
//! Notes: Error mapping into the crate error type is done by callsites so path
//! context stays explicit.

use std::io::Read;

use serde::de::DeserializeOwned;
use serde_json::error::Category;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum ParseFailureCategory {
    Syntax,
    Truncated,
    Shape,
    TypeTag,
    DepthLimit,
    Io,
    Unknown,
}

impl ParseFailureCategory {
    pub(crate) fn label(self) -> &'static str {
        match self {
            ParseFailureCategory::Syntax => "syntax",
            ParseFailureCategory::Truncated => "truncated",
            ParseFailureCategory::Shape => "shape",
            ParseFailureCategory::TypeTag => "type-tag",
            ParseFailureCategory::DepthLimit => "depth-limit",
            ParseFailureCategory::Io => "io",
            ParseFailureCategory::Unknown => "unknown",
        }
    }
}

pub(crate) fn from_reader<R: Read, T: DeserializeOwned>(reader: R) -> Result<T, serde_json::Error> {
    serde_json::from_reader(reader)
}

pub(crate) fn categorize_error(err: &serde_json::Error) -> ParseFailureCategory {
    match err.classify() {
        Category::Io => ParseFailureCategory::Io,
        Category::Eof => ParseFailureCategory::Truncated,
        Category::Syntax => match categorize_message(&err.to_string()) {
            ParseFailureCategory::DepthLimit => ParseFailureCategory::DepthLimit,
            _ => ParseFailureCategory::Syntax,
        },
        Category::Data => match categorize_message(&err.to_string()) {
            ParseFailureCategory::TypeTag => ParseFailureCategory::TypeTag,
            _ => ParseFailureCategory::Shape,
        },
    }
}

pub(crate) fn categorize_message(message: &str) -> ParseFailureCategory {
    let message = message.to_ascii_lowercase();
    if message.contains("recursion limit") {
        return ParseFailureCategory::DepthLimit;
    }
    if message.contains("$type") || message.contains("$variant") || message.contains("$value") {
        return ParseFailureCategory::TypeTag;
    }
    ParseFailureCategory::Unknown
}

pub(crate) fn hint_for_error(err: &serde_json::Error, context: &str) -> String {
    format!(
        "parse category: {}; context: {context}",
        categorize_error(err).label()
    )
}
