//! Purpose: Synchronous document write/read operations.
//! Exports: `write`, `write_with_type_tags`, `write_tree`, `write_with_policy`,
//! `read`, `read_with_policy`.
//! Role: Map each named operation onto a freshly built `JsonPolicy`.
//! Invariants: Argument errors are reported before any file is created or truncated.
//! Invariants: `write_tree` output is write-only for cyclic graphs; no reader restores it.
#![allow(clippy::result_large_err)]

use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::core::document;
use crate::core::error::Error;
use crate::core::policy::{JsonPolicy, ReadOptions, WriteOptions};

pub type ApiResult<T> = Result<T, Error>;

/// Writes `data` as plain JSON matching its serde shape.
pub fn write<T: ?Sized + Serialize>(
    path: impl AsRef<Path>,
    data: &T,
    options: WriteOptions,
) -> ApiResult<()> {
    let policy = JsonPolicy::plain().with_indent(options.indent);
    write_with_policy(path, data, options.create_if_missing, &policy)
}

/// Writes `data` with `$type` metadata so it can be read back with
/// `ReadOptions { use_type_tags: true }`.
pub fn write_with_type_tags<T: ?Sized + Serialize>(
    path: impl AsRef<Path>,
    data: &T,
    options: WriteOptions,
) -> ApiResult<()> {
    let policy = JsonPolicy::tagged_writer().with_indent(options.indent);
    write_with_policy(path, data, options.create_if_missing, &policy)
}

/// Writes a graph of `Shared` nodes, re-emitting nodes reached through a cycle
/// instead of failing. Always indented.
pub fn write_tree<T: ?Sized + Serialize>(
    path: impl AsRef<Path>,
    data: &T,
    create_if_missing: bool,
) -> ApiResult<()> {
    write_with_policy(path, data, create_if_missing, &JsonPolicy::tree())
}

pub fn write_with_policy<T: ?Sized + Serialize>(
    path: impl AsRef<Path>,
    data: &T,
    create_if_missing: bool,
    policy: &JsonPolicy,
) -> ApiResult<()> {
    document::write_document(path.as_ref(), data, create_if_missing, policy).map(|_| ())
}

pub fn read<T: DeserializeOwned>(path: impl AsRef<Path>, options: ReadOptions) -> ApiResult<T> {
    read_with_policy(path, &options.policy())
}

pub fn read_with_policy<T: DeserializeOwned>(
    path: impl AsRef<Path>,
    policy: &JsonPolicy,
) -> ApiResult<T> {
    document::read_document(path.as_ref(), policy)
}
