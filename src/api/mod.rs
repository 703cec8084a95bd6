//! Purpose: Define the public Rust API boundary for JSON document files.
//! Exports: File operations, their options and policies, and the error types.
//! Role: Stable, additive-only surface; every operation delegates to `core::document`.
//! Invariants: Operations build their policy per call and never share mutable configuration.
//! Invariants: Async variants run the synchronous body unchanged on a blocking worker.

mod files;
mod task;

pub use crate::core::cycle::Shared;
pub use crate::core::error::{Error, ErrorKind};
pub use crate::core::identity::TypeIdentity;
pub use crate::core::policy::{
    AssemblyStyle, CycleHandling, Formatting, JsonPolicy, ReadOptions, TypeNameHandling,
    WriteOptions,
};
pub use files::{
    ApiResult, read, read_with_policy, write, write_tree, write_with_policy, write_with_type_tags,
};
pub use task::{read_async, write_async};
