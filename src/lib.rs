//! Purpose: Read and write serde values as JSON documents on disk.
//! Exports: `api` (public operations and types) and `core` (policy, dialects, errors).
//! Role: Thin persistence helper; each call validates, encodes, and touches one file.
//! Invariants: Serialization behavior is chosen per call through an immutable `JsonPolicy`.
//! Invariants: Errors propagate to the caller unchanged in kind; nothing is retried.
pub mod api;
pub mod core;
mod json;
