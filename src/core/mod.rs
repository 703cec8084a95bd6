// Core modules implementing policy, type identity, dialect encoding and document I/O.
pub mod cycle;
pub mod document;
pub mod error;
pub mod identity;
pub mod policy;
pub mod tagged;
