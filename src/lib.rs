//! chips: search term compiler for faceted genomic-record queries.
//!
//! The heavy lifting lives in [`chips_core`]; this crate wires the stages
//! into a single [`compile`] call and ships the `chips` command-line tool.
//!
//! # Architecture
//!
//! ```text
//! Tokenizer ──► TermParser ──► Canonicalizer ──► Serializer
//!                   │
//!                   └──► SchemaValidator ──► CompiledQuery
//! ```

pub mod compile;

pub use chips_core::*;
pub use compile::{compile, Clause, CompiledQuery};
