//! chips-core: the search term compiler.
//!
//! Turns AND-joined filter queries such as
//! `tax_tree(2759) AND assembly_span>=100M` into structured [`Term`]s,
//! validates them against a field registry, removes duplicates, and writes
//! them back out.
//!
//! # Pipeline
//!
//! ```text
//! raw ──► tokenizer ──► parser ──► canonical ──► serialize
//!                         │
//!                         └──► validate (side report)
//! ```
//!
//! Every stage is a pure function of its input. The only shared data is the
//! [`FieldRegistry`], which is read-only once loaded.

pub mod canonical;
pub mod config;
pub mod parser;
pub mod schema;
pub mod serialize;
pub mod tokenizer;
pub mod types;
pub mod validate;
pub mod value;

pub use canonical::{canonical_signature, dedupe, Deduped, KeyOrder};
pub use parser::extract_key_value;
pub use schema::{Constraint, FieldRegistry, FieldSchema, FieldType, SchemaError, TraverseDirection};
pub use serialize::{chip_to_string, terms_to_string};
pub use tokenizer::tokenize;
pub use types::{Operator, ParsedValue, Term, TermForm};
pub use validate::{SchemaValidator, TermValidation, Validation};
pub use value::{format_value, parse_value};
