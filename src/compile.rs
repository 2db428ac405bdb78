//! End-to-end compilation of a raw query string.
//!
//! [`compile`] runs every stage in order and returns a [`CompiledQuery`]:
//! the canonical query string for history and URLs, plus one [`Clause`] per
//! surviving term for the search backend. Invalid clauses are kept and carry
//! their reasons, so nothing the user typed silently disappears.

use chips_core::{
    dedupe, extract_key_value, parse_value, terms_to_string, tokenize, FieldRegistry,
    ParsedValue, SchemaValidator, Term, TermValidation,
};
use serde::Serialize;
use std::collections::BTreeSet;

/// One surviving term, ready to be mapped to a backend filter clause.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Clause {
    pub term: Term,
    /// The term re-serialized in canonical spelling.
    pub text: String,
    /// Decoded value list, in written order.
    pub values: Vec<ParsedValue>,
    pub validation: TermValidation,
}

impl Clause {
    fn new(term: Term, validator: &SchemaValidator<'_>) -> Self {
        let values = term.values().into_iter().filter_map(parse_value).collect();
        let validation = validator.validate_term(&term);
        Self {
            text: term.to_string(),
            term,
            values,
            validation,
        }
    }
}

/// Output of [`compile`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompiledQuery {
    /// Canonical query string.
    pub query: String,
    pub clauses: Vec<Clause>,
    /// Keys whose duplicate terms were dropped.
    pub duplicate_keys: BTreeSet<String>,
}

impl CompiledQuery {
    pub fn is_valid(&self) -> bool {
        self.clauses.iter().all(|c| c.validation.is_valid())
    }

    pub fn invalid_clauses(&self) -> impl Iterator<Item = &Clause> {
        self.clauses.iter().filter(|c| !c.validation.is_valid())
    }
}

/// Tokenize, parse, dedupe and validate `raw` against `registry`.
pub fn compile(raw: &str, registry: &FieldRegistry) -> CompiledQuery {
    let validator = SchemaValidator::new(registry);
    let tokens = tokenize(raw);
    let deduped = dedupe(&tokens);

    let clauses: Vec<Clause> = deduped
        .terms()
        .map(|text| Clause::new(extract_key_value(text), &validator))
        .collect();
    let query = terms_to_string(clauses.iter().map(|c| &c.term));

    tracing::debug!(
        raw,
        %query,
        clauses = clauses.len(),
        duplicates = deduped.duplicate_keys.len(),
        "compile: query compiled"
    );
    CompiledQuery {
        query,
        clauses,
        duplicate_keys: deduped.duplicate_keys,
    }
}
