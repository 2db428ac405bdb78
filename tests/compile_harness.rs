#![allow(unused)]
//! End-to-end compile harness.
//!
//! # What this covers
//!
//! - **Canonical query**: duplicates removed, tax group first, terms in
//!   canonical spelling (snapshot-tested with insta).
//! - **Clauses**: each surviving term carries its decoded values and its
//!   validation; invalid clauses are kept, not dropped.
//! - **JSON report**: the shape handed to the search backend.
//! - **Stability**: compiling a compiled query changes nothing.
//!
//! # Running
//!
//! ```sh
//! cargo test --test compile_harness
//! # Update snapshots after intentional changes:
//! cargo insta review
//! ```

mod common;
use chips::{compile, FieldRegistry, Operator, ParsedValue};
use common::*;
use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use rstest::rstest;

fn builtin() -> FieldRegistry {
    FieldRegistry::builtin()
}

// ---------------------------------------------------------------------------
// Canonical query
// ---------------------------------------------------------------------------

#[test]
fn canonical_query_orders_and_dedupes() {
    let compiled = compile(
        "assembly_span=100000000 AND tax_tree(2759) AND assembly_span=100M",
        &builtin(),
    );
    assert_snapshot!(compiled.query, @"tax_tree(2759) AND assembly_span=100000000");
    assert_eq!(compiled.duplicate_keys.into_iter().collect::<Vec<_>>(), ["assembly_span"]);
}

#[test]
fn canonical_query_normalises_spelling() {
    let compiled = compile(
        "collate(sequence_id,name) and Assembly-Level = chromosome AND TAX_NAME( Homo sapiens )",
        &builtin(),
    );
    assert_snapshot!(
        compiled.query,
        @"tax_name(Homo sapiens) AND collate(sequence_id, name) AND Assembly_Level=chromosome"
    );
}

#[test]
fn empty_query_compiles_to_nothing() {
    let compiled = compile("   ", &builtin());
    assert_eq!(compiled.query, "");
    assert!(compiled.clauses.is_empty());
    assert!(compiled.is_valid());
}

// ---------------------------------------------------------------------------
// Clauses
// ---------------------------------------------------------------------------

#[test]
fn clauses_carry_decoded_values() {
    let compiled = compile("assembly_span>=1.5G AND bioproject=PRJEB40655,!PRJEB40656", &builtin());
    assert_eq!(compiled.clauses.len(), 2);

    let span = &compiled.clauses[0];
    assert_eq!(span.term.operator, Some(Operator::Ge));
    assert_eq!(span.values, [ParsedValue::Number(1_500_000_000.0)]);
    assert_eq!(span.text, "assembly_span>=1.5G");

    let bioproject = &compiled.clauses[1];
    assert_eq!(
        bioproject.values,
        [
            ParsedValue::Text("PRJEB40655".to_string()),
            ParsedValue::Text("!PRJEB40656".to_string())
        ]
    );
    assert!(compiled.is_valid());
}

#[test]
fn invalid_clauses_are_kept() {
    let compiled = compile("tax_tree(2759) AND contig_n50=3.5 AND wingspan=2", &builtin());
    assert_eq!(compiled.clauses.len(), 3);
    assert!(!compiled.is_valid());

    let invalid: Vec<&str> = compiled.invalid_clauses().map(|c| c.text.as_str()).collect();
    assert_eq!(invalid, ["contig_n50=3.5", "wingspan=2"]);
}

// ---------------------------------------------------------------------------
// JSON report
// ---------------------------------------------------------------------------

#[test]
fn json_report_shape() {
    let compiled = compile("tax_tree(2759[Eukaryota]) AND gc_percent<=40", &builtin());
    let json = serde_json::to_value(&compiled).unwrap();

    assert_eq!(json["query"], "tax_tree(2759[Eukaryota]) AND gc_percent<=40");
    assert_eq!(json["duplicate_keys"], serde_json::json!([]));

    let tax = &json["clauses"][0];
    assert_eq!(tax["term"]["key"], "tax");
    assert_eq!(tax["term"]["modifier"], "tree");
    assert_eq!(tax["term"]["valueNote"], "Eukaryota");
    assert_eq!(tax["term"]["operator"], serde_json::Value::Null);
    assert_eq!(tax["values"], serde_json::json!([2759.0]));
    assert_eq!(tax["validation"]["key"]["valid"], true);

    let gc = &json["clauses"][1];
    assert_eq!(gc["term"]["operator"], "<=");
}

// ---------------------------------------------------------------------------
// Stability
// ---------------------------------------------------------------------------

#[rstest]
fn compiling_twice_is_stable(#[values(0, 1, 2, 3, 4, 5, 6)] index: usize) {
    let registry = builtin();
    let once = compile(QUERIES[index], &registry);
    let twice = compile(&once.query, &registry);
    assert_eq!(twice.query, once.query);
    assert!(twice.duplicate_keys.is_empty());
}
