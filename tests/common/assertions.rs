//! Domain-specific assertion macros for chips harnesses.
//!
//! These wrap `pretty_assertions` and add context-rich failure messages that
//! make it clear *which* term and *which* check failed.

// ---------------------------------------------------------------------------
// Validation assertions
// ---------------------------------------------------------------------------

/// Assert that a term string passes every check against a registry.
///
/// ```rust
/// assert_term_valid!(registry, "tax_tree(2759)");
/// ```
#[macro_export]
macro_rules! assert_term_valid {
    ($registry:expr, $term:expr) => {{
        let raw: &str = $term;
        let registry_ref = &$registry;
        let validator = chips_core::SchemaValidator::new(registry_ref);
        let result = validator.validate_term(&chips_core::extract_key_value(raw));
        if !result.is_valid() {
            panic!(
                "assert_term_valid! failed for {:?}\n  reasons: {:?}",
                raw,
                result.reasons()
            );
        }
    }};
}

/// Assert that a term string fails validation with a reason mentioning
/// `$fragment`.
///
/// ```rust
/// assert_term_invalid!(registry, "assembly_span=3.5", "integer");
/// ```
#[macro_export]
macro_rules! assert_term_invalid {
    ($registry:expr, $term:expr, $fragment:expr) => {{
        let raw: &str = $term;
        let fragment: &str = $fragment;
        let registry_ref = &$registry;
        let validator = chips_core::SchemaValidator::new(registry_ref);
        let result = validator.validate_term(&chips_core::extract_key_value(raw));
        if result.is_valid() {
            panic!("assert_term_invalid! failed: {:?} validated cleanly", raw);
        }
        let reasons = result.reasons();
        if !reasons.iter().any(|r| !r.is_empty() && r.contains(fragment)) {
            panic!(
                "assert_term_invalid! failed for {:?}\n  expected a reason containing {:?}\n  reasons: {:?}",
                raw, fragment, reasons
            );
        }
    }};
}

// ---------------------------------------------------------------------------
// Dedupe assertions
// ---------------------------------------------------------------------------

/// Assert the surviving terms and reported duplicate keys of `dedupe`.
///
/// ```rust
/// assert_dedupes_to!(["a=1", "a=1"], ["a=1"], ["a"]);
/// ```
#[macro_export]
macro_rules! assert_dedupes_to {
    ($input:expr, $unique:expr, $duplicates:expr) => {{
        let out = chips_core::dedupe(&$input);
        let unique: Vec<String> = $unique.iter().map(|s: &&str| s.to_string()).collect();
        let duplicates: std::collections::BTreeSet<String> =
            $duplicates.iter().map(|s: &&str| s.to_string()).collect();
        pretty_assertions::assert_eq!(out.unique_terms, unique, "unique terms");
        pretty_assertions::assert_eq!(out.duplicate_keys, duplicates, "duplicate keys");
    }};
}

/// Assert that two term strings share a canonical signature.
#[macro_export]
macro_rules! assert_same_signature {
    ($a:expr, $b:expr) => {{
        let a = chips_core::canonical_signature(&chips_core::extract_key_value($a));
        let b = chips_core::canonical_signature(&chips_core::extract_key_value($b));
        pretty_assertions::assert_eq!(a, b, "signatures of {:?} and {:?}", $a, $b);
    }};
}
