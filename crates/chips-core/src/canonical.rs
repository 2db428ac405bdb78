//! Canonicalizer: duplicate detection and stable ordering of term lists.
//!
//! Two terms are duplicates when their [`canonical_signature`]s match. The
//! signature ignores key and value case, the order of list values, and the
//! way a number was written (`100M` and `100000000` are the same value).
//!
//! [`dedupe`] keeps the first occurrence of every signature, groups the
//! survivors by key with the taxonomy group leading ([`KeyOrder`]), and
//! reports the keys whose later occurrences were dropped so the caller can
//! tell the user.

use crate::parser::extract_key_value;
use crate::types::{is_marker, Term, AND_MARKER, DEFAULT_MODIFIER, TAX_KEY};
use crate::value::{exact_decimal, parse_value};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Output of [`dedupe`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Deduped {
    /// Surviving term strings, groups separated by the `AND` marker.
    pub unique_terms: Vec<String>,
    /// Keys that had a later duplicate dropped. Tax keys are recorded as
    /// `tax_<modifier>`.
    pub duplicate_keys: BTreeSet<String>,
}

impl Deduped {
    /// The surviving terms without the `AND` markers.
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.unique_terms
            .iter()
            .map(String::as_str)
            .filter(|t| !is_marker(t))
    }
}

/// Group ordering: the `tax` group always leads, every other key follows in
/// the order it was first seen.
#[derive(Debug, Default)]
pub struct KeyOrder {
    keys: Vec<String>,
}

impl KeyOrder {
    /// Record `key`; a key already seen keeps its position.
    pub fn observe(&mut self, key: &str) {
        if self.keys.iter().any(|k| k == key) {
            return;
        }
        if key == TAX_KEY {
            self.keys.insert(0, key.to_string());
        } else {
            self.keys.push(key.to_string());
        }
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }
}

/// Order- and case-insensitive identity of a term:
/// `modifier(key)OPv1,v2,...` with the values normalised and sorted.
pub fn canonical_signature(term: &Term) -> String {
    let modifier = term.modifier_or_default().to_lowercase();
    let key = term.key.to_lowercase();
    let operator = term.operator_or_default();
    format!("{modifier}({key}){operator}{}", canonical_values(term))
}

fn canonical_values(term: &Term) -> String {
    let mut parts: Vec<String> = term
        .value
        .as_deref()
        .unwrap_or_default()
        .split(',')
        .map(canonical_part)
        .collect();
    parts.sort();
    parts.join(",")
}

/// Lower-case text; numbers in their plain decimal form. A leading `!` is
/// kept, so a negated value never matches its positive twin.
///
/// A part counts as a number only when the `f64` it decodes to prints back
/// as exactly the decimal that was written. Zero-padded codes (`007`) and
/// integers past 2^53 stay text, so distinct values never merge.
fn canonical_part(part: &str) -> String {
    let part = part.trim();
    let (negation, body) = match part.strip_prefix('!') {
        Some(rest) => ("!", rest.trim()),
        None => ("", part),
    };
    match exact_number(body) {
        Some(digits) => format!("{negation}{digits}"),
        None => format!("{negation}{}", body.to_lowercase()),
    }
}

fn exact_number(body: &str) -> Option<String> {
    let digits = exact_decimal(body)?;
    let n = parse_value(body)?.as_number()?;
    (n.to_string() == digits).then_some(digits)
}

/// Drop duplicate terms, keeping first occurrences, and regroup the rest by
/// key. Running `dedupe` on its own output changes nothing.
pub fn dedupe<S: AsRef<str>>(terms: &[S]) -> Deduped {
    let mut seen: HashSet<String> = HashSet::from([AND_MARKER.to_string()]);
    let mut by_key: HashMap<String, Vec<String>> = HashMap::new();
    let mut order = KeyOrder::default();
    let mut duplicate_keys = BTreeSet::new();

    for raw in terms.iter().map(AsRef::as_ref) {
        if is_marker(raw) {
            continue;
        }
        let term = extract_key_value(raw);
        let signature = canonical_signature(&term);
        let key = term.key.to_lowercase();

        if seen.insert(signature.clone()) {
            order.observe(&key);
            by_key.entry(key).or_default().push(raw.to_string());
        } else {
            let reported = if key == TAX_KEY {
                format!("{key}_{}", term.modifier.as_deref().unwrap_or(DEFAULT_MODIFIER))
            } else {
                key
            };
            tracing::debug!(term = raw, %signature, "canonical: dropped duplicate");
            duplicate_keys.insert(reported);
        }
    }

    let mut unique_terms = Vec::new();
    for key in order.keys() {
        let Some(group) = by_key.remove(key).filter(|g| !g.is_empty()) else {
            continue;
        };
        if !unique_terms.is_empty() {
            unique_terms.push(AND_MARKER.to_string());
        }
        unique_terms.extend(group);
    }

    if !duplicate_keys.is_empty() {
        tracing::warn!(?duplicate_keys, "canonical: duplicate terms removed");
    }
    Deduped {
        unique_terms,
        duplicate_keys,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
