//! Term parser: one term string to a structured [`Term`].
//!
//! Four surface forms are recognised:
//!
//! ```text
//! key OP value              assembly_span>=100M
//! modifier(key) OP value    max(assembly_span)<=3G
//! tax_modifier(value[note]) tax_tree(2759[Eukaryota])
//! collate(key, value)       collate(sequence_id,name)
//! ```
//!
//! Parsing never fails. A string that matches none of the forms becomes the
//! key of a term with no operator and no value, and the schema validator is
//! left to explain what is wrong with it.

use crate::types::{Operator, Term, COLLATE_KEY, DEFAULT_MODIFIER, TAX_KEY};

/// Prefixes that turn a function call into a tax term.
const TAX_PREFIXES: [&str; 2] = ["tax_", "tax-"];

/// Surface grammar of a single term, classified before it is lowered into a
/// [`Term`].
#[derive(Debug, Clone, PartialEq)]
enum Syntax<'a> {
    /// `key`, `key OP`, `key OP value`.
    Comparison {
        key: &'a str,
        operator: Option<Operator>,
        value: Option<&'a str>,
    },
    /// `modifier(key)` optionally followed by `OP value`.
    Function {
        modifier: &'a str,
        key: &'a str,
        operator: Option<Operator>,
        value: Option<&'a str>,
    },
    /// `tax_modifier(value)`, the value still carrying any `[note]`.
    Tax { modifier: &'a str, value: &'a str },
    /// `collate(key, value)`.
    Collate { key: &'a str, value: &'a str },
}

/// Parse one term string. Total: every input yields a `Term`.
pub fn extract_key_value(term: &str) -> Term {
    let syntax = classify(term);
    tracing::debug!(term, ?syntax, "parser: classified term");
    lower(syntax)
}

/// Split `term` on the first operator token, testing tokens in
/// [`Operator::SPLIT_ORDER`].
fn split_operator(term: &str) -> (&str, Option<Operator>, Option<&str>) {
    for op in Operator::SPLIT_ORDER {
        if let Some((key, value)) = term.split_once(op.as_str()) {
            return (key, Some(op), Some(value));
        }
    }
    (term, None, None)
}

/// Like [`split_operator`], but a `tax_modifier(...)` call is opaque: only
/// text after its closing `)` is searched, so `tax_name(a<b)` stays whole.
fn split_outside_tax_call(term: &str) -> (&str, Option<Operator>, Option<&str>) {
    let Some((before, _)) = term.split_once('(') else {
        return split_operator(term);
    };
    let is_tax_call = strip_tax_prefix(before.trim())
        .is_some_and(|m| m.chars().all(|c| c.is_alphanumeric() || c == '_'));
    if !is_tax_call {
        return split_operator(term);
    }

    let call_end = term.rfind(')').map_or(term.len(), |close| close + 1);
    match split_operator(&term[call_end..]) {
        (tail, Some(operator), value) => (&term[..call_end + tail.len()], Some(operator), value),
        _ => (term, None, None),
    }
}

fn classify(term: &str) -> Syntax<'_> {
    let (key_part, operator, value_part) = split_outside_tax_call(term);

    let Some((before, after)) = key_part.split_once('(') else {
        return Syntax::Comparison {
            key: key_part,
            operator,
            value: value_part,
        };
    };
    let inner = match after.rfind(')') {
        Some(close) => &after[..close],
        None => after,
    };
    let modifier = before.trim();

    if operator.is_some() {
        return Syntax::Function {
            modifier,
            key: inner,
            operator,
            value: value_part,
        };
    }

    if let Some(stripped) = strip_tax_prefix(modifier) {
        return Syntax::Tax {
            modifier: stripped,
            value: inner,
        };
    }
    if modifier.eq_ignore_ascii_case(COLLATE_KEY) {
        let (key, value) = inner.split_once(',').unwrap_or((inner, ""));
        return Syntax::Collate { key, value };
    }
    Syntax::Function {
        modifier,
        key: inner,
        operator: None,
        value: None,
    }
}

fn strip_tax_prefix(modifier: &str) -> Option<&str> {
    TAX_PREFIXES.iter().find_map(|prefix| {
        let head = modifier.get(..prefix.len())?;
        head.eq_ignore_ascii_case(prefix)
            .then(|| &modifier[prefix.len()..])
    })
}

/// Split a trailing `[note]` off a tax value.
fn split_note(value: &str) -> (&str, Option<&str>) {
    let value = value.trim();
    if let Some(body) = value.strip_suffix(']') {
        if let Some(open) = body.rfind('[') {
            return (&body[..open], Some(&body[open + 1..]));
        }
    }
    (value, None)
}

/// Trim, and map dashes to underscores. The tax and collate literals are
/// lower-cased; other keys keep their case.
pub fn normalize_key(key: &str) -> String {
    let key = key.trim().replace('-', "_");
    if key.eq_ignore_ascii_case(TAX_KEY) || key.eq_ignore_ascii_case(COLLATE_KEY) {
        key.to_ascii_lowercase()
    } else {
        key
    }
}

fn trimmed(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn lower(syntax: Syntax<'_>) -> Term {
    match syntax {
        Syntax::Comparison {
            key,
            operator,
            value,
        } => {
            let key = normalize_key(key);
            let value = match trimmed(value) {
                None if key == TAX_KEY => Some(String::new()),
                v => v,
            };
            Term {
                key,
                operator,
                value,
                value_note: None,
                modifier: Some(DEFAULT_MODIFIER.to_string()),
            }
        }
        Syntax::Function {
            modifier,
            key,
            operator,
            value,
        } => Term {
            key: normalize_key(key),
            operator,
            value: trimmed(value),
            value_note: None,
            modifier: Some(modifier.to_string()),
        },
        Syntax::Tax { modifier, value } => {
            let (value, note) = split_note(value);
            Term {
                key: TAX_KEY.to_string(),
                operator: None,
                value: Some(value.trim().to_string()),
                value_note: trimmed(note),
                modifier: Some(modifier.trim().to_ascii_lowercase()),
            }
        }
        Syntax::Collate { key, value } => Term {
            key: normalize_key(key),
            operator: None,
            value: trimmed(Some(value)),
            value_note: None,
            modifier: Some(COLLATE_KEY.to_string()),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
