//! Serializer: terms back to the query string grammar.

use crate::types::{is_marker, Operator, Term, TermForm, AND_MARKER, COLLATE_KEY, DEFAULT_MODIFIER};
use std::fmt;

/// Render one term in the grammar [`extract_key_value`](crate::parser::extract_key_value) reads.
pub fn chip_to_string(term: &Term) -> String {
    let modifier = term.modifier_or_default();
    let value = term.value_str();
    let note = term
        .value_note
        .as_deref()
        .filter(|n| !n.is_empty())
        .map(|n| format!("[{n}]"))
        .unwrap_or_default();

    let mut out = match term.form() {
        TermForm::Tax if modifier != DEFAULT_MODIFIER => {
            return format!("tax_{modifier}({}{note})", value.unwrap_or_default());
        }
        TermForm::Collate => {
            return format!("{COLLATE_KEY}({}, {})", term.key, value.unwrap_or_default());
        }
        TermForm::Tax => term.key.clone(),
        TermForm::Generic if modifier != DEFAULT_MODIFIER => format!("{modifier}({})", term.key),
        TermForm::Generic => term.key.clone(),
    };

    match (term.operator, value) {
        (operator, Some(value)) => {
            out.push_str(operator.unwrap_or(Operator::Eq).as_str());
            out.push_str(value);
            out.push_str(&note);
        }
        (Some(operator), None) => out.push_str(operator.as_str()),
        (None, None) => {}
    }
    out
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&chip_to_string(self))
    }
}

/// Join terms with ` AND `, skipping `AND` markers and blanks. Accepts
/// anything displayable, so term strings and [`Term`]s mix freely once
/// mapped to a common type.
pub fn terms_to_string<I>(terms: I) -> String
where
    I: IntoIterator,
    I::Item: fmt::Display,
{
    terms
        .into_iter()
        .map(|t| t.to_string())
        .filter(|t| !is_marker(t))
        .collect::<Vec<_>>()
        .join(&format!(" {AND_MARKER} "))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
