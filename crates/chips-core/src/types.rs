//! Core types for chips-core.
//!
//! This module defines the data shared by every compiler stage: the parsed
//! [`Term`], its comparison [`Operator`], the [`TermForm`] tag that tells the
//! tax and collate pseudo-fields apart from ordinary keys, and the
//! [`ParsedValue`] produced by the value codec.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Literal key of the taxonomy pseudo-field.
pub const TAX_KEY: &str = "tax";
/// Literal name of the collate pseudo-field (and its modifier).
pub const COLLATE_KEY: &str = "collate";
/// Modifier meaning "no function applied".
pub const DEFAULT_MODIFIER: &str = "value";
/// Structural marker joining terms in a query string. Never a term itself.
pub const AND_MARKER: &str = "AND";

/// True for the structural `AND` marker (and blank leftovers around it).
pub fn is_marker(term: &str) -> bool {
    let term = term.trim();
    term.is_empty() || term == AND_MARKER
}

// ---------------------------------------------------------------------------
// Operator
// ---------------------------------------------------------------------------

/// Comparison operator between a key and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Operator {
    #[serde(rename = "=")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "<=")]
    Le,
}

impl Operator {
    /// Every operator, in the precedence used when splitting a term: two-char
    /// tokens first so `>=` is never read as `>` followed by `=value`.
    pub const SPLIT_ORDER: [Operator; 6] = [
        Operator::Ne,
        Operator::Ge,
        Operator::Le,
        Operator::Lt,
        Operator::Gt,
        Operator::Eq,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Operator::Eq => "=",
            Operator::Ne => "!=",
            Operator::Gt => ">",
            Operator::Lt => "<",
            Operator::Ge => ">=",
            Operator::Le => "<=",
        }
    }

    /// Ordering comparisons, meaningless for keyword values.
    pub fn is_ordering(self) -> bool {
        matches!(self, Operator::Gt | Operator::Lt | Operator::Ge | Operator::Le)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "=" => Ok(Operator::Eq),
            "!=" => Ok(Operator::Ne),
            ">" => Ok(Operator::Gt),
            "<" => Ok(Operator::Lt),
            ">=" => Ok(Operator::Ge),
            "<=" => Ok(Operator::Le),
            other => Err(format!("unknown operator: {other}")),
        }
    }
}

// ---------------------------------------------------------------------------
// Term
// ---------------------------------------------------------------------------

/// Which grammar a term was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermForm {
    /// `key OP value` or `modifier(key) OP value`.
    Generic,
    /// `tax_modifier(value[note])`.
    Tax,
    /// `collate(key, value)`.
    Collate,
}

/// One parsed filter clause.
///
/// Terms are values: an edit builds a new `Term` that replaces the old one in
/// its owning sequence.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Term {
    /// Normalised key: trimmed, dashes replaced with underscores. The `tax`
    /// pseudo-key is always lower-case; other keys keep their case.
    pub key: String,
    /// `None` for tax and collate terms, and for a bare key.
    #[serde(default)]
    pub operator: Option<Operator>,
    /// Raw value text. Comma-separated parts form a list whose order matters
    /// to the user but not to equivalence.
    #[serde(default)]
    pub value: Option<String>,
    /// Bracketed annotation carried by tax values, e.g. `Eukaryota` in
    /// `2759[Eukaryota]`.
    #[serde(default, rename = "valueNote", skip_serializing_if = "Option::is_none")]
    pub value_note: Option<String>,
    /// Function wrapping the key. Absent means `"value"`.
    #[serde(default)]
    pub modifier: Option<String>,
}

impl Term {
    /// A `key OP value` term with the default modifier.
    pub fn new(key: impl Into<String>, operator: Operator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator: Some(operator),
            value: Some(value.into()),
            value_note: None,
            modifier: Some(DEFAULT_MODIFIER.to_string()),
        }
    }

    /// A `tax_<modifier>(value)` term.
    pub fn tax(modifier: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: TAX_KEY.to_string(),
            operator: None,
            value: Some(value.into()),
            value_note: None,
            modifier: Some(modifier.into()),
        }
    }

    /// A `collate(key, value)` term.
    pub fn collate(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            operator: None,
            value: Some(value.into()),
            value_note: None,
            modifier: Some(COLLATE_KEY.to_string()),
        }
    }

    pub fn with_modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifier = Some(modifier.into());
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.value_note = Some(note.into());
        self
    }

    pub fn form(&self) -> TermForm {
        if self.key == TAX_KEY {
            TermForm::Tax
        } else if self
            .modifier
            .as_deref()
            .is_some_and(|m| m.eq_ignore_ascii_case(COLLATE_KEY))
        {
            TermForm::Collate
        } else {
            TermForm::Generic
        }
    }

    pub fn modifier_or_default(&self) -> &str {
        match self.modifier.as_deref() {
            Some(m) if !m.is_empty() => m,
            _ => DEFAULT_MODIFIER,
        }
    }

    pub fn operator_or_default(&self) -> Operator {
        self.operator.unwrap_or(Operator::Eq)
    }

    /// The value text, if present and not blank.
    pub fn value_str(&self) -> Option<&str> {
        self.value.as_deref().filter(|v| !v.trim().is_empty())
    }

    /// Trimmed, non-empty parts of the comma-separated value, in written order.
    pub fn values(&self) -> Vec<&str> {
        self.value
            .as_deref()
            .map(|v| v.split(',').map(str::trim).filter(|p| !p.is_empty()).collect())
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// ParsedValue
// ---------------------------------------------------------------------------

/// A value after numeric decoding: either a canonical number or the original
/// text (accession IDs, taxon names, `null`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParsedValue {
    Number(f64),
    Text(String),
}

impl ParsedValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            ParsedValue::Number(n) => Some(*n),
            ParsedValue::Text(_) => None,
        }
    }
}

impl fmt::Display for ParsedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParsedValue::Number(n) => write!(f, "{n}"),
            ParsedValue::Text(s) => f.write_str(s),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
