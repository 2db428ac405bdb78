//! Schema validator: checks a term's key, operator, modifier and value
//! against the [`FieldRegistry`].
//!
//! Validation never fails loudly. Every check returns a [`Validation`]
//! carrying a human-readable reason when the field is invalid, and invalid
//! terms stay in the caller's working set so they can be corrected.

use crate::schema::{FieldRegistry, FieldSchema, FieldType, TraverseDirection};
use crate::types::{Operator, Term, TermForm, COLLATE_KEY, DEFAULT_MODIFIER, TAX_KEY};
use crate::value::parse_value;
use serde::Serialize;
use std::collections::BTreeSet;

/// Modifiers accepted by the `tax` pseudo-key.
static TAX_MODIFIERS: phf::Set<&'static str> = phf::phf_set! {
    "tree", "name", "rank", "lineage", "level", "eq",
};

/// Modifiers whose result is a count, whatever the field type.
static COUNTING_MODIFIERS: phf::Set<&'static str> = phf::phf_set! {
    "count", "length",
};

/// Operators in display order.
const ALL_OPERATORS: [Operator; 6] = [
    Operator::Eq,
    Operator::Ne,
    Operator::Gt,
    Operator::Lt,
    Operator::Ge,
    Operator::Le,
];

// ---------------------------------------------------------------------------
// Results
// ---------------------------------------------------------------------------

/// Outcome of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Validation {
    pub fn ok() -> Self {
        Self {
            valid: true,
            reason: None,
        }
    }

    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: Some(reason.into()),
        }
    }
}

/// The four per-field checks for one term.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermValidation {
    pub key: Validation,
    pub operator: Validation,
    pub modifier: Validation,
    pub value: Validation,
}

impl TermValidation {
    pub fn is_valid(&self) -> bool {
        self.key.valid && self.operator.valid && self.modifier.valid && self.value.valid
    }

    /// Reasons of the failing checks, key first.
    pub fn reasons(&self) -> Vec<&str> {
        [&self.key, &self.operator, &self.modifier, &self.value]
            .into_iter()
            .filter_map(|v| v.reason.as_deref())
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Validator
// ---------------------------------------------------------------------------

/// Checks terms against a borrowed registry. Cheap to construct; holds no
/// state of its own.
#[derive(Debug, Clone, Copy)]
pub struct SchemaValidator<'a> {
    registry: &'a FieldRegistry,
}

impl<'a> SchemaValidator<'a> {
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self { registry }
    }

    /// Every key a term may use: the registry keys plus `tax` and `collate`.
    pub fn valid_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.registry.keys().map(str::to_string).collect();
        keys.push(TAX_KEY.to_string());
        keys.push(COLLATE_KEY.to_string());
        keys
    }

    /// Modifiers allowed for `key`. Empty for keys outside the registry.
    pub fn valid_modifiers(&self, key: &str) -> BTreeSet<String> {
        if key == TAX_KEY {
            return TAX_MODIFIERS.iter().map(|m| m.to_string()).collect();
        }
        let Some(schema) = self.registry.get(key) else {
            return BTreeSet::new();
        };

        let mut modifiers: BTreeSet<String> = schema
            .summary
            .iter()
            .map(|token| summary_modifier(token).to_string())
            .collect();
        modifiers.insert(DEFAULT_MODIFIER.to_string());
        if let Some(direction) = schema.traverse_direction {
            modifiers.insert("direct".to_string());
            let relative = match direction {
                TraverseDirection::Up => "descendant",
                TraverseDirection::Down | TraverseDirection::Both => "ancestor",
            };
            modifiers.insert(relative.to_string());
        }
        modifiers
    }

    /// Operators allowed for `key` under `modifier`. Tax and collate terms
    /// take no bare operator; keyword values only compare for (in)equality.
    pub fn valid_operators(&self, key: &str, modifier: Option<&str>) -> Vec<Operator> {
        if key == TAX_KEY || key == COLLATE_KEY {
            return Vec::new();
        }
        let modifier = modifier.unwrap_or(DEFAULT_MODIFIER);
        let keyword = self
            .registry
            .get(key)
            .is_some_and(|s| s.processed_type == FieldType::Keyword);
        ALL_OPERATORS
            .into_iter()
            .filter(|op| !(op.is_ordering() && keyword && modifier == DEFAULT_MODIFIER))
            .collect()
    }

    /// The closed set of values for `key`, when it has one: the declared
    /// enum plus `null`, for keyword fields compared by value.
    pub fn valid_values(&self, key: &str, modifier: Option<&str>) -> Option<Vec<String>> {
        let schema = self.registry.get(key)?;
        if schema.processed_type != FieldType::Keyword
            || modifier.unwrap_or(DEFAULT_MODIFIER) != DEFAULT_MODIFIER
        {
            return None;
        }
        let mut values = schema.constraint.enum_values.clone()?;
        values.push("null".to_string());
        Some(values)
    }

    pub fn validate_key(&self, key: &str) -> Validation {
        if key == TAX_KEY || key == COLLATE_KEY || self.registry.contains(key) {
            Validation::ok()
        } else if key.is_empty() {
            Validation::invalid("a key is required")
        } else {
            Validation::invalid(format!("'{key}' is not a searchable field"))
        }
    }

    pub fn validate_modifier(&self, key: &str, modifier: Option<&str>) -> Validation {
        let modifier = modifier.unwrap_or(DEFAULT_MODIFIER);
        let valid = self.valid_modifiers(key);
        if valid.contains(modifier) {
            Validation::ok()
        } else if valid.is_empty() {
            Validation::invalid(format!("'{key}' takes no modifiers"))
        } else {
            Validation::invalid(format!(
                "'{modifier}' is not a valid modifier for '{key}' (expected one of: {})",
                valid.into_iter().collect::<Vec<_>>().join(", ")
            ))
        }
    }

    /// An absent operator is always valid.
    pub fn validate_operator(
        &self,
        key: &str,
        modifier: Option<&str>,
        operator: Option<Operator>,
    ) -> Validation {
        let Some(operator) = operator else {
            return Validation::ok();
        };
        let valid = self.valid_operators(key, modifier);
        if valid.contains(&operator) {
            Validation::ok()
        } else if valid.is_empty() {
            Validation::invalid(format!("'{key}' does not take an operator"))
        } else {
            Validation::invalid(format!(
                "'{operator}' is not a valid operator for {}({key})",
                modifier.unwrap_or(DEFAULT_MODIFIER)
            ))
        }
    }

    /// Check each part of a comma-separated value independently.
    pub fn validate_value(&self, key: &str, modifier: Option<&str>, value: Option<&str>) -> Validation {
        let parts: Vec<&str> = value
            .map(|v| v.split(',').map(str::trim).filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();

        if key == TAX_KEY || key == COLLATE_KEY {
            return if parts.is_empty() {
                Validation::invalid(format!("'{key}' needs a value"))
            } else {
                Validation::ok()
            };
        }
        let Some(schema) = self.registry.get(key) else {
            return Validation::invalid(format!("no schema for '{key}'"));
        };

        let modifier = modifier.unwrap_or(DEFAULT_MODIFIER);
        parts
            .iter()
            .map(|part| check_part(schema, modifier, part))
            .find(|v| !v.valid)
            .unwrap_or_else(Validation::ok)
    }

    /// Run every check that applies to `term`'s form.
    pub fn validate_term(&self, term: &Term) -> TermValidation {
        let modifier = term.modifier.as_deref();
        match term.form() {
            TermForm::Collate => TermValidation {
                key: match self.validate_key(&term.key) {
                    v if v.valid && self.registry.contains(&term.key) => v,
                    v if !v.valid => v,
                    _ => Validation::invalid(format!("cannot collate by '{}'", term.key)),
                },
                operator: self.validate_operator(COLLATE_KEY, None, term.operator),
                modifier: Validation::ok(),
                value: self.validate_value(COLLATE_KEY, None, term.value.as_deref()),
            },
            TermForm::Tax | TermForm::Generic => TermValidation {
                key: self.validate_key(&term.key),
                operator: self.validate_operator(&term.key, modifier, term.operator),
                modifier: self.validate_modifier(&term.key, modifier),
                value: self.validate_value(&term.key, modifier, term.value.as_deref()),
            },
        }
    }
}

/// Modifier contributed by one summary token: `list` counts its entries,
/// compound tokens such as `mode_high` contribute their prefix.
fn summary_modifier(token: &str) -> &str {
    if token == "list" {
        return "length";
    }
    token.split_once('_').map_or(token, |(prefix, _)| prefix)
}

fn check_part(schema: &FieldSchema, modifier: &str, part: &str) -> Validation {
    let counting = COUNTING_MODIFIERS.contains(modifier);
    let processed_type = if counting {
        FieldType::Integer
    } else {
        schema.processed_type
    };

    if processed_type.is_numeric() {
        let Some(n) = parse_value(part).and_then(|v| v.as_number()) else {
            return Validation::invalid(format!("'{part}' is not a number"));
        };
        if processed_type.is_integer() && n.fract() != 0.0 {
            return Validation::invalid(format!("'{part}' is not an integer"));
        }
        if counting {
            return if n < 0.0 {
                Validation::invalid(format!("'{part}' is not a valid count"))
            } else {
                Validation::ok()
            };
        }
        if let Some(min) = schema.constraint.min.filter(|min| n < *min) {
            return Validation::invalid(format!("'{part}' is below the minimum of {min}"));
        }
        if let Some(max) = schema.constraint.max.filter(|max| n > *max) {
            return Validation::invalid(format!("'{part}' is above the maximum of {max}"));
        }
        return Validation::ok();
    }

    if processed_type == FieldType::Keyword {
        let bare = part.strip_prefix('!').unwrap_or(part).trim();
        if let Some(allowed) = schema.constraint.enum_values.as_ref() {
            let known = bare.eq_ignore_ascii_case("null")
                || allowed.iter().any(|a| a.eq_ignore_ascii_case(bare));
            if !known {
                return Validation::invalid(format!(
                    "'{bare}' is not one of: {}",
                    allowed.join(", ")
                ));
            }
        }
        if let Some(len) = schema.constraint.len.filter(|len| bare.chars().count() > *len) {
            return Validation::invalid(format!("'{bare}' is longer than {len} characters"));
        }
    }
    Validation::ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
