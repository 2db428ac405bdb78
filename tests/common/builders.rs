//! Test builders: ergonomic constructors for `Term`, `FieldSchema` and
//! `FieldRegistry`.
//!
//! These builders are designed for readability in test assertions, not for
//! production use. They panic on invalid input rather than returning `Result`.

use chips_core::{FieldRegistry, FieldSchema, FieldType, Operator, Term, TraverseDirection};
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// TermBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for [`Term`] fixtures.
///
/// # Example
///
/// ```rust
/// let term = TermBuilder::new("assembly_span")
///     .op(Operator::Ge)
///     .value("100M")
///     .modifier("max")
///     .build();
/// ```
pub struct TermBuilder {
    term: Term,
}

impl TermBuilder {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            term: Term {
                key: key.into(),
                ..Term::default()
            },
        }
    }

    pub fn op(mut self, operator: Operator) -> Self {
        self.term.operator = Some(operator);
        self
    }

    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.term.value = Some(value.into());
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.term.value_note = Some(note.into());
        self
    }

    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.term.modifier = Some(modifier.into());
        self
    }

    pub fn build(self) -> Term {
        self.term
    }
}

// ---------------------------------------------------------------------------
// FieldBuilder / RegistryBuilder
// ---------------------------------------------------------------------------

/// Fluent builder for a single [`FieldSchema`].
pub struct FieldBuilder {
    schema: FieldSchema,
}

impl FieldBuilder {
    pub fn new(processed_type: FieldType) -> Self {
        Self {
            schema: FieldSchema::new(processed_type),
        }
    }

    pub fn min(mut self, min: f64) -> Self {
        self.schema.constraint.min = Some(min);
        self
    }

    pub fn max(mut self, max: f64) -> Self {
        self.schema.constraint.max = Some(max);
        self
    }

    pub fn allowed(mut self, values: &[&str]) -> Self {
        self.schema.constraint.enum_values = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }

    pub fn summary(mut self, tokens: &[&str]) -> Self {
        self.schema.summary = tokens.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn traverse(mut self, direction: TraverseDirection) -> Self {
        self.schema.traverse_direction = Some(direction);
        self
    }

    pub fn build(self) -> FieldSchema {
        self.schema
    }
}

/// Fluent builder for a [`FieldRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    fields: BTreeMap<String, FieldSchema>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: &str, field: FieldBuilder) -> Self {
        self.fields.insert(key.to_string(), field.build());
        self
    }

    pub fn build(self) -> FieldRegistry {
        FieldRegistry::new(self.fields)
    }
}

// ---------------------------------------------------------------------------
// Convenience constructors
// ---------------------------------------------------------------------------

/// A registry with one field of each interesting shape.
pub fn small_registry() -> FieldRegistry {
    RegistryBuilder::new()
        .field(
            "assembly_span",
            FieldBuilder::new(FieldType::Long)
                .min(0.0)
                .summary(&["min", "max"])
                .traverse(TraverseDirection::Up),
        )
        .field(
            "gc_percent",
            FieldBuilder::new(FieldType::Float).min(0.0).max(100.0).summary(&["mean"]),
        )
        .field(
            "assembly_level",
            FieldBuilder::new(FieldType::Keyword).allowed(&["chromosome", "contig", "scaffold"]),
        )
        .field(
            "bioproject",
            FieldBuilder::new(FieldType::Keyword).summary(&["list"]),
        )
        .field("sequence_id", FieldBuilder::new(FieldType::Keyword))
        .build()
}
