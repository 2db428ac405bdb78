//! Field schema registry.
//!
//! The registry maps every searchable key to its [`FieldSchema`]: the
//! processed type, value constraints, the summaries that can be requested as
//! modifiers, and the tree traversal direction. It is loaded once, by
//! [`FieldRegistry::load`] or [`FieldRegistry::from_json_str`], and is
//! read-only from then on, so a single instance can be shared freely between
//! threads.
//!
//! A small genome-assembly registry is embedded via [`include_str!`] and
//! exposed as [`FieldRegistry::builtin`] so the CLI and tests work without any
//! files on disk.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const BUILTIN_FIELDS_SRC: &str = include_str!("fields/assembly.json");

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Failure to load a registry. The only fatal condition in the compiler.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("cannot read field registry {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: config::ConfigError,
    },
    #[error("malformed field registry: {0}")]
    Parse(String),
    #[error("field registry {0} declares no fields")]
    Empty(String),
}

// ---------------------------------------------------------------------------
// Schema types
// ---------------------------------------------------------------------------

/// Processed type of a field. Unknown types deserialize to [`FieldType::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Byte,
    Short,
    Integer,
    Long,
    HalfFloat,
    Float,
    Double,
    ScaledFloat,
    Keyword,
    Date,
    GeoPoint,
    #[serde(other)]
    Other,
}

impl FieldType {
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            FieldType::Byte | FieldType::Short | FieldType::Integer | FieldType::Long
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integer()
            || matches!(
                self,
                FieldType::HalfFloat | FieldType::Float | FieldType::Double | FieldType::ScaledFloat
            )
    }
}

/// Which way values propagate through the taxonomy for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TraverseDirection {
    Up,
    Down,
    Both,
}

/// Value constraints declared for a field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Allowed keyword values, compared case-insensitively.
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    /// Maximum character length of each keyword value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub len: Option<usize>,
}

/// Schema entry for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub processed_type: FieldType,
    #[serde(default)]
    pub constraint: Constraint,
    /// Summary functions available for the field (`min`, `max`, `list`, ...).
    #[serde(default)]
    pub summary: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub traverse_direction: Option<TraverseDirection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_group: Option<String>,
}

impl FieldSchema {
    pub fn new(processed_type: FieldType) -> Self {
        Self {
            processed_type,
            constraint: Constraint::default(),
            summary: Vec::new(),
            traverse_direction: None,
            display_level: None,
            display_group: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Immutable map from key to [`FieldSchema`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRegistry {
    fields: BTreeMap<String, FieldSchema>,
}

impl FieldRegistry {
    pub fn new(fields: BTreeMap<String, FieldSchema>) -> Self {
        Self { fields }
    }

    /// Parse a registry from its JSON form (`{"key": {"processed_type": ...}}`).
    pub fn from_json_str(src: &str) -> Result<Self, SchemaError> {
        let registry: Self =
            serde_json::from_str(src).map_err(|e| SchemaError::Parse(e.to_string()))?;
        if registry.is_empty() {
            return Err(SchemaError::Empty("<inline>".to_string()));
        }
        Ok(registry)
    }

    /// Load a registry file. The format (JSON, TOML or YAML) follows the file
    /// extension.
    pub fn load(path: &Path) -> Result<Self, SchemaError> {
        let fields: BTreeMap<String, FieldSchema> = config::Config::builder()
            .add_source(config::File::from(path))
            .build()
            .map_err(|source| SchemaError::Read {
                path: path.to_path_buf(),
                source,
            })?
            .try_deserialize()
            .map_err(|e| SchemaError::Parse(e.to_string()))?;
        if fields.is_empty() {
            return Err(SchemaError::Empty(path.display().to_string()));
        }
        tracing::info!(path = %path.display(), fields = fields.len(), "schema: registry loaded");
        Ok(Self { fields })
    }

    /// The embedded genome-assembly registry.
    pub fn builtin() -> Self {
        serde_json::from_str(BUILTIN_FIELDS_SRC).expect("built-in field registry must be valid JSON")
    }

    /// Explicit lookup: `None` when the key is not in the registry.
    pub fn get(&self, key: &str) -> Option<&FieldSchema> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
