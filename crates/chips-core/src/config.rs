//! Configuration types for chips.
//!
//! [`Config::load`] reads `~/.config/chips/config.toml`, creating it with
//! hardcoded defaults if it does not yet exist. Layers, lowest first:
//!
//! 1. the embedded defaults below
//! 2. the user's `config.toml`
//! 3. `CHIPS_`-prefixed environment variables, `__` between section and key
//!    (`CHIPS_SCHEMA__PATH=/etc/chips/fields.json`)
//! 4. the `--schema` override from the command line
//!
//! [`Config::defaults`] returns layer 1 alone without touching the
//! filesystem (useful in tests).

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Embedded defaults
// ---------------------------------------------------------------------------

const DEFAULT_CONFIG: &str = r#"
[schema]
# Field registry file (.json, .toml or .yaml). Unset uses the built-in registry.
# path = "/etc/chips/fields.json"

[output]
pretty         = true
compact_values = true
"#;

const ENV_PREFIX: &str = "CHIPS";
const SCHEMA_PATH_KEY: &str = "schema.path";

// ---------------------------------------------------------------------------
// Public config types
// ---------------------------------------------------------------------------

/// Top-level application configuration, loaded from `~/.config/chips/config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub schema: SchemaConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// `[schema]` section of `config.toml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SchemaConfig {
    /// Registry file; `None` selects the built-in registry.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// `[output]` section of `config.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Pretty-print JSON reports.
    #[serde(default = "default_pretty")]
    pub pretty: bool,
    /// Show numbers in suffixed form (`100M`) in human-readable output.
    #[serde(default = "default_compact_values")]
    pub compact_values: bool,
}

fn default_pretty() -> bool { true }
fn default_compact_values() -> bool { true }

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            compact_values: default_compact_values(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults()
    }
}

impl Config {
    /// Load every layer. Creates the user file with defaults if it does not
    /// exist. `schema_override` wins over any configured registry path.
    pub fn load(schema_override: Option<&Path>) -> anyhow::Result<Self> {
        let path = config_path();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(&path, DEFAULT_CONFIG.trim_start())?;
        }

        Self::layered(Some(&path), schema_override)
    }

    /// Build from the embedded defaults, an optional user file, the
    /// environment and an optional registry path override.
    pub fn layered(user_file: Option<&Path>, schema_override: Option<&Path>) -> anyhow::Result<Self> {
        let mut builder = defaults_builder();
        if let Some(file) = user_file {
            builder = builder.add_source(config::File::from(file).required(false));
        }
        let config: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .set_override_option(
                SCHEMA_PATH_KEY,
                schema_override.map(|p| p.display().to_string()),
            )?
            .build()?
            .try_deserialize()?;
        tracing::debug!(?config, "config: layers merged");
        Ok(config)
    }

    /// Return the built-in defaults without touching the filesystem.
    pub fn defaults() -> Self {
        defaults_builder()
            .build()
            .expect("built-in default config must be valid TOML")
            .try_deserialize()
            .expect("built-in default config must deserialize correctly")
    }
}

fn defaults_builder() -> config::builder::ConfigBuilder<config::builder::DefaultState> {
    config::Config::builder().add_source(config::File::from_str(DEFAULT_CONFIG, config::FileFormat::Toml))
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

fn config_path() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".to_string()))
                .join(".config")
        })
        .join("chips")
        .join("config.toml")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn user_file(body: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(body.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_load() {
        let cfg = Config::defaults();
        assert!(cfg.output.pretty);
        assert!(cfg.output.compact_values);
        assert_eq!(cfg.schema.path, None);
    }

    #[test]
    fn user_file_sets_registry_path() {
        let file = user_file("[schema]\npath = \"/etc/chips/fields.json\"\n[output]\npretty = false\n");
        let cfg = Config::layered(Some(file.path()), None).unwrap();
        assert_eq!(cfg.schema.path, Some(PathBuf::from("/etc/chips/fields.json")));
        assert!(!cfg.output.pretty);
        assert!(cfg.output.compact_values);
    }

    #[test]
    fn schema_override_wins_over_user_file() {
        let file = user_file("[schema]\npath = \"/etc/chips/fields.json\"\n");
        let cfg = Config::layered(Some(file.path()), Some(Path::new("/tmp/other.yaml"))).unwrap();
        assert_eq!(cfg.schema.path, Some(PathBuf::from("/tmp/other.yaml")));
    }

    #[test]
    fn missing_user_file_keeps_defaults() {
        let cfg = Config::layered(Some(Path::new("/nonexistent/chips/config.toml")), None).unwrap();
        assert_eq!(cfg.schema.path, None);
        assert!(cfg.output.pretty);
    }
}
