use anyhow::Context;
use chips::{compile, config::Config, value, FieldRegistry, SchemaValidator};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "chips", about = "chips: compile, check and canonicalise search term queries")]
struct Cli {
    /// Field registry file (.json, .toml or .yaml); overrides the config file.
    #[arg(long, global = true)]
    schema: Option<PathBuf>,

    /// Write debug logs to stderr.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a query and print the JSON report.
    Compile { query: String },
    /// Print the canonical form of a query.
    Canon { query: String },
    /// Decode a numeric value and show its compact form.
    Value { text: String },
    /// List searchable keys with their modifiers.
    Fields,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.debug {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_ansi(false)
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
            )
            .init();
        tracing::info!("chips debug log started");
    }

    let config = Config::load(cli.schema.as_deref())
        .or_else(|err| {
            tracing::warn!(%err, "config: user config unreadable, using defaults");
            Config::layered(None, cli.schema.as_deref())
        })
        .context("building configuration")?;
    let registry = match config.schema.path.as_deref() {
        Some(path) => FieldRegistry::load(path)
            .with_context(|| format!("loading field registry {}", path.display()))?,
        None => FieldRegistry::builtin(),
    };

    match cli.command {
        Command::Compile { query } => {
            let compiled = compile(&query, &registry);
            let json = if config.output.pretty {
                serde_json::to_string_pretty(&compiled)?
            } else {
                serde_json::to_string(&compiled)?
            };
            println!("{json}");
        }
        Command::Canon { query } => {
            let compiled = compile(&query, &registry);
            println!("{}", compiled.query);
            if !compiled.duplicate_keys.is_empty() {
                let keys: Vec<&str> = compiled.duplicate_keys.iter().map(String::as_str).collect();
                eprintln!("removed duplicate terms for: {}", keys.join(", "));
            }
            for clause in compiled.invalid_clauses() {
                eprintln!("invalid: {} ({})", clause.text, clause.validation.reasons().join("; "));
            }
        }
        Command::Value { text } => match value::parse_value(&text) {
            Some(parsed) if config.output.compact_values => {
                println!("{parsed}\t{}", value::format_value(Some(&parsed)));
            }
            Some(parsed) => println!("{parsed}"),
            None => anyhow::bail!("no value given"),
        },
        Command::Fields => {
            let validator = SchemaValidator::new(&registry);
            for key in validator.valid_keys() {
                let modifiers: Vec<String> = validator.valid_modifiers(&key).into_iter().collect();
                println!("{key}\t{}", modifiers.join(","));
            }
        }
    }
    Ok(())
}
