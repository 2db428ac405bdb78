//! Tokenizer: splits a raw query string into its ordered term strings.
//!
//! The only separator is a case-insensitive `AND` with whitespace on both
//! sides. A bare `AND` can still survive as a token of its own (`a AND AND b`),
//! so every consumer that walks a term list skips it with
//! [`is_marker`](crate::types::is_marker).

use regex::Regex;
use std::sync::LazyLock;

static AND_SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+AND\s+").expect("AND separator regex is valid"));

/// Split `raw` on `\s+AND\s+`. Empty or whitespace-only input gives an empty list.
pub fn tokenize(raw: &str) -> Vec<String> {
    if raw.trim().is_empty() {
        return Vec::new();
    }
    AND_SEPARATOR.split(raw).map(str::to_string).collect()
}
