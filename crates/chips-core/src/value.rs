//! Value codec: human-entered numeric text to canonical numbers and back.
//!
//! [`parse_value`] understands magnitude suffixes (`100M`, `1.5k`) and
//! thousands/decimal separators (`1,234,567`, `1.234.567`, `12,5`).
//! [`format_value`] goes the other way for display, preferring the shortest
//! suffixed form that keeps at most three fractional digits.
//!
//! The two are not textual inverses, but `parse_value(format_value(n))`
//! always recovers `n`.
//!
//! # Separator heuristic
//!
//! A separator is read as thousands grouping when it repeats and every
//! occurrence is followed by exactly three digits, or when it occurs once,
//! is followed by three digits, and the other decimal mark appears later.
//! Otherwise a lone comma is a decimal comma. `1.234` is therefore 1.234 and
//! `1,234` is 1.234 too; only `1,234,567` or `1,234.5` group.

use crate::types::ParsedValue;
use regex::Regex;
use std::sync::LazyLock;

static SUFFIXED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(-?\d+(?:[.,]\d+)?)\s*([kmgtpe])$").expect("suffix regex is valid")
});

static PLAIN_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)$").expect("number regex is valid"));

static SPACE_GROUPED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?\d{1,3}(?: \d{3})+(?:[.,]\d+)?$").expect("space grouping regex is valid")
});

/// Decimal exponent of each magnitude suffix, keyed by its lower-case letter.
static SUFFIX_EXPONENT: phf::Map<&'static str, usize> = phf::phf_map! {
    "k" => 3,
    "m" => 6,
    "g" => 9,
    "t" => 12,
    "p" => 15,
    "e" => 18,
};

/// Display suffixes, one per factor of 1000. `E` is accepted on input only.
const DISPLAY_SUFFIXES: [&str; 5] = ["k", "M", "G", "T", "P"];

/// 2^53. Above it neighbouring integers collapse, so only whole `P` units
/// are shown in suffixed form.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;
const PETA: u128 = 1_000_000_000_000_000;

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Decode human-entered text. Blank input gives `None`; numeric text gives a
/// [`ParsedValue::Number`]; anything else is returned verbatim as
/// [`ParsedValue::Text`].
pub fn parse_value(raw: &str) -> Option<ParsedValue> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    match numeric_text(trimmed)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|n| n.is_finite())
    {
        Some(n) => Some(ParsedValue::Number(n)),
        None => Some(ParsedValue::Text(raw.to_string())),
    }
}

/// The exact decimal written by numeric text: suffix expanded, grouping
/// removed, a dot as decimal mark, no `+` sign and no trailing fractional
/// zeros. Leading zeros stay, so `007` and `7` differ. `None` for text.
///
/// ```
/// use chips_core::value::exact_decimal;
/// assert_eq!(exact_decimal("1.5G").as_deref(), Some("1500000000"));
/// assert_eq!(exact_decimal("40,50").as_deref(), Some("40.5"));
/// assert_eq!(exact_decimal("PRJEB40655"), None);
/// ```
pub fn exact_decimal(raw: &str) -> Option<String> {
    let text = numeric_text(raw.trim())?;
    let text = text.strip_prefix('+').unwrap_or(&text);
    let (int, frac) = text.split_once('.').unwrap_or((text, ""));
    let int = match int {
        "" => "0",
        "-" => "-0",
        int => int,
    };
    let frac = frac.trim_end_matches('0');
    if frac.is_empty() {
        Some(int.to_string())
    } else {
        Some(format!("{int}.{frac}"))
    }
}

/// Plain decimal text for a numeric input, ready for `f64::from_str`.
fn numeric_text(trimmed: &str) -> Option<String> {
    if let Some(caps) = SUFFIXED.captures(trimmed) {
        let exponent = SUFFIX_EXPONENT
            .get(caps[2].to_ascii_lowercase().as_str())
            .copied()
            .unwrap_or(0);
        if let Some(shifted) = shift_decimal(&caps[1].replace(',', "."), exponent) {
            return Some(shifted);
        }
    }
    normalize_separators(trimmed)
}

/// Move the decimal point of `digits` right by `exponent` places, exactly.
fn shift_decimal(digits: &str, exponent: usize) -> Option<String> {
    let (sign, unsigned) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };
    let (int, frac) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    if int.is_empty() || !int.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let mut frac = frac.to_string();
    while frac.len() < exponent {
        frac.push('0');
    }
    let (moved, rest) = frac.split_at(exponent);
    if rest.is_empty() {
        Some(format!("{sign}{int}{moved}"))
    } else {
        Some(format!("{sign}{int}{moved}.{rest}"))
    }
}

/// Strip grouping separators and turn a decimal comma into a dot.
fn normalize_separators(text: &str) -> Option<String> {
    let mut s = if SPACE_GROUPED.is_match(text) {
        text.replace(' ', "")
    } else {
        text.to_string()
    };

    let commas_group = is_grouping(&s, ',', '.');
    let dots_group = is_grouping(&s, '.', ',');
    if commas_group && !dots_group {
        s = s.replace(',', "");
    } else if dots_group && !commas_group {
        s = s.replace('.', "").replace(',', ".");
    }

    if s.matches(',').count() == 1 && !s.contains('.') {
        s = s.replace(',', ".");
    }

    PLAIN_NUMBER.is_match(&s).then_some(s)
}

/// Whether every `sep` in `s` is followed by exactly three digits and the
/// separator either repeats or is followed later by the `other` mark.
fn is_grouping(s: &str, sep: char, other: char) -> bool {
    let positions: Vec<usize> = s.match_indices(sep).map(|(i, _)| i).collect();
    let Some(&last) = positions.last() else {
        return false;
    };
    let three_digits_each = positions.iter().all(|&i| {
        let after = &s[i + 1..];
        let run = after.bytes().take_while(u8::is_ascii_digit).count();
        run == 3 && after[3..].chars().next().is_none_or(|c| c == sep || c == other)
    });
    if !three_digits_each {
        return false;
    }
    positions.len() > 1 || s[last..].contains(other)
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Compact display text for a decoded value. `None` and blank text format
/// to `""`; text other than numbers passes through unchanged.
pub fn format_value(value: Option<&ParsedValue>) -> String {
    match value {
        None => String::new(),
        Some(ParsedValue::Text(s)) => s.clone(),
        Some(ParsedValue::Number(n)) => format_number(*n),
    }
}

/// Parse then re-format raw text, e.g. `"100000000"` becomes `"100M"`.
pub fn format_raw(raw: &str) -> String {
    format_value(parse_value(raw).as_ref())
}

/// Compact form of a number: `100M`, `1.5k`, `1234.567k`, or a grouped
/// decimal (`999`, `1,000.5`) when no suffix applies.
pub fn format_number(n: f64) -> String {
    if !n.is_finite() {
        return n.to_string();
    }
    // Integers beyond this are not exactly representable anyway.
    if n.abs() < 1000.0 || n.fract() != 0.0 || n.abs() >= 1e30 {
        return group_thousands(n);
    }

    let sign = if n < 0.0 { "-" } else { "" };
    let mut int = n.abs() as u128;
    if n.abs() > MAX_EXACT_INTEGER {
        return if int % PETA == 0 {
            format!("{sign}{}P", int / PETA)
        } else {
            group_thousands(n)
        };
    }
    let mut step = 0;
    while step < DISPLAY_SUFFIXES.len() && int >= 1000 && int % 1000 == 0 {
        int /= 1000;
        step += 1;
    }
    if step < DISPLAY_SUFFIXES.len() && int >= 1000 {
        let frac = format!("{:03}", int % 1000);
        let frac = frac.trim_end_matches('0');
        return format!("{sign}{}.{frac}{}", int / 1000, DISPLAY_SUFFIXES[step]);
    }
    if step == 0 {
        return group_thousands(n);
    }
    format!("{sign}{int}{}", DISPLAY_SUFFIXES[step - 1])
}

/// `1234567.25` -> `1,234,567.25`.
fn group_thousands(n: f64) -> String {
    let text = n.abs().to_string();
    let (int, frac) = text.split_once('.').unwrap_or((text.as_str(), ""));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3 + frac.len() + 2);
    if n < 0.0 {
        grouped.push('-');
    }
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if !frac.is_empty() {
        grouped.push('.');
        grouped.push_str(frac);
    }
    grouped
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
