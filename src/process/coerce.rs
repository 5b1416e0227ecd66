// src/process/coerce.rs

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::{borrow::Cow, fmt};

/// Currency marker used by the source sheets (Indonesian rupiah).
pub const CURRENCY_MARKER: &str = "Rp";

/// Fields that look numeric or currency-like.
static NUMERIC_LIKE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?[\d,.]+$").expect("numeric pattern should compile"));

/// `1.500.000`: dots used as thousands separators.
static DOT_GROUPED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,3}(\.\d{3}){2,}$").expect("grouping pattern should compile"));

/// `1.500`: only read as grouped when a currency marker was present.
static DOT_GROUPED_ONCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d{1,3}\.\d{3}$").expect("grouping pattern should compile"));

/// A single typed cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            Value::Text(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Number(_) => None,
        }
    }

    /// Text rendering; numbers use their shortest round-trip form.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Text(s) => Cow::Borrowed(s),
            Value::Number(n) => Cow::Owned(n.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Text(s) if s.is_empty())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Coerce a trimmed raw field into a [`Value`].
///
/// Never fails: anything that is not clearly a number stays text, and the
/// empty string stays `Text("")`.
pub fn coerce(field: &str) -> Value {
    let has_marker = field.contains(CURRENCY_MARKER);

    if has_marker || NUMERIC_LIKE.is_match(field) {
        if let Some(n) = parse_currency(field, has_marker) {
            return Value::Number(n);
        }
    }

    if let Some(n) = parse_finite(field) {
        return Value::Number(n);
    }

    Value::Text(field.to_string())
}

/// Strip the marker, commas and whitespace, then resolve dot grouping.
fn parse_currency(field: &str, has_marker: bool) -> Option<f64> {
    let cleaned: String = field
        .replace(CURRENCY_MARKER, "")
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    // "Rp. 1.000" leaves a dot behind the marker
    let cleaned = if has_marker {
        cleaned.trim_start_matches('.')
    } else {
        cleaned.as_str()
    };
    if cleaned.is_empty() {
        return None;
    }

    if DOT_GROUPED.is_match(cleaned) || (has_marker && DOT_GROUPED_ONCE.is_match(cleaned)) {
        parse_finite(&cleaned.replace('.', ""))
    } else {
        parse_finite(cleaned)
    }
}

/// Full-string float parse; rejects empty input, NaN and infinities.
fn parse_finite(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|n| n.is_finite())
}
