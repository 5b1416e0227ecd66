use num_format::{Locale, ToFormattedString};

use crate::process::{Field, Row, Value};

/// Division/category keys that mean "not filled in".
pub const PLACEHOLDER_KEYS: &[&str] = &["", "NULL", "UNKNOWN"];

/// Numeric reading of a cell; anything unusable counts as zero.
pub fn amount(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => *n,
        Some(Value::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
        None => 0.0,
    };
    if n.is_finite() {
        n
    } else {
        0.0
    }
}

/// Numeric value of `field` in `row`.
pub fn field_amount(row: &Row, field: Field) -> f64 {
    amount(field.resolve(row))
}

/// Upper-cased text of a categorical field; missing reads as `""`.
pub fn category(row: &Row, field: Field) -> String {
    field
        .resolve(row)
        .map(|v| v.to_text().trim().to_uppercase())
        .unwrap_or_default()
}

/// Division key of a row, or `None` when it is a placeholder.
pub fn bidang_key(row: &Row) -> Option<String> {
    let key = category(row, Field::Bidang);
    if PLACEHOLDER_KEYS.contains(&key.as_str()) {
        None
    } else {
        Some(key)
    }
}

/// `Rp 1.500.000`: whole rupiah, `.` grouping.
pub fn format_idr(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_formatted_string(&Locale::id);
    if rounded < 0 {
        format!("-Rp {}", digits)
    } else {
        format!("Rp {}", digits)
    }
}
