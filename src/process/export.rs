// src/process/export.rs

use std::collections::HashMap;

use crate::process::{
    coerce::Value,
    raw_table::{RawTable, Row},
    utils::BOM,
};

/// Serialise a table back to CSV for download.
///
/// Output starts with a BOM, then the header line, then one line per row.
/// Text cells are always quoted (inner quotes doubled); numbers are bare.
pub fn to_csv(table: &RawTable) -> String {
    rows_to_csv(&table.headers, &table.rows)
}

/// Serialise rows under the given headers. Values are looked up by header
/// name; the n-th occurrence of a repeated header takes the row's n-th cell
/// of that name. A header the row lacks is written empty.
pub fn rows_to_csv(headers: &[String], rows: &[Row]) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| render_header(h))
            .collect::<Vec<_>>()
            .join(","),
    );
    for row in rows {
        let mut seen: HashMap<&str, usize> = HashMap::new();
        let fields: Vec<String> = headers
            .iter()
            .map(|h| {
                let nth = seen.entry(h.as_str()).or_insert(0);
                let value = row
                    .cells()
                    .iter()
                    .filter(|(k, _)| k == h)
                    .nth(*nth)
                    .map(|(_, v)| v);
                *nth += 1;
                value.map(render_field).unwrap_or_default()
            })
            .collect();
        lines.push(fields.join(","));
    }

    let mut out = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum::<usize>() + 3);
    out.push(BOM);
    out.push_str(&lines.join("\n"));
    out
}

/// Plain header names go out as-is; ones the tokenizer would split are quoted.
fn render_header(name: &str) -> String {
    if name.contains(',') {
        quote(name)
    } else {
        name.to_string()
    }
}

fn render_field(value: &Value) -> String {
    match value {
        Value::Number(n) => n.to_string(),
        Value::Text(s) => quote(s),
    }
}

fn quote(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}
