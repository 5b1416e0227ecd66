use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::process::coerce::Value;

/// Plain date layouts tried before the day/month/year heuristic.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// Date-time layouts; only the date part is kept.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse a cell into a calendar date.
///
/// Numbers are never dates. Text is tried against the generic layouts first,
/// then split on `-` or `/` into three parts: a 4-character first part means
/// year-month-day, anything else day-month-year.
pub fn parse_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Text(s) => parse_date_str(s),
        Value::Number(_) => None,
    }
}

pub fn parse_date_str(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    parse_generic(s).or_else(|| parse_by_part_order(s))
}

fn parse_generic(s: &str) -> Option<NaiveDate> {
    // chrono's %Y also takes 1-3 digit years; keep "05-03-26" away from it
    let year_first = s.chars().take_while(char::is_ascii_digit).count() == 4;

    if let Some(d) = DATE_FORMATS
        .iter()
        .filter(|fmt| year_first || !fmt.starts_with("%Y"))
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(d);
    }
    if year_first {
        if let Some(dt) = DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        {
            return Some(dt.date());
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    parse_local_month_name(s)
}

/// `13 Januari 2026` / `13 Agt 2026`.
fn parse_local_month_name(s: &str) -> Option<NaiveDate> {
    let mut parts = s.split_whitespace();
    let day = parts.next()?.parse::<u32>().ok()?;
    let month = month_token_to_number(&parts.next()?.to_lowercase())?;
    let year = parts.next()?.parse::<i32>().ok()?;
    if parts.next().is_some() {
        return None;
    }
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Convert a lowercase Indonesian month token (full or short) to 1-12.
fn month_token_to_number(token: &str) -> Option<u32> {
    match token {
        "januari" | "jan" => Some(1),
        "februari" | "feb" | "peb" => Some(2),
        "maret" | "mar" => Some(3),
        "april" | "apr" => Some(4),
        "mei" => Some(5),
        "juni" | "jun" => Some(6),
        "juli" | "jul" => Some(7),
        "agustus" | "agu" | "agt" | "ags" => Some(8),
        "september" | "sep" | "sept" => Some(9),
        "oktober" | "okt" => Some(10),
        "november" | "nov" | "nop" => Some(11),
        "desember" | "des" => Some(12),
        _ => None,
    }
}

fn parse_by_part_order(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s.split(['-', '/']).map(str::trim).collect();
    if parts.len() != 3 {
        return None;
    }
    let (y, m, d) = if parts[0].chars().count() == 4 {
        (parts[0], parts[1], parts[2])
    } else {
        (parts[2], parts[1], parts[0])
    };
    let year = y.parse::<i32>().ok()?;
    let month = m.parse::<u32>().ok()?;
    let day = d.parse::<u32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}
