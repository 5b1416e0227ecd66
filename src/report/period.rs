// src/report/period.rs

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use super::amount::{category, field_amount};
use crate::process::{effective_date, Field, RawTable};

/// Indonesian month names, January first.
pub const MONTHS: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

pub fn month_name(month: u32) -> Option<&'static str> {
    MONTHS.get(month.checked_sub(1)? as usize).copied()
}

/// Which period the realisation report covers. Always supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportFilter {
    pub year: i32,
    /// 1-12.
    pub month: u32,
    pub bidang: Option<String>,
}

/// A row that made it into the report, with the date it was booked under.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatedRow {
    /// Index into `RawTable::rows`.
    pub row: usize,
    pub date: NaiveDate,
    pub realisasi: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealisasiReport {
    /// Rows booked in the selected month, in sheet order.
    pub monthly: Vec<DatedRow>,
    /// Rows booked anywhere in the selected year, oldest first.
    pub cumulative: Vec<DatedRow>,
    pub monthly_total: f64,
    pub cumulative_total: f64,
}

/// Monthly and year-to-date realisation. Rows without an effective date are
/// left out entirely.
pub fn realisasi_report(table: &RawTable, filter: &ReportFilter) -> RealisasiReport {
    let wanted_bidang = filter.bidang.as_deref().map(|b| b.trim().to_uppercase());

    let dated: Vec<DatedRow> = table
        .rows
        .iter()
        .enumerate()
        .filter(|(_, row)| match &wanted_bidang {
            Some(w) => category(row, Field::Bidang) == *w,
            None => true,
        })
        .filter_map(|(i, row)| {
            let date = effective_date(row)?;
            (date.year() == filter.year).then(|| DatedRow {
                row: i,
                date,
                realisasi: field_amount(row, Field::Realisasi),
            })
        })
        .collect();

    let monthly: Vec<DatedRow> = dated
        .iter()
        .filter(|r| r.date.month() == filter.month)
        .cloned()
        .collect();
    let mut cumulative = dated;
    cumulative.sort_by_key(|r| r.date);

    RealisasiReport {
        monthly_total: monthly.iter().map(|r| r.realisasi).sum(),
        cumulative_total: cumulative.iter().map(|r| r.realisasi).sum(),
        monthly,
        cumulative,
    }
}

/// Years that have at least one dated row, newest first; `[current_year]`
/// when nothing is dated.
pub fn available_years(table: &RawTable, current_year: i32) -> Vec<i32> {
    let mut years: Vec<i32> = table
        .rows
        .iter()
        .filter_map(effective_date)
        .map(|d| d.year())
        .collect();
    years.sort_unstable_by(|a, b| b.cmp(a));
    years.dedup();
    if years.is_empty() {
        vec![current_year]
    } else {
        years
    }
}
