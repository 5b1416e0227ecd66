use chrono::NaiveDate;

use crate::process::{
    columns::{resolve, Field},
    date_parser::parse_date,
    raw_table::Row,
};

/// The date a row is booked under.
///
/// The settlement date wins whenever it parses; otherwise the first activity
/// date column that parses is used. `None` means the row stays out of any
/// month/year bucket.
pub fn effective_date(row: &Row) -> Option<NaiveDate> {
    Field::TglSpm
        .resolve(row)
        .and_then(parse_date)
        .or_else(|| {
            Field::TripDate
                .aliases()
                .iter()
                .find_map(|alias| resolve(row, &[alias]).and_then(parse_date))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::coerce::Value;

    #[test]
    fn settlement_date_wins_when_valid() {
        let row = Row::from_cells([("TGL BERANGKAT", "2026-01-01"), ("TGL SPM", "05-03-2026")]);
        assert_eq!(effective_date(&row), NaiveDate::from_ymd_opt(2026, 3, 5));
    }

    #[test]
    fn falls_back_to_departure_date() {
        let row = Row::from_cells([("TGL SPM", ""), ("TGL BERANGKAT", "13/01/2026")]);
        assert_eq!(effective_date(&row), NaiveDate::from_ymd_opt(2026, 1, 13));

        let row = Row::from_cells([("tgl spm", "belum SPM"), ("Tgl Berangkat", "2026-01-13")]);
        assert_eq!(effective_date(&row), NaiveDate::from_ymd_opt(2026, 1, 13));
    }

    #[test]
    fn generic_date_columns_are_fallbacks_too() {
        let row = Row::from_cells([("Tanggal", "2026-07-02")]);
        assert_eq!(effective_date(&row), NaiveDate::from_ymd_opt(2026, 7, 2));

        let row = Row::from_cells([("TGL BERANGKAT", ""), ("WAKTU", "02/07/2026")]);
        assert_eq!(effective_date(&row), NaiveDate::from_ymd_opt(2026, 7, 2));
    }

    #[test]
    fn no_parseable_date_is_none() {
        let row = Row::from_cells([("TGL SPM", Value::from("-")), ("WAKTU", Value::Number(5.0))]);
        assert_eq!(effective_date(&row), None);
        assert_eq!(effective_date(&Row::default()), None);
    }
}
