// src/process/mod.rs
pub mod coerce;
pub mod columns;
pub mod date_parser;
pub mod effective_date;
pub mod export;
pub mod raw_table;
pub mod tokenizer;
pub mod utils;

use tracing::debug;

pub use coerce::{coerce, Value};
pub use columns::{resolve, Field};
pub use date_parser::parse_date;
pub use effective_date::effective_date;
pub use export::to_csv;
pub use raw_table::{RawTable, Row};

/// Turn fetched CSV text into a [`RawTable`].
///
/// - Blank lines are skipped; the first remaining line is the header.
/// - Every data line becomes one row keyed by those headers.
/// - Cells are coerced to numbers where they clearly are numbers.
///
/// Never fails: text with no non-blank line yields an empty table.
#[tracing::instrument(level = "debug", skip(text), fields(bytes = text.len()))]
pub fn ingest(text: &str) -> RawTable {
    let records = tokenizer::tokenize(text);
    let table = RawTable::from_records(records);
    debug!(
        columns = table.headers.len(),
        rows = table.rows.len(),
        "ingested sheet"
    );
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing_subscriber::{EnvFilter, FmtSubscriber};

    fn init_test_logging() {
        let subscriber = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("info,budgetsheet::process=debug")),
            )
            .with_test_writer()
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }

    #[test]
    fn ingest_scenario_sheet() {
        init_test_logging();
        let content = "BIDANG,NO ST,REALISASI\nIPP,\"ST-1, rev A\",1.500.000\n";

        let table = ingest(content);

        assert_eq!(table.headers, vec!["BIDANG", "NO ST", "REALISASI"]);
        assert_eq!(table.rows.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.get("BIDANG"), Some(&Value::from("IPP")));
        assert_eq!(row.get("NO ST"), Some(&Value::from("ST-1, rev A")));
        assert_eq!(row.get("REALISASI"), Some(&Value::Number(1_500_000.0)));
    }

    #[test]
    fn row_count_ignores_blank_lines() {
        init_test_logging();
        let bodies = [
            "H\na\nb\nc",
            "\n\nH\n\na\n   \nb\n\t\nc\n\n",
            "H\r\n\r\na\r\nb\r\n  \r\nc\r\n",
        ];
        for text in bodies {
            assert_eq!(ingest(text).rows.len(), 3, "text: {:?}", text);
        }
    }

    #[test]
    fn empty_input_is_an_empty_table() {
        assert_eq!(ingest(""), RawTable::default());
        assert_eq!(ingest("  \n\r\n"), RawTable::default());
    }

    #[test]
    fn header_only_sheet_has_no_rows() {
        let table = ingest("\u{FEFF}BIDANG,MAK\n");
        assert_eq!(table.headers, vec!["BIDANG", "MAK"]);
        assert!(table.rows.is_empty());
    }

    #[test]
    fn resolver_and_dates_work_on_ingested_rows() {
        let table = ingest(
            " Bidang ,Tgl SPM,TGL BERANGKAT,Realisasi\n\
             ipp,,13-01-2026,\"Rp 2.400.000\"\n",
        );
        let row = &table.rows[0];
        assert_eq!(Field::Bidang.resolve(row), Some(&Value::from("ipp")));
        assert_eq!(
            Field::Realisasi.resolve(row),
            Some(&Value::Number(2_400_000.0))
        );
        assert_eq!(
            effective_date(row),
            chrono::NaiveDate::from_ymd_opt(2026, 1, 13)
        );
    }
}
