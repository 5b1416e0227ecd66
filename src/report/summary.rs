// src/report/summary.rs

use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

use super::amount::{bidang_key, category, field_amount};
use crate::process::{Field, RawTable, Row};

/// Headline totals over the whole sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Kpis {
    pub total_costsheet: f64,
    pub total_realisasi: f64,
    pub total_outstanding: f64,
    /// Realised share of the costsheet, in percent.
    pub absorption_pct: f64,
}

pub fn kpis(table: &RawTable) -> Kpis {
    let sum = |field: Field| -> f64 { table.rows.iter().map(|r| field_amount(r, field)).sum() };
    let total_costsheet = sum(Field::Costsheet);
    let total_realisasi = sum(Field::Realisasi);
    let total_outstanding = sum(Field::Outstanding);
    let absorption_pct = if total_costsheet > 0.0 {
        total_realisasi / total_costsheet * 100.0
    } else {
        0.0
    };
    Kpis {
        total_costsheet,
        total_realisasi,
        total_outstanding,
        absorption_pct,
    }
}

/// Per-division task-order count and money totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BidangStat {
    pub bidang: String,
    /// Distinct non-empty task order numbers.
    pub st_count: usize,
    pub realisasi: f64,
    pub outstanding: f64,
}

/// A grouping key with its summed realisation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub total: f64,
}

/// Distinct real divisions, in first-seen order.
pub fn all_bidang(table: &RawTable) -> Vec<String> {
    let mut seen = Vec::new();
    for key in table.rows.iter().filter_map(bidang_key) {
        if !seen.contains(&key) {
            seen.push(key);
        }
    }
    seen
}

/// Division statistics, most task orders first.
pub fn bidang_stats(table: &RawTable) -> Vec<BidangStat> {
    let mut order: Vec<String> = Vec::new();
    let mut stats: HashMap<String, (BTreeSet<String>, f64, f64)> = HashMap::new();

    for row in &table.rows {
        let Some(bidang) = bidang_key(row) else {
            continue;
        };
        let st = Field::NoSt
            .resolve(row)
            .map(|v| v.to_text().trim().to_string())
            .unwrap_or_default();

        let entry = stats.entry(bidang.clone()).or_insert_with(|| {
            order.push(bidang);
            (BTreeSet::new(), 0.0, 0.0)
        });
        if !st.is_empty() {
            entry.0.insert(st);
        }
        entry.1 += field_amount(row, Field::Realisasi);
        entry.2 += field_amount(row, Field::Outstanding);
    }

    let mut out: Vec<BidangStat> = order
        .into_iter()
        .filter_map(|bidang| {
            let (sts, realisasi, outstanding) = stats.remove(&bidang)?;
            Some(BidangStat {
                bidang,
                st_count: sts.len(),
                realisasi,
                outstanding,
            })
        })
        .collect();
    out.sort_by(|a, b| b.st_count.cmp(&a.st_count));
    out
}

/// Realisation per division, largest first.
pub fn bidang_summary(table: &RawTable) -> Vec<GroupTotal> {
    group_realisasi(table.rows.iter(), bidang_key)
}

/// Realisation per budget account code, largest first.
pub fn mak_summary(table: &RawTable) -> Vec<GroupTotal> {
    group_realisasi(table.rows.iter(), |row| {
        let mak = category(row, Field::Mak);
        (!mak.is_empty() && mak != "NULL").then_some(mak)
    })
}

/// Sum realisation under `key_of`; rows without a key are left out.
pub fn group_realisasi<'a, I, F>(rows: I, mut key_of: F) -> Vec<GroupTotal>
where
    I: IntoIterator<Item = &'a Row>,
    F: FnMut(&Row) -> Option<String>,
{
    let mut out: Vec<GroupTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for row in rows {
        let Some(key) = key_of(row) else {
            continue;
        };
        let value = field_amount(row, Field::Realisasi);
        match index.get(&key) {
            Some(&i) => out[i].total += value,
            None => {
                index.insert(key.clone(), out.len());
                out.push(GroupTotal { key, total: value });
            }
        }
    }

    out.sort_by(|a, b| b.total.total_cmp(&a.total));
    out
}

/// Rows of one division (case-insensitive), or all rows for `None`.
pub fn filter_by_bidang(table: &RawTable, bidang: Option<&str>) -> RawTable {
    match bidang {
        None => table.clone(),
        Some(wanted) => {
            let wanted = wanted.trim().to_uppercase();
            table.filtered(|row| category(row, Field::Bidang) == wanted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ingest;

    fn sample() -> RawTable {
        ingest(
            "BIDANG,NO ST,MAK,COSTSHEET,REALISASI,Outstanding\n\
             IPP,ST-7,A009,2400000,1000000,1400000\n\
             P3A,ST-3,A020,9600000,9600000,0\n\
             P3A,ST-2,A009,9890000,0,9890000\n\
             p3a,ST-3,null,100,50,50\n\
             NULL,ST-9,A001,500,500,0\n\
             ,ST-10,,300,300,0\n\
             APD,,A001,29587000,0,29587000\n",
        )
    }

    #[test]
    fn kpis_sum_every_row() {
        let k = kpis(&sample());
        assert_eq!(k.total_costsheet, 51_477_900.0);
        assert_eq!(k.total_realisasi, 10_600_850.0);
        assert_eq!(k.total_outstanding, 40_877_050.0);
        assert!((k.absorption_pct - 10_600_850.0 / 51_477_900.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn kpis_without_costsheet_have_zero_absorption() {
        let k = kpis(&ingest("BIDANG,REALISASI\nIPP,5\n"));
        assert_eq!(k.total_costsheet, 0.0);
        assert_eq!(k.absorption_pct, 0.0);
        assert_eq!(k.total_realisasi, 5.0);
    }

    #[test]
    fn divisions_skip_placeholders() {
        assert_eq!(all_bidang(&sample()), vec!["IPP", "P3A", "APD"]);
    }

    #[test]
    fn bidang_stats_count_distinct_task_orders() {
        let stats = bidang_stats(&sample());
        assert_eq!(stats.len(), 3);
        assert_eq!(stats[0].bidang, "P3A");
        assert_eq!(stats[0].st_count, 2);
        assert_eq!(stats[0].realisasi, 9_600_050.0);
        assert_eq!(stats[0].outstanding, 9_890_050.0);
        assert_eq!(stats[1].bidang, "IPP");
        assert_eq!(stats[1].st_count, 1);
        assert_eq!(stats[2].bidang, "APD");
        assert_eq!(stats[2].st_count, 0);
    }

    #[test]
    fn summaries_sort_by_realisasi() {
        let by_bidang = bidang_summary(&sample());
        let keys: Vec<&str> = by_bidang.iter().map(|g| g.key.as_str()).collect();
        assert_eq!(keys, vec!["P3A", "IPP", "APD"]);

        let by_mak = mak_summary(&sample());
        assert_eq!(
            by_mak,
            vec![
                GroupTotal {
                    key: "A020".into(),
                    total: 9_600_000.0
                },
                GroupTotal {
                    key: "A009".into(),
                    total: 1_000_000.0
                },
                GroupTotal {
                    key: "A001".into(),
                    total: 500.0
                },
            ]
        );
    }

    #[test]
    fn filter_by_bidang_is_case_insensitive() {
        let table = sample();
        assert_eq!(filter_by_bidang(&table, Some("p3a")).rows.len(), 3);
        assert_eq!(filter_by_bidang(&table, None).rows.len(), table.rows.len());
        assert_eq!(filter_by_bidang(&table, Some("XYZ")).rows.len(), 0);
        assert_eq!(filter_by_bidang(&table, Some("p3a")).headers, table.headers);
    }
}
