// src/report/mod.rs
pub mod amount;
pub mod period;
pub mod personnel;
pub mod summary;

pub use amount::{amount, bidang_key, category, field_amount, format_idr};
pub use period::{available_years, month_name, realisasi_report, RealisasiReport, ReportFilter};
pub use personnel::{initials, personnel, Person, PersonFilter};
pub use summary::{
    all_bidang, bidang_stats, bidang_summary, filter_by_bidang, kpis, mak_summary, BidangStat,
    GroupTotal, Kpis,
};
