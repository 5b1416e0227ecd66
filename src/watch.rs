// src/watch.rs

use chrono::{DateTime, Local};
use reqwest::Client;
use std::{future::Future, time::Duration};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{info, warn};

use crate::fetch::{load_table, RetryPolicy, Source};
use crate::process::RawTable;
use crate::report::{format_idr, kpis};

/// Latest successfully loaded table plus the outcome of the last attempt.
#[derive(Debug, Default)]
pub struct SheetState {
    pub table: RawTable,
    pub refreshed_at: Option<DateTime<Local>>,
    pub last_error: Option<String>,
}

impl SheetState {
    /// One fetch. A failure leaves the previous table in place.
    pub async fn refresh(&mut self, client: &Client, source: &Source, retry: RetryPolicy) -> bool {
        match load_table(client, source, retry).await {
            Ok(table) => {
                self.table = table;
                self.refreshed_at = Some(Local::now());
                self.last_error = None;
                true
            }
            Err(e) => {
                warn!(error = %e, rows_kept = self.table.rows.len(), "refresh failed");
                self.last_error = Some(e.to_string());
                false
            }
        }
    }
}

/// Poll `source` every `period` until `shutdown` resolves. Refreshes run one
/// at a time; ticks missed while a fetch is in flight are skipped.
pub async fn watch<S>(
    client: &Client,
    source: &Source,
    retry: RetryPolicy,
    period: Duration,
    shutdown: S,
) -> SheetState
where
    S: Future<Output = ()>,
{
    let mut state = SheetState::default();
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("watch stopped");
                return state;
            }
            _ = ticker.tick() => {
                if state.refresh(client, source, retry).await {
                    log_kpis(&state.table);
                }
            }
        }
    }
}

fn log_kpis(table: &RawTable) {
    let k = kpis(table);
    info!(
        rows = table.rows.len(),
        costsheet = %format_idr(k.total_costsheet),
        realisasi = %format_idr(k.total_realisasi),
        outstanding = %format_idr(k.total_outstanding),
        absorption_pct = format!("{:.1}", k.absorption_pct),
        "refreshed"
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const NO_RETRY: RetryPolicy = RetryPolicy {
        max_retries: 0,
        initial_backoff_ms: 1,
    };

    #[tokio::test]
    async fn failed_refresh_keeps_previous_table() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "BIDANG,REALISASI\nIPP,100\nP3A,200\n").unwrap();
        let path = tmp.path().to_path_buf();
        let source = Source::File(path.clone());
        let client = Client::new();

        let mut state = SheetState::default();
        assert!(state.refresh(&client, &source, NO_RETRY).await);
        assert_eq!(state.table.rows.len(), 2);
        assert!(state.refreshed_at.is_some());

        drop(tmp);
        assert!(!path.exists());
        assert!(!state.refresh(&client, &source, NO_RETRY).await);
        assert_eq!(state.table.rows.len(), 2);
        assert!(state.last_error.is_some());
    }

    #[tokio::test]
    async fn watch_polls_until_shutdown() {
        let mut tmp = NamedTempFile::new().unwrap();
        write!(tmp, "BIDANG,REALISASI\nIPP,100\n").unwrap();
        let source = Source::File(tmp.path().to_path_buf());

        let state = watch(
            &Client::new(),
            &source,
            NO_RETRY,
            Duration::from_millis(10),
            tokio::time::sleep(Duration::from_millis(50)),
        )
        .await;
        assert_eq!(state.table.rows.len(), 1);
        assert!(state.last_error.is_none());
    }
}
