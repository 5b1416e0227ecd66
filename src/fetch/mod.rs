// src/fetch/mod.rs

use reqwest::Client;
use std::{path::PathBuf, time::Duration};
use tokio::{fs, time::sleep};
use tracing::{debug, error, info, instrument, warn};
use url::Url;

use crate::errors::FetchError;
use crate::process::{self, RawTable};

/// Where the sheet text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(Url),
    File(PathBuf),
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Source::Url(u) => write!(f, "{}", u),
            Source::File(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Retry settings for HTTP sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
}

/// Upper bound on a single backoff sleep.
pub const MAX_BACKOFF_MS: u64 = 60_000;

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based): doubles each time,
    /// capped at [`MAX_BACKOFF_MS`].
    pub fn backoff_ms(&self, attempt: u32) -> u64 {
        let factor = 2u64
            .checked_pow(attempt.saturating_sub(1))
            .unwrap_or(u64::MAX);
        self.initial_backoff_ms
            .saturating_mul(factor)
            .min(MAX_BACKOFF_MS)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            initial_backoff_ms: 500,
        }
    }
}

/// Module for turning sheet links into CSV export URLs
pub mod urls {
    use super::*;
    use once_cell::sync::Lazy;
    use regex::Regex;

    static SHEET_ID: Lazy<Regex> = Lazy::new(|| {
        Regex::new(r"/spreadsheets/d/([a-zA-Z0-9_-]+)").expect("sheet id pattern should compile")
    });

    /// Google Sheets links become their CSV export URL; anything else is
    /// used as given.
    pub fn export_url(input: &str) -> Result<Url, FetchError> {
        let input = input.trim();
        let target = match SHEET_ID.captures(input) {
            Some(caps) => format!(
                "https://docs.google.com/spreadsheets/d/{}/export?format=csv",
                &caps[1]
            ),
            None => input.to_string(),
        };
        Url::parse(&target).map_err(|source| FetchError::InvalidUrl {
            url: input.to_string(),
            source,
        })
    }

    /// Parse a `--source` style argument: URLs are normalised, anything that
    /// does not look like a URL is taken as a local path.
    pub fn source_from_arg(input: &str) -> Result<Source, FetchError> {
        let trimmed = input.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            export_url(trimmed).map(Source::Url)
        } else {
            Ok(Source::File(PathBuf::from(trimmed)))
        }
    }
}

/// Module for retrieving the raw sheet text
pub mod sheet {
    use super::*;

    async fn get_text_core(client: &Client, url: &Url) -> Result<String, FetchError> {
        debug!("Fetching text from {}", url);
        let transport = |source| FetchError::Transport {
            url: url.to_string(),
            source,
        };
        let response = client
            .get(url.clone())
            .send()
            .await
            .map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }
        response.text().await.map_err(transport)
    }

    /// GET with exponential backoff on transient failures.
    pub async fn get_text_with_retry(
        client: &Client,
        url: &Url,
        retry: RetryPolicy,
    ) -> Result<String, FetchError> {
        let mut attempts = 0;
        loop {
            match get_text_core(client, url).await {
                Ok(t) => return Ok(t),
                Err(e) if e.is_retryable() && attempts < retry.max_retries => {
                    attempts += 1;
                    let backoff = retry.backoff_ms(attempts);
                    warn!(%url, attempt = attempts, delay_ms = backoff, error = %e, "Retrying");
                    sleep(Duration::from_millis(backoff)).await;
                }
                Err(e) => {
                    error!(%url, error = %e, "Giving up");
                    return Err(e);
                }
            }
        }
    }

    /// Raw text of `source`.
    pub async fn fetch_text(
        client: &Client,
        source: &Source,
        retry: RetryPolicy,
    ) -> Result<String, FetchError> {
        match source {
            Source::Url(url) => get_text_with_retry(client, url, retry).await,
            Source::File(path) => fs::read_to_string(path)
                .await
                .map_err(|source| FetchError::Io {
                    path: path.clone(),
                    source,
                }),
        }
    }
}

/// Fetch and normalise the sheet. On a fetch failure nothing is parsed.
#[instrument(level = "info", skip(client, source, retry), fields(source = %source))]
pub async fn load_table(
    client: &Client,
    source: &Source,
    retry: RetryPolicy,
) -> Result<RawTable, FetchError> {
    let text = sheet::fetch_text(client, source, retry).await?;
    let table = process::ingest(&text);
    info!(
        rows = table.rows.len(),
        columns = table.headers.len(),
        "sheet loaded"
    );
    Ok(table)
}
