// src/config.rs

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use tracing::debug;

use crate::fetch::RetryPolicy;

/// Runtime settings. Every field has a default so a partial YAML file (or
/// none at all) is fine.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Sheet link or CSV URL.
    pub sheet_url: Option<String>,
    pub poll_interval_secs: u64,
    pub max_retries: u32,
    pub initial_backoff_ms: u64,
    pub request_timeout_secs: u64,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            sheet_url: None,
            poll_interval_secs: 30,
            max_retries: 3,
            initial_backoff_ms: 500,
            request_timeout_secs: 30,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Defaults, then the YAML file (if given), then process env.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let base = match path {
            Some(p) => Self::from_file(p)?,
            None => Self::default(),
        };
        base.with_env(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let cfg: Config = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing config {}", path.display()))?;
        debug!(path = %path.display(), "config file loaded");
        Ok(cfg)
    }

    /// Apply `SHEET_URL`, `POLL_INTERVAL_SECS` and `LOG_LEVEL` from `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("SHEET_URL").filter(|u| !u.trim().is_empty()) {
            self.sheet_url = Some(url);
        }
        if let Some(secs) = lookup("POLL_INTERVAL_SECS") {
            self.poll_interval_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("POLL_INTERVAL_SECS is not a number: {secs:?}"))?;
        }
        if let Some(level) = lookup("LOG_LEVEL").filter(|l| !l.trim().is_empty()) {
            self.log_level = level;
        }
        Ok(self)
    }

    pub fn retry(&self) -> RetryPolicy {
        RetryPolicy {
            max_retries: self.max_retries,
            initial_backoff_ms: self.initial_backoff_ms,
        }
    }

    /// Poll interval, never shorter than one second.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
