use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to get the sheet text. Nothing past fetching can fail: malformed
/// content degrades to text cells, missing columns and missing dates.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid source URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("could not retrieve source data from {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("could not retrieve source data from {url}: HTTP {status} (is the sheet shared as \"anyone with the link can view\"?)")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("could not read source file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// Worth another attempt: network trouble, 5xx, or throttling.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Transport { .. } => true,
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == reqwest::StatusCode::TOO_MANY_REQUESTS
            }
            FetchError::InvalidUrl { .. } | FetchError::Io { .. } => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_errors_retry_only_when_transient() {
        let err = |code: u16| FetchError::Status {
            url: "http://x".into(),
            status: reqwest::StatusCode::from_u16(code).unwrap(),
        };
        assert!(err(503).is_retryable());
        assert!(err(429).is_retryable());
        assert!(!err(404).is_retryable());
        assert!(!err(403).is_retryable());
    }

    #[test]
    fn messages_name_the_source() {
        let err = FetchError::Io {
            path: PathBuf::from("/tmp/missing.csv"),
            source: io::Error::new(io::ErrorKind::NotFound, "gone"),
        };
        assert!(err.to_string().contains("/tmp/missing.csv"));
        assert!(!err.is_retryable());
    }
}
