//! Error types for the MLB Stats API client.

/// Why a single player's fetch produced nothing.
///
/// These are absorbed per player by the coordinator and never end a run.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,
    #[error("request failed")]
    Request(#[source] reqwest::Error),
    #[error("unexpected HTTP status {status}")]
    Status { status: u16 },
    #[error("failed to parse response")]
    Parse {
        url: String,
        #[source]
        source: anyhow::Error,
    },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Request(err)
        }
    }
}
