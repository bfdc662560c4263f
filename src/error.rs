use reqwest::StatusCode;
use thiserror::Error;

/// Current version of the persisted cookie document.
pub const STORE_VERSION: u32 = 1;

/// Errors produced while fetching, persisting, or reloading cookies.
///
/// Fetch-side variants are collected per URL and never abort the batch;
/// everything touching the persisted document or the file system is fatal
/// to the step that raised it.
#[derive(Debug, Error)]
pub enum SnapError {
    #[error("invalid url {url:?}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("failed to build http client")]
    Client(#[source] reqwest::Error),

    #[error("fetch failed for {url}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    HttpStatus { url: String, status: StatusCode },

    #[error("too many redirects starting from {url}")]
    TooManyRedirects { url: String },

    #[error("cookie document could not be serialized")]
    Serialize(#[source] serde_json::Error),

    #[error("cookie document could not be parsed")]
    Deserialize(#[source] serde_json::Error),

    #[error("unsupported cookie document version {found}, expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("cookie document declares {declared} cookies but contains {found}")]
    CountMismatch { declared: usize, found: usize },

    #[error("cookie record for {name:?} carries an out-of-range timestamp {secs}")]
    InvalidTimestamp { name: String, secs: i64 },

    #[error("cookie file I/O failed")]
    Io(#[from] std::io::Error),
}

impl SnapError {
    /// True for failures that a fetch batch tolerates: the outcome is
    /// recorded and the remaining requests keep running.
    pub fn is_fetch_failure(&self) -> bool {
        matches!(
            self,
            SnapError::Fetch { .. }
                | SnapError::HttpStatus { .. }
                | SnapError::TooManyRedirects { .. }
        )
    }
}
