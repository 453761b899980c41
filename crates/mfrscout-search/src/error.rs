use thiserror::Error;

/// Failure of the search provider itself, as opposed to "no results".
///
/// The resolver treats every variant as "search unavailable".
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("search provider unavailable: {0}")]
    Unavailable(String),

    #[error("rate limited by search provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP error fetching {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("unusable page body from {url}: {reason}")]
    Unusable { url: String, reason: &'static str },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("browser session failed: {0}")]
    Session(String),

    #[error("render of {url} timed out after {timeout_secs}s")]
    Timeout { url: String, timeout_secs: u64 },
}
