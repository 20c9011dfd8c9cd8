//! Error types for the credence-search crate.
//!
//! Messages are stable lowercase strings so callers can log them or
//! fold them into per-source error details without further formatting.

/// Errors that can occur while searching the web or fetching a page.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Every enabled search engine failed to return results.
    #[error("all search engines failed: {0}")]
    AllEnginesFailed(String),

    /// A request did not complete within its time budget.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// An HTTP request failed or returned an error status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A response could not be parsed into results or content.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Map a [`reqwest::Error`] onto the taxonomy, keeping timeouts distinct.
    pub(crate) fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{context}: {err}"))
        } else {
            Self::Http(format!("{context}: {err}"))
        }
    }
}

/// Convenience type alias for credence-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
