//! Error types for the credibility checker.

use credence_search::SearchError;

/// Top-level error type for discovery, analysis and configuration.
///
/// Most failures inside a query are absorbed into per-source results; only
/// contract violations and setup problems surface as a `CredenceError`.
#[derive(Debug, thiserror::Error)]
pub enum CredenceError {
    /// Web search backend error.
    #[error("search error: {0}")]
    Search(#[from] SearchError),

    /// A page could not be fetched.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// The summarisation API failed or returned an unusable response.
    #[error("summary error: {0}")]
    Summary(String),

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// The domain-authority table could not be loaded.
    #[error("authority table error: {0}")]
    Authority(String),

    /// A caller passed an argument outside the accepted range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, CredenceError>;
