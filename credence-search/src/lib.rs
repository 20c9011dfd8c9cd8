//! # credence-search
//!
//! Zero-configuration web search and page extraction for Credence.
//!
//! Scrapes public search engines directly (no API keys) and downloads
//! source pages, turning their HTML into readable text plus a title and
//! citation metadata markers.
//!
//! ## Design
//!
//! - DuckDuckGo and Bing are scraped with CSS selectors and queried concurrently
//! - Results are merged, deduplicated by normalised URL and ranked
//! - Graceful degradation: if one engine fails, the others still return results
//! - No state outlives a call: no caches, no persisted query logs
//!
//! Queries never appear in logs above trace level.

pub mod config;
pub mod content;
pub mod engine;
pub mod engines;
pub mod error;
pub mod http;
pub mod orchestrator;
pub mod types;

pub use config::SearchConfig;
pub use engine::SearchEngineTrait;
pub use error::{Result, SearchError};
pub use types::{PageContent, SearchEngine, SearchResult};

/// Search the web using every engine in `config`, concurrently.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration and
/// [`SearchError::AllEnginesFailed`] if every enabled engine fails.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> credence_search::Result<()> {
/// let config = credence_search::SearchConfig::default();
/// for hit in credence_search::search("soil microbiome", &config).await? {
///     println!("{}: {}", hit.title, hit.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<Vec<SearchResult>> {
    config.validate()?;
    orchestrator::search::orchestrate_search(query, config).await
}

/// Search the web with the default configuration.
///
/// # Errors
///
/// Same as [`search`].
pub async fn search_default(query: &str) -> Result<Vec<SearchResult>> {
    search(query, &SearchConfig::default()).await
}

/// Download a page and return its raw HTML.
///
/// # Errors
///
/// Returns [`SearchError::Http`] or [`SearchError::Timeout`] if the page
/// cannot be fetched.
pub async fn fetch_html(url: &str, config: &SearchConfig) -> Result<String> {
    let client = http::build_client(config)?;
    http::fetch_html(&client, url).await
}

/// Download a page and extract its readable content.
///
/// # Errors
///
/// Returns [`SearchError::Http`] / [`SearchError::Timeout`] if the page
/// cannot be fetched, or [`SearchError::Parse`] if it has no body text.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> credence_search::Result<()> {
/// let config = credence_search::SearchConfig::default();
/// let page = credence_search::fetch_page_content("https://example.edu", &config).await?;
/// println!("{:?}: {} words", page.title, page.word_count);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_page_content(url: &str, config: &SearchConfig) -> Result<PageContent> {
    let html = fetch_html(url, config).await?;
    content::extract_content(&html, url)
}
