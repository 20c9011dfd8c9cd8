//! Shared HTTP client with User-Agent rotation.
//!
//! Provides a configured [`reqwest::Client`] with browser-like headers,
//! cookie support and a rotating User-Agent, used both for search engine
//! scraping and for downloading source pages.

use crate::config::SearchConfig;
use crate::error::SearchError;
use rand::seq::SliceRandom;
use std::time::Duration;

/// Realistic browser User-Agent strings, rotated per client.
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:133.0) Gecko/20100101 Firefox/133.0",
];

/// Largest page body we are willing to read, in bytes.
pub const MAX_PAGE_BYTES: usize = 4 * 1024 * 1024;

/// Build a [`reqwest::Client`] with the configured timeout and User-Agent.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    let ua = match config.user_agent {
        Some(ref custom) => custom.clone(),
        None => random_user_agent().to_owned(),
    };

    reqwest::Client::builder()
        .cookie_store(true)
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(ua)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Select a random User-Agent string from the rotation list.
pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS
        .choose(&mut rng)
        .copied()
        // USER_AGENTS is a non-empty const slice.
        .unwrap_or(USER_AGENTS[0])
}

/// Download a page and return its body as text.
///
/// The body is read chunk by chunk and reading stops at
/// [`MAX_PAGE_BYTES`]; the rest of a larger body is never buffered.
///
/// # Errors
///
/// Returns [`SearchError::Timeout`] when the client timeout fires and
/// [`SearchError::Http`] for connection failures or non-success statuses.
pub async fn fetch_html(client: &reqwest::Client, url: &str) -> Result<String, SearchError> {
    tracing::trace!(url, "fetching page");

    let mut response = client
        .get(url)
        .header("Accept", "text/html,application/xhtml+xml")
        .header("Accept-Language", "en-US,en;q=0.9")
        .send()
        .await
        .map_err(|e| SearchError::from_reqwest("page request failed", e))?
        .error_for_status()
        .map_err(|e| SearchError::Http(format!("page HTTP error: {e}")))?;

    let mut body = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| SearchError::from_reqwest("page read failed", e))?
    {
        let room = MAX_PAGE_BYTES - body.len();
        if chunk.len() >= room {
            body.extend_from_slice(&chunk[..room]);
            tracing::trace!(url, limit = MAX_PAGE_BYTES, "page body cut at limit");
            break;
        }
        body.extend_from_slice(&chunk);
    }

    tracing::trace!(bytes = body.len(), "page received");
    Ok(String::from_utf8_lossy(&body).into_owned())
}
