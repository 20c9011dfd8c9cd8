//! Content extraction for candidate URLs.
//!
//! [`ContentExtractor::extract`] never fails: fetch errors, empty pages and
//! timeouts are all reported through [`ExtractionStatus`] so the pipeline can
//! still score the source from its domain alone.
//!
//! Title resolution falls back in this order: `<title>`, `og:title`,
//! `meta name=title`, first `<h1>`, a title built from the URL slug, and
//! finally `Document from <host>`.

use crate::config::ExtractionConfig;
use crate::error::{CredenceError, Result};
use crate::types::{ExtractionResult, ExtractionStatus};
use async_trait::async_trait;
use credence_search::{SearchConfig, SearchError, content};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Appended to text cut at the character budget.
pub const TRUNCATION_MARKER: &str = " [content truncated]";

/// Slug-derived titles this short are not used.
const MIN_SLUG_TITLE_CHARS: usize = 6;

/// Source of raw page HTML.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Download `url` and return its HTML.
    async fn fetch(&self, url: &str) -> Result<String>;
}

/// [`PageFetcher`] backed by a shared reqwest client.
pub struct HttpPageFetcher {
    client: reqwest::Client,
}

impl HttpPageFetcher {
    /// Build a fetcher with the User-Agent and timeout from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &SearchConfig) -> Result<Self> {
        Ok(Self {
            client: credence_search::http::build_client(config)?,
        })
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        Ok(credence_search::http::fetch_html(&self.client, url).await?)
    }
}

/// Fetches pages and turns them into [`ExtractionResult`]s.
#[derive(Clone)]
pub struct ContentExtractor {
    fetcher: Arc<dyn PageFetcher>,
    timeout: Duration,
    max_chars: usize,
}

impl ContentExtractor {
    pub fn new(fetcher: Arc<dyn PageFetcher>, config: &ExtractionConfig) -> Self {
        Self {
            fetcher,
            timeout: Duration::from_secs(config.timeout_seconds),
            max_chars: config.max_chars,
        }
    }

    /// Override the per-URL time budget.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    /// Extract text and a title from `url`.
    pub async fn extract(&self, url: &str) -> ExtractionResult {
        if !is_http_url(url) {
            return ExtractionResult::failed(
                url,
                Some(fallback_title(url)),
                "only http and https URLs can be fetched",
            );
        }

        match tokio::time::timeout(self.timeout, self.fetch_and_extract(url)).await {
            Ok(result) => result,
            Err(_) => {
                let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                tracing::warn!(url, timeout_ms, "extraction timed out");
                ExtractionResult::timed_out(
                    url,
                    Some(fallback_title(url)),
                    format!("no response within {timeout_ms}ms"),
                )
            }
        }
    }

    async fn fetch_and_extract(&self, url: &str) -> ExtractionResult {
        let html = match self.fetcher.fetch(url).await {
            Ok(html) => html,
            Err(CredenceError::Search(SearchError::Timeout(detail))) => {
                tracing::warn!(url, "page fetch timed out");
                return ExtractionResult::timed_out(url, Some(fallback_title(url)), detail);
            }
            Err(e) => {
                tracing::warn!(url, error = %e, "page fetch failed");
                return ExtractionResult::failed(url, Some(fallback_title(url)), e.to_string());
            }
        };

        match content::extract_content(&html, url) {
            Ok(page) => {
                tracing::debug!(url, words = page.word_count, "extracted page content");
                ExtractionResult {
                    url: url.to_owned(),
                    title: Some(page.title.unwrap_or_else(|| fallback_title(url))),
                    text: truncate_chars(&page.text, self.max_chars),
                    status: ExtractionStatus::Ok,
                    error_detail: None,
                    word_count: page.word_count,
                    metadata_markers: page.metadata_markers,
                }
            }
            Err(e) => {
                tracing::debug!(url, error = %e, "no extractable content");
                let title = content::title_from_html(&html).unwrap_or_else(|| fallback_title(url));
                ExtractionResult::failed(url, Some(title), e.to_string())
            }
        }
    }
}

fn is_http_url(url: &str) -> bool {
    Url::parse(url).is_ok_and(|u| matches!(u.scheme(), "http" | "https") && u.host_str().is_some())
}

/// Cut `text` to at most `max_chars` characters on a char boundary.
///
/// Text that was cut gets [`TRUNCATION_MARKER`] appended; shorter text is
/// returned unchanged.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        None => text.to_owned(),
        Some((cut, _)) => {
            let mut out = text[..cut].trim_end().to_owned();
            out.push_str(TRUNCATION_MARKER);
            out
        }
    }
}

/// Title built from the last path segment of `url`, if it reads like one.
///
/// `/papers/soil-carbon_study.pdf` becomes `Soil Carbon Study`.
pub fn title_from_url(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let segment = parsed
        .path_segments()?
        .filter(|segment| !segment.is_empty())
        .last()?;
    let stem = match segment.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && ext.len() <= 5 => stem,
        _ => segment,
    };
    let title = stem
        .split(['-', '_', '+'])
        .filter(|word| !word.is_empty())
        .map(capitalise)
        .collect::<Vec<_>>()
        .join(" ");
    (title.chars().count() >= MIN_SLUG_TITLE_CHARS).then_some(title)
}

/// The last resort title for a URL: slug title, then `Document from <host>`.
pub fn fallback_title(url: &str) -> String {
    if let Some(title) = title_from_url(url) {
        return title;
    }
    match Url::parse(url).ok().and_then(|u| u.host_str().map(str::to_owned)) {
        Some(host) => format!("Document from {}", host.trim_start_matches("www.")),
        None => "Untitled document".to_owned(),
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
