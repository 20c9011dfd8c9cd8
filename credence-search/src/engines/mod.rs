//! Search engine implementations.
//!
//! Each module provides a struct implementing [`crate::engine::SearchEngineTrait`]
//! for one engine's HTML results page. Result-list parsing is shared: an
//! engine only describes where titles, links and snippets live.

pub mod bing;
pub mod duckduckgo;

pub use bing::BingEngine;
pub use duckduckgo::DuckDuckGoEngine;

use scraper::{Html, Selector};

use crate::error::SearchError;
use crate::types::{SearchEngine, SearchResult};

/// CSS selectors describing one engine's organic result markup.
pub(crate) struct ResultLayout {
    /// One element per organic result.
    pub container: &'static str,
    /// Title element, relative to the container.
    pub title: &'static str,
    /// Anchor carrying the result URL, relative to the container.
    pub link: &'static str,
    /// Snippet element, relative to the container.
    pub snippet: &'static str,
}

fn selector(css: &str) -> Result<Selector, SearchError> {
    Selector::parse(css).map_err(|e| SearchError::Parse(format!("invalid selector {css:?}: {e:?}")))
}

/// Parse a results page laid out as `layout` into at most `max_results` hits.
///
/// `resolve` turns a raw `href` into the target URL (unwrapping engine
/// redirects); entries it rejects, or that are not http(s), are skipped.
pub(crate) fn parse_result_page(
    html: &str,
    layout: &ResultLayout,
    engine: SearchEngine,
    max_results: usize,
    resolve: impl Fn(&str) -> Option<String>,
) -> Result<Vec<SearchResult>, SearchError> {
    let document = Html::parse_document(html);
    let container_sel = selector(layout.container)?;
    let title_sel = selector(layout.title)?;
    let link_sel = selector(layout.link)?;
    let snippet_sel = selector(layout.snippet)?;

    let mut results = Vec::new();

    for element in document.select(&container_sel) {
        if results.len() >= max_results {
            break;
        }

        let Some(title_el) = element.select(&title_sel).next() else {
            continue;
        };
        let title = title_el.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let Some(url) = element
            .select(&link_sel)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(&resolve)
        else {
            continue;
        };
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            continue;
        }

        let snippet = element
            .select(&snippet_sel)
            .next()
            .map(|el| el.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        results.push(SearchResult {
            title,
            url,
            snippet,
            engine: engine.name().to_string(),
            score: 0.0,
        });
    }

    tracing::debug!(%engine, count = results.len(), "result page parsed");
    Ok(results)
}
