//! DuckDuckGo search engine via the HTML-only endpoint.
//!
//! `https://html.duckduckgo.com/html/` needs no JavaScript and tolerates
//! automated requests. Result links are wrapped in a `/l/?uddg=` redirect.

use crate::config::SearchConfig;
use crate::engine::SearchEngineTrait;
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchEngine, SearchResult};
use url::Url;

use super::{parse_result_page, ResultLayout};

const ENDPOINT: &str = "https://html.duckduckgo.com/html/";

const LAYOUT: ResultLayout = ResultLayout {
    container: ".result.results_links.results_links_deep:not(.result--ad), .web-result:not(.result--ad)",
    title: ".result__a",
    link: ".result__a",
    snippet: ".result__snippet",
};

/// DuckDuckGo HTML search scraper. Primary engine.
pub struct DuckDuckGoEngine;

/// Unwrap `//duckduckgo.com/l/?uddg=<encoded>&rut=…` into the target URL.
fn unwrap_redirect(href: &str) -> Option<String> {
    let full_href = if href.starts_with("//") {
        format!("https:{href}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&full_href).ok()?;
    if parsed.host_str() == Some("duckduckgo.com") && parsed.path().starts_with("/l/") {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "uddg")
            .map(|(_, value)| value.into_owned())
    } else {
        Some(full_href)
    }
}

impl SearchEngineTrait for DuckDuckGoEngine {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "DuckDuckGo search");

        let client = http::build_client(config)?;

        let mut params = vec![("q", query)];
        if config.safe_search {
            params.push(("kp", "1"));
        }

        let response = client
            .post(ENDPOINT)
            .form(&params)
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("DuckDuckGo request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("DuckDuckGo HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("DuckDuckGo response read failed", e))?;

        tracing::trace!(bytes = html.len(), "DuckDuckGo response received");

        parse_duckduckgo_html(&html, config.max_results)
    }

    fn engine_type(&self) -> SearchEngine {
        SearchEngine::DuckDuckGo
    }
}

pub(crate) fn parse_duckduckgo_html(
    html: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    parse_result_page(
        html,
        &LAYOUT,
        SearchEngine::DuckDuckGo,
        max_results,
        unwrap_redirect,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE_DDG_HTML: &str = include_str!("../../test-data/duckduckgo.html");

    #[test]
    fn unwraps_redirect_links() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.edu%2Fpaper&rut=abc";
        assert_eq!(
            unwrap_redirect(href),
            Some("https://example.edu/paper".to_string())
        );
    }

    #[test]
    fn direct_links_pass_through() {
        assert_eq!(
            unwrap_redirect("https://example.org/direct"),
            Some("https://example.org/direct".to_string())
        );
        assert!(unwrap_redirect("not-a-url").is_none());
    }

    #[test]
    fn fixture_parses_organic_results_only() {
        let results = parse_duckduckgo_html(FIXTURE_DDG_HTML, 50).expect("fixture should parse");
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| !r.title.contains("(Ad)")));
        assert!(results.iter().all(|r| r.engine == "DuckDuckGo"));
    }

    #[test]
    fn fixture_unwraps_and_keeps_order() {
        let results = parse_duckduckgo_html(FIXTURE_DDG_HTML, 50).expect("should parse");
        assert_eq!(results[0].url, "https://www.nature.com/articles/s41586-020-2649-2");
        assert_eq!(results[1].url, "https://extension.example.edu/soil-health/");
        assert!(results[0].snippet.contains("soil"));
        for r in &results {
            assert!(!r.url.contains("duckduckgo.com/l/"), "still wrapped: {}", r.url);
        }
    }

    #[test]
    fn fixture_respects_max_results() {
        let results = parse_duckduckgo_html(FIXTURE_DDG_HTML, 2).expect("should parse");
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn empty_page_yields_no_results() {
        let results = parse_duckduckgo_html("<html><body></body></html>", 10).expect("parse");
        assert!(results.is_empty());
    }

    #[tokio::test]
    #[ignore] // Live test; run with `cargo test -- --ignored`
    async fn live_duckduckgo_search() {
        let results = DuckDuckGoEngine
            .search("soil microbiome cover crops", &SearchConfig::default())
            .await
            .expect("live search should work");
        assert!(!results.is_empty());
    }
}
