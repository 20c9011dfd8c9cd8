//! Bing search engine, a second index alongside DuckDuckGo.
//!
//! Organic links are sometimes wrapped in `bing.com/ck/a?…&u=a1<base64>`
//! click-tracking redirects, which are decoded back to the target URL.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use url::Url;

use crate::config::SearchConfig;
use crate::engine::SearchEngineTrait;
use crate::error::SearchError;
use crate::http;
use crate::types::{SearchEngine, SearchResult};

use super::{parse_result_page, ResultLayout};

const ENDPOINT: &str = "https://www.bing.com/search";

const LAYOUT: ResultLayout = ResultLayout {
    container: "li.b_algo",
    title: "h2",
    link: "h2 a",
    snippet: ".b_caption p, .b_lineclamp2",
};

/// Bing HTML search scraper.
pub struct BingEngine;

fn unwrap_redirect(href: &str) -> Option<String> {
    let parsed = Url::parse(href).ok()?;
    let is_click_tracker = parsed
        .host_str()
        .is_some_and(|host| host.ends_with("bing.com"))
        && parsed.path().starts_with("/ck/");
    if !is_click_tracker {
        return Some(href.to_string());
    }

    let encoded = parsed
        .query_pairs()
        .find(|(key, _)| key == "u")
        .map(|(_, value)| value.into_owned())?;
    let payload = encoded.strip_prefix("a1")?;
    let decoded = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
    String::from_utf8(decoded).ok()
}

impl SearchEngineTrait for BingEngine {
    async fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Bing search");

        let client = http::build_client(config)?;
        let safe_search = if config.safe_search { "Strict" } else { "Off" };

        let response = client
            .get(ENDPOINT)
            .query(&[("q", query), ("setlang", "en"), ("safeSearch", safe_search)])
            .header("Accept", "text/html,application/xhtml+xml")
            .header("Accept-Language", "en-US,en;q=0.9")
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("Bing request failed", e))?
            .error_for_status()
            .map_err(|e| SearchError::Http(format!("Bing HTTP error: {e}")))?;

        let html = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("Bing response read failed", e))?;

        tracing::trace!(bytes = html.len(), "Bing response received");

        parse_bing_html(&html, config.max_results)
    }

    fn engine_type(&self) -> SearchEngine {
        SearchEngine::Bing
    }
}

fn parse_bing_html(html: &str, max_results: usize) -> Result<Vec<SearchResult>, SearchError> {
    parse_result_page(html, &LAYOUT, SearchEngine::Bing, max_results, unwrap_redirect)
}
