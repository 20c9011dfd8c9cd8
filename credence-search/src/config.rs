//! Settings shared by search scraping and page fetching.
//!
//! Defaults space requests out and keep timeouts short enough that one
//! unresponsive engine cannot stall a query.

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::SearchEngine;

/// Configuration for a web search or page fetch.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Engines to scrape. All of them run for every query.
    pub engines: Vec<SearchEngine>,
    /// Cap on merged, deduplicated results.
    pub max_results: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// Ask engines to filter adult results where they support it.
    pub safe_search: bool,
    /// Random delay range in milliseconds `(min, max)` applied before each
    /// engine request, so engines are not hit in the same instant.
    pub request_delay_ms: (u64, u64),
    /// Fixed User-Agent. A browser User-Agent is picked at random when unset.
    pub user_agent: Option<String>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            engines: vec![SearchEngine::DuckDuckGo, SearchEngine::Bing],
            max_results: 10,
            timeout_seconds: 8,
            safe_search: true,
            request_delay_ms: (100, 500),
            user_agent: None,
        }
    }
}

impl SearchConfig {
    /// Reject settings that would make every request fail or never run.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] naming the offending field.
    pub fn validate(&self) -> Result<(), SearchError> {
        let problem = if self.engines.is_empty() {
            Some("no engine enabled: list at least one in `engines`")
        } else if self.max_results == 0 {
            Some("max_results is 0: nothing would be returned")
        } else if self.timeout_seconds == 0 {
            Some("timeout_seconds is 0: every request would time out")
        } else if self.request_delay_ms.0 > self.request_delay_ms.1 {
            Some("request_delay_ms is inverted: min exceeds max")
        } else {
            None
        };
        match problem {
            Some(message) => Err(SearchError::Config(message.to_owned())),
            None => Ok(()),
        }
    }
}
