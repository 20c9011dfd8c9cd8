//! Trait definition for pluggable search engine backends.
//!
//! Each scraped engine implements [`SearchEngineTrait`] so the orchestrator
//! can fan out to all of them uniformly.

use crate::config::SearchConfig;
use crate::error::SearchError;
use crate::types::{SearchEngine, SearchResult};

/// A pluggable search engine backend.
///
/// Implementors build the request URL, send it with appropriate headers,
/// and parse the HTML response into [`SearchResult`] values. They must be
/// `Send + Sync` so engines can be queried concurrently.
pub trait SearchEngineTrait: Send + Sync {
    /// Perform a web search and return parsed results.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the HTTP request fails, the response cannot
    /// be parsed, or the engine is rate-limiting requests.
    fn search(
        &self,
        query: &str,
        config: &SearchConfig,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;

    /// Returns which [`SearchEngine`] variant this implementation represents.
    fn engine_type(&self) -> SearchEngine;

    /// Ranking weight for results from this engine.
    fn weight(&self) -> f64 {
        self.engine_type().weight()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct CannedEngine {
        results: Vec<SearchResult>,
    }

    impl SearchEngineTrait for CannedEngine {
        async fn search(
            &self,
            _query: &str,
            _config: &SearchConfig,
        ) -> Result<Vec<SearchResult>, SearchError> {
            if self.results.is_empty() {
                return Err(SearchError::Http("canned engine offline".into()));
            }
            Ok(self.results.clone())
        }

        fn engine_type(&self) -> SearchEngine {
            SearchEngine::Bing
        }
    }

    #[tokio::test]
    async fn canned_engine_returns_results() {
        let engine = CannedEngine {
            results: vec![SearchResult {
                title: "Soil study".into(),
                url: "https://example.edu/soil".into(),
                snippet: "A study".into(),
                engine: "Bing".into(),
                score: 0.0,
            }],
        };
        let results = engine
            .search("soil", &SearchConfig::default())
            .await
            .expect("should succeed");
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].url, "https://example.edu/soil");
    }

    #[tokio::test]
    async fn canned_engine_propagates_errors() {
        let engine = CannedEngine { results: vec![] };
        let err = engine
            .search("soil", &SearchConfig::default())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("offline"));
    }

    #[test]
    fn default_weight_delegates_to_engine() {
        let engine = CannedEngine { results: vec![] };
        assert!((engine.weight() - 0.8).abs() < f64::EPSILON);
    }
}
