//! Source discovery.
//!
//! Runs a fixed list of query formulations against a [`SearchBackend`] one
//! after another and merges the hits into an ordered, deduplicated set of
//! [`SourceCandidate`]s. Backend failures only cost the formulation that hit
//! them.

use crate::error::Result;
use crate::types::{QueryFormulation, SourceCandidate};
use async_trait::async_trait;
use credence_search::orchestrator::url_normalize::normalize_url;
use credence_search::{SearchConfig, SearchResult};
use std::collections::HashSet;
use std::sync::Arc;

/// A web search service.
///
/// Implementations may return fewer hits than asked for, including none.
#[async_trait]
pub trait SearchBackend: Send + Sync {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>>;
}

/// [`SearchBackend`] that scrapes public search engines.
pub struct WebSearchBackend {
    config: SearchConfig,
}

impl WebSearchBackend {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl SearchBackend for WebSearchBackend {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchResult>> {
        let config = SearchConfig {
            max_results,
            ..self.config.clone()
        };
        Ok(credence_search::search(query, &config).await?)
    }
}

/// Turns a research query into candidate URLs.
#[derive(Clone)]
pub struct SourceDiscovery {
    backend: Arc<dyn SearchBackend>,
    formulations: Vec<QueryFormulation>,
}

impl SourceDiscovery {
    /// Discovery with the default formulations.
    pub fn new(backend: Arc<dyn SearchBackend>) -> Self {
        Self::with_formulations(backend, QueryFormulation::DEFAULT_SET.to_vec())
    }

    pub fn with_formulations(
        backend: Arc<dyn SearchBackend>,
        formulations: Vec<QueryFormulation>,
    ) -> Self {
        Self {
            backend,
            formulations,
        }
    }

    pub fn formulations(&self) -> &[QueryFormulation] {
        &self.formulations
    }

    /// Collect up to `max_results` unique URLs for `query`.
    ///
    /// URLs are compared after normalisation; the first occurrence wins and
    /// keeps the formulation that found it. An empty query, or a backend that
    /// fails or finds nothing, yields an empty list.
    pub async fn discover(&self, query: &str, max_results: usize) -> Vec<SourceCandidate> {
        let query = query.trim();
        if query.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let mut seen = HashSet::new();
        let mut candidates: Vec<SourceCandidate> = Vec::new();

        for &formulation in &self.formulations {
            let remaining = max_results - candidates.len();
            if remaining == 0 {
                break;
            }

            let rendered = formulation.render(query);
            tracing::trace!(query = %rendered, %formulation, remaining, "issuing search");

            let hits = match self.backend.search(&rendered, remaining).await {
                Ok(hits) => hits,
                Err(e) => {
                    tracing::warn!(%formulation, error = %e, "search formulation failed");
                    continue;
                }
            };
            tracing::debug!(%formulation, hits = hits.len(), "search formulation returned");

            for hit in hits {
                if !seen.insert(normalize_url(&hit.url)) {
                    continue;
                }
                let title = hit.title.trim();
                candidates.push(SourceCandidate {
                    position: candidates.len(),
                    discovered_via: formulation,
                    search_title: (!title.is_empty()).then(|| title.to_owned()),
                    url: hit.url,
                });
                if candidates.len() == max_results {
                    break;
                }
            }
        }

        tracing::debug!(candidates = candidates.len(), "discovery finished");
        candidates
    }
}
