//! The query-level entry point: discover → analyse → rank.

use crate::config::CredenceConfig;
use crate::discovery::{SearchBackend, SourceDiscovery, WebSearchBackend};
use crate::error::{CredenceError, Result};
use crate::extractor::{ContentExtractor, HttpPageFetcher, PageFetcher};
use crate::pipeline::AnalysisPipeline;
use crate::ranker::rank;
use crate::scorer::CredibilityScorer;
use crate::summarize::OpenAiSummarizer;
use crate::types::{CredibilityAssessment, QueryReport, RankedSource};
use chrono::Utc;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Progress events emitted while a query runs.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryEvent {
    /// Discovery has started.
    Searching {
        /// Number of query formulations that will be tried.
        formulations: usize,
    },
    /// Discovery finished.
    Discovered { candidates: usize },
    /// Analysis of the discovered candidates has started.
    Analyzing { candidates: usize },
    /// Results are sorted.
    Ranked { results: usize },
    /// The query is finished.
    Completed { results: usize, elapsed_ms: u64 },
}

impl fmt::Display for QueryEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Searching { formulations } => {
                write!(f, "searching with {formulations} query formulations")
            }
            Self::Discovered { candidates } => write!(f, "discovered {candidates} unique sources"),
            Self::Analyzing { candidates } => write!(f, "analysing {candidates} sources"),
            Self::Ranked { results } => write!(f, "ranked {results} sources"),
            Self::Completed {
                results,
                elapsed_ms,
            } => write!(f, "completed with {results} results in {elapsed_ms}ms"),
        }
    }
}

/// Callback receiving [`QueryEvent`]s.
pub type EventCallback = Box<dyn Fn(QueryEvent) + Send + Sync>;

/// Runs research queries end to end.
pub struct CredibilityChecker {
    discovery: SourceDiscovery,
    pipeline: AnalysisPipeline,
    top_k: Option<usize>,
    on_event: Option<EventCallback>,
}

impl CredibilityChecker {
    pub fn new(discovery: SourceDiscovery, pipeline: AnalysisPipeline) -> Self {
        Self {
            discovery,
            pipeline,
            top_k: None,
            on_event: None,
        }
    }

    /// Wire up the scraping search backend, HTTP page fetcher and (when a
    /// key is available) the summarisation API from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid configuration, an unreadable authority
    /// table, or an HTTP client that cannot be built.
    pub fn from_config(config: &CredenceConfig) -> Result<Self> {
        config.validate()?;
        let backend: Arc<dyn SearchBackend> = Arc::new(WebSearchBackend::new(config.search.clone()));
        let fetcher: Arc<dyn PageFetcher> = Arc::new(HttpPageFetcher::new(&config.search)?);
        Self::from_parts(config, backend, fetcher)
    }

    /// Like [`from_config`](Self::from_config) with caller-supplied search and
    /// fetch backends.
    ///
    /// # Errors
    ///
    /// Returns an error if the authority table or summariser cannot be built.
    pub fn from_parts(
        config: &CredenceConfig,
        backend: Arc<dyn SearchBackend>,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Self> {
        let discovery =
            SourceDiscovery::with_formulations(backend, config.discovery.formulations.clone());
        let extractor = ContentExtractor::new(fetcher, &config.extraction);
        let scorer = CredibilityScorer::from_config(&config.scoring)?;
        tracing::debug!(table_version = scorer.table_version(), "credibility scorer ready");

        let mut pipeline =
            AnalysisPipeline::new(Arc::new(extractor), Arc::new(scorer), config.pipeline.workers);
        if let Some(summarizer) = OpenAiSummarizer::from_config(&config.summary)? {
            pipeline = pipeline.with_summarizer(Arc::new(summarizer));
        }

        Ok(Self::new(discovery, pipeline))
    }

    /// Keep only the best `top_k` results.
    pub fn with_top_k(mut self, top_k: Option<usize>) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn with_event_callback(mut self, callback: EventCallback) -> Self {
        self.on_event = Some(callback);
        self
    }

    /// Score a URL from its domain alone, without fetching it.
    pub fn score_url(&self, url: &str) -> CredibilityAssessment {
        self.pipeline.scorer().score(url, None)
    }

    /// Discover, analyse and rank sources for `query`.
    ///
    /// # Errors
    ///
    /// Returns [`CredenceError::InvalidArgument`] if `max_results` is zero.
    /// Search, fetch and summary failures never fail the query; they show up
    /// as fewer or degraded results.
    pub async fn run_query(&self, query: &str, max_results: usize) -> Result<Vec<RankedSource>> {
        Ok(self.run_report(query, max_results).await?.results)
    }

    /// [`run_query`](Self::run_query) plus timing, counts and the event log.
    ///
    /// # Errors
    ///
    /// Same as [`run_query`](Self::run_query).
    pub async fn run_report(&self, query: &str, max_results: usize) -> Result<QueryReport> {
        if max_results == 0 {
            return Err(CredenceError::InvalidArgument(
                "max_results must be at least 1".into(),
            ));
        }

        let started_at = Utc::now();
        let clock = Instant::now();
        let mut events = Vec::new();
        tracing::info!(max_results, "query started");

        self.emit(
            &mut events,
            QueryEvent::Searching {
                formulations: self.discovery.formulations().len(),
            },
        );
        let candidates = self.discovery.discover(query, max_results).await;
        let candidates_discovered = candidates.len();
        self.emit(
            &mut events,
            QueryEvent::Discovered {
                candidates: candidates_discovered,
            },
        );

        let results = if candidates.is_empty() {
            Vec::new()
        } else {
            self.emit(
                &mut events,
                QueryEvent::Analyzing {
                    candidates: candidates_discovered,
                },
            );
            let analyzed = self.pipeline.analyze(candidates).await;
            rank(analyzed, self.top_k)
        };
        self.emit(
            &mut events,
            QueryEvent::Ranked {
                results: results.len(),
            },
        );

        let elapsed_ms = u64::try_from(clock.elapsed().as_millis()).unwrap_or(u64::MAX);
        self.emit(
            &mut events,
            QueryEvent::Completed {
                results: results.len(),
                elapsed_ms,
            },
        );
        tracing::info!(results = results.len(), elapsed_ms, "query completed");

        Ok(QueryReport {
            query: query.to_owned(),
            results,
            started_at,
            elapsed_ms,
            candidates_discovered,
            events,
        })
    }

    fn emit(&self, log: &mut Vec<String>, event: QueryEvent) {
        log.push(format!("[{}] {event}", Utc::now().format("%H:%M:%S")));
        if let Some(ref callback) = self.on_event {
            callback(event);
        }
    }
}
