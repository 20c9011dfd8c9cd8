//! Credence: academic source credibility checker.
//!
//! Takes a research query, discovers candidate web sources, extracts and
//! optionally summarises their content, scores each source's credibility
//! and returns a ranked list:
//! query → Discovery → Analysis (extract, score, summarise) → Ranking
//!
//! # Architecture
//!
//! - **Discovery**: a few query formulations against a [`SearchBackend`]
//! - **Extraction**: page fetch through a [`PageFetcher`] with title fallbacks
//!   and a per-URL time budget
//! - **Scoring**: domain-authority tables plus content signals, bounded to `[0, 3]`
//! - **Pipeline**: fixed-size worker pool with per-source failure isolation
//! - **Ranking**: stable sort by score, ties by discovery order
//!
//! Web search and HTML extraction come from the `credence-search` crate;
//! everything here talks to them through traits so tests can substitute
//! canned backends.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> credence::Result<()> {
//! let config = credence::CredenceConfig::default();
//! let checker = credence::CredibilityChecker::from_config(&config)?;
//! for source in checker.run_query("soil microbiome diversity", 5).await? {
//!     println!("{} {:.1} {}", source.rank, source.assessment.score, source.candidate.url);
//! }
//! # Ok(())
//! # }
//! ```

pub mod authority;
pub mod checker;
pub mod config;
pub mod discovery;
pub mod error;
pub mod extractor;
pub mod pipeline;
pub mod ranker;
pub mod scorer;
pub mod session;
pub mod summarize;
pub mod types;

pub use checker::{CredibilityChecker, EventCallback, QueryEvent};
pub use config::CredenceConfig;
pub use discovery::{SearchBackend, SourceDiscovery, WebSearchBackend};
pub use error::{CredenceError, Result};
pub use extractor::{ContentExtractor, HttpPageFetcher, PageFetcher};
pub use pipeline::AnalysisPipeline;
pub use ranker::rank;
pub use scorer::{CredibilityScorer, ScoringWeights};
pub use session::SessionHistory;
pub use summarize::{OpenAiSummarizer, Summarizer};
pub use types::{
    AnalyzedSource, CredibilityAssessment, CredibilityTier, ExtractionResult, ExtractionStatus,
    FactorKind, QueryFormulation, QueryReport, RankedSource, ScoreFactor, SourceCandidate,
};

/// Run a query with the default configuration.
///
/// # Errors
///
/// Returns [`CredenceError::InvalidArgument`] if `max_results` is zero, or
/// an error if the default HTTP clients cannot be built.
pub async fn run_query(query: &str, max_results: usize) -> Result<Vec<RankedSource>> {
    CredibilityChecker::from_config(&CredenceConfig::default())?
        .run_query(query, max_results)
        .await
}
