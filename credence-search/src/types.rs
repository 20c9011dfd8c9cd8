//! Core types for search hits, engine identification and fetched pages.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single result returned from a web search engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result.
    pub url: String,
    /// A text snippet summarising the page content.
    pub snippet: String,
    /// Which search engine returned this result.
    pub engine: String,
    /// Aggregated relevance score (higher is better). Results returned by
    /// more than one engine receive a cross-engine boost.
    pub score: f64,
}

/// Search engines that credence-search can scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchEngine {
    /// DuckDuckGo HTML endpoint, scraper-friendly, no JavaScript needed.
    DuckDuckGo,
    /// Bing: a different index used as a second opinion.
    Bing,
}

impl SearchEngine {
    /// Returns the human-readable name of this engine.
    pub fn name(&self) -> &'static str {
        match self {
            Self::DuckDuckGo => "DuckDuckGo",
            Self::Bing => "Bing",
        }
    }

    /// Ranking weight applied to results from this engine.
    pub fn weight(&self) -> f64 {
        match self {
            Self::DuckDuckGo => 1.0,
            Self::Bing => 0.8,
        }
    }

    /// Parse an engine name as written into [`SearchResult::engine`].
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().iter().copied().find(|engine| engine.name() == name)
    }

    /// Returns all available engine variants.
    pub fn all() -> &'static [SearchEngine] {
        &[Self::DuckDuckGo, Self::Bing]
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Readable content extracted from a fetched HTML page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageContent {
    /// The URL that was fetched.
    pub url: String,
    /// Best title found in the markup, if any strategy produced one.
    pub title: Option<String>,
    /// Cleaned text with boilerplate elements removed. Never truncated here.
    pub text: String,
    /// Number of whitespace-separated words in `text`.
    pub word_count: usize,
    /// Structured citation markers found in the markup
    /// (e.g. `citation_doi`, `dc.identifier`, `json-ld`).
    pub metadata_markers: Vec<String>,
}
