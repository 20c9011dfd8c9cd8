//! Credibility scoring.
//!
//! A score starts from the domain-authority base for the URL's host, then
//! collects small signed adjustments: domain-level signals always, content
//! signals only when extraction produced text. The running total is clamped
//! to `[0, 3]` after every adjustment and each factor records the delta that
//! was actually applied.

use crate::authority::{AuthorityTable, DomainClass};
use crate::config::ScoringConfig;
use crate::error::Result;
use crate::types::{
    CredibilityAssessment, CredibilityTier, ExtractionResult, FactorKind, ScoreFactor,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use url::Url;

/// Lowest possible score.
pub const MIN_SCORE: f64 = 0.0;
/// Highest possible score.
pub const MAX_SCORE: f64 = 3.0;
/// Largest single adjustment a signal may contribute.
pub const MAX_SIGNAL: f64 = 0.5;

const ACADEMIC_SUBDOMAINS: &[&str] = &["research", "library", "scholar", "academic"];

const ACADEMIC_PATH_SEGMENTS: &[&str] = &[
    "paper",
    "papers",
    "article",
    "articles",
    "research",
    "study",
    "studies",
    "journal",
    "publication",
    "publications",
    "abstract",
];

const CITATION_MARKER_PREFIXES: &[&str] = &["citation_", "dc.", "dcterms.", "prism."];

/// Base scores per domain class and increments per signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub institutional: f64,
    pub publisher_primary: f64,
    pub publisher_secondary: f64,
    pub organisation: f64,
    pub low_quality: f64,
    /// Base for hosts not found in the authority table.
    pub unclassified: f64,
    /// Base for URLs without a parseable host.
    pub malformed_url: f64,
    pub https: f64,
    pub academic_subdomain: f64,
    pub doi: f64,
    pub scholarly_terms: f64,
    pub academic_path: f64,
    pub pdf_format: f64,
    pub citation_metadata: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            institutional: 2.0,
            publisher_primary: 2.2,
            publisher_secondary: 1.9,
            organisation: 1.4,
            low_quality: 0.3,
            unclassified: 1.0,
            malformed_url: 0.8,
            https: 0.1,
            academic_subdomain: 0.2,
            doi: 0.4,
            scholarly_terms: 0.3,
            academic_path: 0.2,
            pdf_format: 0.2,
            citation_metadata: 0.2,
        }
    }
}

impl ScoringWeights {
    /// Base score for a domain class.
    pub fn base_for(&self, class: DomainClass) -> f64 {
        match class {
            DomainClass::Institutional => self.institutional,
            DomainClass::PublisherPrimary => self.publisher_primary,
            DomainClass::PublisherSecondary => self.publisher_secondary,
            DomainClass::Organisation => self.organisation,
            DomainClass::LowQuality => self.low_quality,
        }
    }

    /// Check every base lies in `[0, 3]` and every signal in `[0, 0.5]`.
    pub fn validate(&self) -> std::result::Result<(), String> {
        let bases = [
            ("institutional", self.institutional),
            ("publisher_primary", self.publisher_primary),
            ("publisher_secondary", self.publisher_secondary),
            ("organisation", self.organisation),
            ("low_quality", self.low_quality),
            ("unclassified", self.unclassified),
            ("malformed_url", self.malformed_url),
        ];
        for (name, value) in bases {
            if !(MIN_SCORE..=MAX_SCORE).contains(&value) {
                return Err(format!("scoring weight {name} must be within 0.0..=3.0"));
            }
        }
        let signals = [
            ("https", self.https),
            ("academic_subdomain", self.academic_subdomain),
            ("doi", self.doi),
            ("scholarly_terms", self.scholarly_terms),
            ("academic_path", self.academic_path),
            ("pdf_format", self.pdf_format),
            ("citation_metadata", self.citation_metadata),
        ];
        for (name, value) in signals {
            if !(0.0..=MAX_SIGNAL).contains(&value) {
                return Err(format!("scoring weight {name} must be within 0.0..=0.5"));
            }
        }
        Ok(())
    }
}

/// Running score that clamps after every adjustment.
struct Tally {
    score: f64,
    reasoning: Vec<ScoreFactor>,
}

impl Tally {
    fn new() -> Self {
        Self {
            score: MIN_SCORE,
            reasoning: Vec::new(),
        }
    }

    fn base(&mut self, label: &str, value: f64) {
        self.apply(label, value, FactorKind::DomainAuthority);
    }

    fn signal(&mut self, label: &str, weight: f64, kind: FactorKind) {
        self.apply(label, weight.clamp(-MAX_SIGNAL, MAX_SIGNAL), kind);
    }

    fn apply(&mut self, label: &str, delta: f64, kind: FactorKind) {
        let next = (self.score + delta).clamp(MIN_SCORE, MAX_SCORE);
        let applied = next - self.score;
        self.score = next;
        self.reasoning.push(ScoreFactor {
            label: label.to_owned(),
            delta: applied,
            kind,
        });
    }

    /// Final score is rounded to one decimal; the tier is read from it.
    fn finish(self) -> CredibilityAssessment {
        let score = (self.score * 10.0).round() / 10.0;
        CredibilityAssessment {
            score,
            tier: CredibilityTier::from_score(score),
            reasoning: self.reasoning,
        }
    }
}

const DOI_PATTERN: &str = r"(?i)\b10\.\d{4,9}/[-._;()/:a-z0-9]+";

const SCHOLARLY_TERMS_PATTERN: &str = r"(?i)\b(peer[- ]reviewed?|journal of|proceedings of|conference proceedings|systematic review|meta-analysis|et al\.)";

const INLINE_CITATION_PATTERN: &str = r"\bISSN:?\s*\d{4}-\d{3}[\dX]\b|\barXiv:\s*\d{4}\.\d{4,5}";

/// Compiled content patterns, built once per process.
struct Patterns {
    doi: Regex,
    scholarly_terms: Regex,
    inline_citation: Regex,
}

fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            Some(Patterns {
                doi: Regex::new(DOI_PATTERN).ok()?,
                scholarly_terms: Regex::new(SCHOLARLY_TERMS_PATTERN).ok()?,
                inline_citation: Regex::new(INLINE_CITATION_PATTERN).ok()?,
            })
        })
        .as_ref()
}

/// Pure, deterministic credibility scorer.
#[derive(Debug, Clone)]
pub struct CredibilityScorer {
    table: AuthorityTable,
    weights: ScoringWeights,
}

impl CredibilityScorer {
    pub fn new(table: AuthorityTable, weights: ScoringWeights) -> Self {
        Self { table, weights }
    }

    /// Scorer using the embedded authority table and default weights.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded table fails to parse.
    pub fn with_defaults() -> Result<Self> {
        Ok(Self::new(AuthorityTable::embedded()?, ScoringWeights::default()))
    }

    /// Scorer from the `[scoring]` config section.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured table cannot be loaded.
    pub fn from_config(config: &ScoringConfig) -> Result<Self> {
        let table = match config.authority_table {
            Some(ref path) => AuthorityTable::from_file(path)?,
            None => AuthorityTable::embedded()?,
        };
        Ok(Self::new(table, config.weights.clone()))
    }

    /// Revision of the authority table in use.
    pub fn table_version(&self) -> &str {
        &self.table.version
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Score a URL, optionally using extracted content.
    ///
    /// Every signal beyond the domain base (HTTPS and subdomain included)
    /// needs an `extraction` that succeeded with non-empty text; otherwise
    /// the assessment is the domain base alone.
    pub fn score(&self, url: &str, extraction: Option<&ExtractionResult>) -> CredibilityAssessment {
        let w = &self.weights;
        let mut tally = Tally::new();

        let parsed = Url::parse(url.trim()).ok();
        let Some((parsed, host)) = parsed.and_then(|u| {
            let host = u.host_str()?.trim_start_matches("www.").to_owned();
            Some((u, host))
        }) else {
            tally.base("unparseable URL", w.malformed_url);
            return tally.finish();
        };

        match self.table.classify(&host) {
            Some(found) => tally.base(found.description, w.base_for(found.class)),
            None => tally.base("unclassified domain", w.unclassified),
        }

        if let Some(extraction) = extraction.filter(|e| e.has_content()) {
            self.content_signals(&mut tally, &parsed, &host, extraction);
        }

        tally.finish()
    }

    fn content_signals(
        &self,
        tally: &mut Tally,
        url: &Url,
        host: &str,
        extraction: &ExtractionResult,
    ) {
        let w = &self.weights;

        if url.scheme() == "https" {
            tally.signal("HTTPS", w.https, FactorKind::Content);
        }
        if host
            .split('.')
            .next()
            .is_some_and(|label| ACADEMIC_SUBDOMAINS.contains(&label))
        {
            tally.signal("academic subdomain", w.academic_subdomain, FactorKind::Content);
        }

        let Some(patterns) = patterns() else {
            tracing::warn!("content patterns unavailable; skipping text signals");
            return;
        };
        let path = url.path().to_ascii_lowercase();
        let text = extraction.text.as_str();

        let doi_in_url = url.host_str().is_some_and(|h| h.ends_with("doi.org"))
            || patterns.doi.is_match(url.as_str());
        if doi_in_url || patterns.doi.is_match(text) {
            tally.signal("DOI identifier", w.doi, FactorKind::Content);
        }

        if patterns.scholarly_terms.is_match(text) {
            tally.signal("scholarly terminology", w.scholarly_terms, FactorKind::Content);
        }

        if path
            .split('/')
            .any(|segment| ACADEMIC_PATH_SEGMENTS.contains(&segment))
        {
            tally.signal("academic content path", w.academic_path, FactorKind::Content);
        }

        if path.ends_with(".pdf") {
            tally.signal("document format", w.pdf_format, FactorKind::Content);
        }

        let has_markers = extraction.metadata_markers.iter().any(|marker| {
            CITATION_MARKER_PREFIXES
                .iter()
                .any(|prefix| marker.starts_with(prefix))
        });
        if has_markers || patterns.inline_citation.is_match(text) {
            tally.signal("citation metadata", w.citation_metadata, FactorKind::Content);
        }
    }
}
