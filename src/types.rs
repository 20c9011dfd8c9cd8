//! Core data model shared by discovery, analysis and ranking.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One rewritten form of the user's query sent to the search backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryFormulation {
    /// `"<query>" academic research`
    ExactPhrase,
    /// `<query> site:.edu OR site:.gov`
    Institutional,
    /// `<query> filetype:pdf academic`
    ScholarlyPdf,
    /// The query as typed.
    Plain,
}

impl QueryFormulation {
    /// The formulations issued when none are configured.
    pub const DEFAULT_SET: [QueryFormulation; 3] =
        [Self::ExactPhrase, Self::Institutional, Self::Plain];

    /// Render the search string for `query`.
    pub fn render(self, query: &str) -> String {
        let query = query.trim();
        match self {
            Self::ExactPhrase => format!("\"{query}\" academic research"),
            Self::Institutional => format!("{query} site:.edu OR site:.gov"),
            Self::ScholarlyPdf => format!("{query} filetype:pdf academic"),
            Self::Plain => query.to_owned(),
        }
    }

    /// Stable snake_case name, as written in config files.
    pub fn name(self) -> &'static str {
        match self {
            Self::ExactPhrase => "exact_phrase",
            Self::Institutional => "institutional",
            Self::ScholarlyPdf => "scholarly_pdf",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for QueryFormulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A URL found during discovery. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCandidate {
    /// The URL as returned by the search backend.
    pub url: String,
    /// Formulation whose results first contained this URL.
    pub discovered_via: QueryFormulation,
    /// Zero-based discovery order; the ranking tie-break key.
    pub position: usize,
    /// Title reported by the search engine, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_title: Option<String>,
}

/// Outcome of a content extraction attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionStatus {
    /// Text was extracted.
    Ok,
    /// Fetching or parsing failed.
    Failed,
    /// The per-URL time budget ran out.
    TimedOut,
}

impl fmt::Display for ExtractionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Ok => "ok",
            Self::Failed => "failed",
            Self::TimedOut => "timed_out",
        })
    }
}

/// Text and title extracted from one candidate page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// The URL that was extracted.
    pub url: String,
    /// Best-effort title. Always present for results built by the extractor.
    pub title: Option<String>,
    /// Cleaned text, possibly truncated. Empty unless `status` is `Ok`.
    pub text: String,
    /// Whether extraction succeeded.
    pub status: ExtractionStatus,
    /// Why extraction did not succeed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_detail: Option<String>,
    /// Words in the full extracted text, before truncation.
    pub word_count: usize,
    /// Citation metadata markers found in the markup.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub metadata_markers: Vec<String>,
}

impl ExtractionResult {
    /// A failed extraction with a title and a reason.
    pub fn failed(url: &str, title: Option<String>, detail: impl Into<String>) -> Self {
        Self {
            url: url.to_owned(),
            title,
            text: String::new(),
            status: ExtractionStatus::Failed,
            error_detail: Some(detail.into()),
            word_count: 0,
            metadata_markers: Vec::new(),
        }
    }

    /// An extraction abandoned when its time budget ran out.
    pub fn timed_out(url: &str, title: Option<String>, detail: impl Into<String>) -> Self {
        Self {
            status: ExtractionStatus::TimedOut,
            ..Self::failed(url, title, detail)
        }
    }

    /// `true` when the status is `Ok` and there is text to inspect.
    pub fn has_content(&self) -> bool {
        self.status == ExtractionStatus::Ok && !self.text.trim().is_empty()
    }
}

/// Coarse credibility band derived from the numeric score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredibilityTier {
    /// Score of 2.5 or more.
    High,
    /// Score of 1.5 or more.
    Medium,
    /// Everything else.
    Low,
}

impl CredibilityTier {
    /// Lower bound of the high tier.
    pub const HIGH_THRESHOLD: f64 = 2.5;
    /// Lower bound of the medium tier.
    pub const MEDIUM_THRESHOLD: f64 = 1.5;

    /// Band for a score.
    pub fn from_score(score: f64) -> Self {
        if score >= Self::HIGH_THRESHOLD {
            Self::High
        } else if score >= Self::MEDIUM_THRESHOLD {
            Self::Medium
        } else {
            Self::Low
        }
    }

    /// Capitalised label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::High => "High",
            Self::Medium => "Medium",
            Self::Low => "Low",
        }
    }
}

impl fmt::Display for CredibilityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Where a score factor came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FactorKind {
    /// Derived from the URL alone.
    DomainAuthority,
    /// Derived from extracted page content.
    Content,
}

/// One signed contribution to a credibility score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreFactor {
    /// Human-readable name, e.g. `"edu domain"`.
    pub label: String,
    /// Applied change to the score, after clamping.
    pub delta: f64,
    /// Source of the signal.
    pub kind: FactorKind,
}

impl fmt::Display for ScoreFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:+.1}", self.label, self.delta)
    }
}

/// Bounded credibility score with its reasoning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredibilityAssessment {
    /// Score in `[0, 3]`.
    pub score: f64,
    /// Band derived from `score`.
    pub tier: CredibilityTier,
    /// Factors in evaluation order.
    pub reasoning: Vec<ScoreFactor>,
}

impl CredibilityAssessment {
    /// One-line explanation, e.g. `High credibility (2.7/3.0): edu domain, HTTPS`.
    pub fn summary_line(&self) -> String {
        let reasons = if self.reasoning.is_empty() {
            "standard web source".to_owned()
        } else {
            self.reasoning
                .iter()
                .map(|factor| factor.label.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "{} credibility ({:.1}/3.0): {reasons}",
            self.tier, self.score
        )
    }

    /// `true` when no factor came from page content.
    pub fn is_domain_only(&self) -> bool {
        self.reasoning
            .iter()
            .all(|factor| factor.kind == FactorKind::DomainAuthority)
    }
}

/// Pipeline output for one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedSource {
    pub candidate: SourceCandidate,
    pub extraction: ExtractionResult,
    pub assessment: CredibilityAssessment,
    pub summary: Option<String>,
}

/// A source with its position in the final ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSource {
    /// 1-based rank, contiguous across a result list.
    pub rank: usize,
    pub candidate: SourceCandidate,
    pub extraction: ExtractionResult,
    pub assessment: CredibilityAssessment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl RankedSource {
    /// Title for display: extracted, then search engine, then the URL.
    pub fn display_title(&self) -> &str {
        self.extraction
            .title
            .as_deref()
            .or(self.candidate.search_title.as_deref())
            .unwrap_or(&self.candidate.url)
    }
}

/// Everything produced by one query run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryReport {
    /// The query as submitted.
    pub query: String,
    /// Ranked sources, best first.
    pub results: Vec<RankedSource>,
    /// When the run started.
    pub started_at: DateTime<Utc>,
    /// Wall-clock duration of the run.
    pub elapsed_ms: u64,
    /// Unique URLs returned by discovery, before top-K truncation.
    pub candidates_discovered: usize,
    /// Timestamped progress log.
    pub events: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formulations_render_search_strings() {
        let q = "  soil microbiome ";
        assert_eq!(
            QueryFormulation::ExactPhrase.render(q),
            "\"soil microbiome\" academic research"
        );
        assert_eq!(
            QueryFormulation::Institutional.render(q),
            "soil microbiome site:.edu OR site:.gov"
        );
        assert_eq!(
            QueryFormulation::ScholarlyPdf.render(q),
            "soil microbiome filetype:pdf academic"
        );
        assert_eq!(QueryFormulation::Plain.render(q), "soil microbiome");
    }

    #[test]
    fn formulation_names_match_serde() {
        for formulation in [
            QueryFormulation::ExactPhrase,
            QueryFormulation::Institutional,
            QueryFormulation::ScholarlyPdf,
            QueryFormulation::Plain,
        ] {
            let json = serde_json::to_string(&formulation).expect("serialize");
            assert_eq!(json, format!("\"{}\"", formulation.name()));
        }
    }

    #[test]
    fn tier_thresholds() {
        assert_eq!(CredibilityTier::from_score(3.0), CredibilityTier::High);
        assert_eq!(CredibilityTier::from_score(2.5), CredibilityTier::High);
        assert_eq!(CredibilityTier::from_score(2.49), CredibilityTier::Medium);
        assert_eq!(CredibilityTier::from_score(1.5), CredibilityTier::Medium);
        assert_eq!(CredibilityTier::from_score(1.49), CredibilityTier::Low);
        assert_eq!(CredibilityTier::from_score(0.0), CredibilityTier::Low);
    }

    #[test]
    fn factor_renders_signed_delta() {
        let factor = ScoreFactor {
            label: "edu domain".into(),
            delta: 1.5,
            kind: FactorKind::DomainAuthority,
        };
        assert_eq!(factor.to_string(), "edu domain: +1.5");

        let negative = ScoreFactor {
            label: "low quality".into(),
            delta: -0.2,
            kind: FactorKind::Content,
        };
        assert_eq!(negative.to_string(), "low quality: -0.2");
    }

    #[test]
    fn summary_line_lists_factor_labels() {
        let assessment = CredibilityAssessment {
            score: 2.7,
            tier: CredibilityTier::High,
            reasoning: vec![
                ScoreFactor {
                    label: "edu domain".into(),
                    delta: 2.0,
                    kind: FactorKind::DomainAuthority,
                },
                ScoreFactor {
                    label: "HTTPS".into(),
                    delta: 0.1,
                    kind: FactorKind::Content,
                },
            ],
        };
        assert_eq!(
            assessment.summary_line(),
            "High credibility (2.7/3.0): edu domain, HTTPS"
        );
        assert!(!assessment.is_domain_only());
    }

    #[test]
    fn timed_out_result_has_no_text() {
        let result = ExtractionResult::timed_out("https://a.org", None, "8s elapsed");
        assert_eq!(result.status, ExtractionStatus::TimedOut);
        assert!(result.text.is_empty());
        assert!(!result.has_content());
        assert_eq!(result.error_detail.as_deref(), Some("8s elapsed"));
    }
}
