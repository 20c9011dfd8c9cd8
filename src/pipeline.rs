//! Parallel analysis pipeline.
//!
//! A fixed pool of worker tasks claims candidate indices from a shared
//! atomic cursor over an immutable candidate slice. Each worker runs
//! extract → score → summarise for one candidate at a time and sends the
//! result back tagged with its index, so the output order always matches the
//! input order. A worker that panics is replaced while work remains; the
//! candidate it was holding is reported as a failed extraction.

use crate::extractor::ContentExtractor;
use crate::scorer::CredibilityScorer;
use crate::summarize::Summarizer;
use crate::types::{AnalyzedSource, ExtractionResult, SourceCandidate};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinSet;

/// Error detail recorded for candidates whose worker aborted.
pub const ABORTED_DETAIL: &str = "analysis aborted before completion";

/// Shared, read-only state handed to every worker.
#[derive(Clone)]
struct Stages {
    extractor: Arc<ContentExtractor>,
    scorer: Arc<CredibilityScorer>,
    summarizer: Option<Arc<dyn Summarizer>>,
}

/// Fans extraction, scoring and summarisation out over a worker pool.
#[derive(Clone)]
pub struct AnalysisPipeline {
    stages: Stages,
    workers: usize,
}

impl AnalysisPipeline {
    pub fn new(
        extractor: Arc<ContentExtractor>,
        scorer: Arc<CredibilityScorer>,
        workers: usize,
    ) -> Self {
        Self {
            stages: Stages {
                extractor,
                scorer,
                summarizer: None,
            },
            workers,
        }
    }

    /// Summarise every successfully extracted source.
    pub fn with_summarizer(mut self, summarizer: Arc<dyn Summarizer>) -> Self {
        self.stages.summarizer = Some(summarizer);
        self
    }

    pub fn scorer(&self) -> &CredibilityScorer {
        &self.stages.scorer
    }

    /// Analyse every candidate. Returns exactly one result per input, in
    /// input order.
    pub async fn analyze(&self, candidates: Vec<SourceCandidate>) -> Vec<AnalyzedSource> {
        if candidates.is_empty() {
            return Vec::new();
        }

        let candidates: Arc<[SourceCandidate]> = candidates.into();
        let cursor = Arc::new(AtomicUsize::new(0));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let pool_size = self.workers.clamp(1, candidates.len());

        tracing::debug!(
            candidates = candidates.len(),
            workers = pool_size,
            "starting analysis"
        );

        let mut workers = JoinSet::new();
        for _ in 0..pool_size {
            workers.spawn(run_worker(
                self.stages.clone(),
                Arc::clone(&candidates),
                Arc::clone(&cursor),
                tx.clone(),
            ));
        }

        while let Some(joined) = workers.join_next().await {
            if let Err(e) = joined {
                tracing::warn!(error = %e, "analysis worker aborted");
                if cursor.load(Ordering::SeqCst) < candidates.len() {
                    workers.spawn(run_worker(
                        self.stages.clone(),
                        Arc::clone(&candidates),
                        Arc::clone(&cursor),
                        tx.clone(),
                    ));
                }
            }
        }
        drop(tx);

        let mut slots: Vec<Option<AnalyzedSource>> = vec![None; candidates.len()];
        while let Some((index, analyzed)) = rx.recv().await {
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(analyzed);
            }
        }

        slots
            .into_iter()
            .zip(candidates.iter())
            .map(|(slot, candidate)| {
                slot.unwrap_or_else(|| aborted_source(candidate, &self.stages.scorer))
            })
            .collect()
    }
}

async fn run_worker(
    stages: Stages,
    candidates: Arc<[SourceCandidate]>,
    cursor: Arc<AtomicUsize>,
    results: mpsc::UnboundedSender<(usize, AnalyzedSource)>,
) {
    loop {
        let index = cursor.fetch_add(1, Ordering::SeqCst);
        let Some(candidate) = candidates.get(index) else {
            break;
        };
        let analyzed = analyze_one(&stages, candidate).await;
        if results.send((index, analyzed)).is_err() {
            break;
        }
    }
}

async fn analyze_one(stages: &Stages, candidate: &SourceCandidate) -> AnalyzedSource {
    let extraction = stages.extractor.extract(&candidate.url).await;
    let assessment = stages.scorer.score(&candidate.url, Some(&extraction));

    let summary = match stages.summarizer {
        Some(ref summarizer) if extraction.has_content() => {
            let title = extraction.title.as_deref().unwrap_or_default();
            match summarizer.summarize(title, &extraction.text).await {
                Ok(summary) => Some(summary),
                Err(e) => {
                    tracing::warn!(url = %candidate.url, error = %e, "summary unavailable");
                    None
                }
            }
        }
        _ => None,
    };

    tracing::debug!(
        url = %candidate.url,
        status = %extraction.status,
        score = assessment.score,
        "source analysed"
    );

    AnalyzedSource {
        candidate: candidate.clone(),
        extraction,
        assessment,
        summary,
    }
}

fn aborted_source(candidate: &SourceCandidate, scorer: &CredibilityScorer) -> AnalyzedSource {
    AnalyzedSource {
        candidate: candidate.clone(),
        extraction: ExtractionResult::failed(
            &candidate.url,
            Some(crate::extractor::fallback_title(&candidate.url)),
            ABORTED_DETAIL,
        ),
        assessment: scorer.score(&candidate.url, None),
        summary: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ExtractionConfig;
    use crate::error::{CredenceError, Result};
    use crate::extractor::PageFetcher;
    use crate::types::{ExtractionStatus, QueryFormulation};
    use async_trait::async_trait;
    use std::time::Duration;

    /// Serves a page for every URL; pages containing `slow` take a while.
    struct PageServer;

    #[async_trait]
    impl PageFetcher for PageServer {
        async fn fetch(&self, url: &str) -> Result<String> {
            if url.contains("slow") {
                tokio::time::sleep(Duration::from_millis(40)).await;
            }
            if url.contains("broken") {
                return Err(CredenceError::Fetch("connection reset".into()));
            }
            Ok(format!(
                "<html><head><title>Page at {url}</title></head>\
                 <body><p>Peer-reviewed findings for {url}.</p></body></html>"
            ))
        }
    }

    struct EchoSummarizer;

    #[async_trait]
    impl Summarizer for EchoSummarizer {
        async fn summarize(&self, title: &str, _text: &str) -> Result<String> {
            Ok(format!("About {title}"))
        }
    }

    struct FailingSummarizer;

    #[async_trait]
    impl Summarizer for FailingSummarizer {
        async fn summarize(&self, _title: &str, _text: &str) -> Result<String> {
            Err(CredenceError::Summary("quota exceeded".into()))
        }
    }

    fn candidates(urls: &[&str]) -> Vec<SourceCandidate> {
        urls.iter()
            .enumerate()
            .map(|(position, url)| SourceCandidate {
                url: (*url).to_owned(),
                discovered_via: QueryFormulation::Plain,
                position,
                search_title: None,
            })
            .collect()
    }

    fn pipeline(workers: usize) -> AnalysisPipeline {
        let extractor = ContentExtractor::new(Arc::new(PageServer), &ExtractionConfig::default());
        let scorer = CredibilityScorer::with_defaults().expect("scorer");
        AnalysisPipeline::new(Arc::new(extractor), Arc::new(scorer), workers)
    }

    #[tokio::test]
    async fn output_order_matches_input_order() {
        let input = candidates(&[
            "https://slow.example.edu/a",
            "https://fast.example.org/b",
            "https://slow.example.gov/c",
            "https://fast.example.com/d",
            "https://fast.example.com/e",
        ]);
        let output = pipeline(3).analyze(input.clone()).await;
        let urls: Vec<_> = output.iter().map(|a| a.candidate.url.as_str()).collect();
        let expected: Vec<_> = input.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, expected);
        assert!(output.iter().all(|a| a.extraction.status == ExtractionStatus::Ok));
    }

    #[tokio::test]
    async fn empty_input_is_empty_output() {
        assert!(pipeline(4).analyze(Vec::new()).await.is_empty());
    }

    #[tokio::test]
    async fn failed_extraction_still_scored_from_domain() {
        let output = pipeline(2)
            .analyze(candidates(&["https://broken.mit.edu/x", "https://ok.mit.edu/y"]))
            .await;
        assert_eq!(output.len(), 2);
        let broken = &output[0];
        assert_eq!(broken.extraction.status, ExtractionStatus::Failed);
        assert!(broken.assessment.is_domain_only());
        assert!(broken.assessment.score > 0.0);
        assert!(!output[1].assessment.is_domain_only());
    }

    #[tokio::test]
    async fn summaries_only_for_ok_extractions() {
        let output = pipeline(2)
            .with_summarizer(Arc::new(EchoSummarizer))
            .analyze(candidates(&["https://broken.a.org/x", "https://a.org/y"]))
            .await;
        assert_eq!(output[0].summary, None);
        assert_eq!(
            output[1].summary.as_deref(),
            Some("About Page at https://a.org/y")
        );
    }

    #[tokio::test]
    async fn summary_failure_leaves_score_untouched() {
        let input = candidates(&["https://a.org/y"]);
        let plain = pipeline(1).analyze(input.clone()).await;
        let failing = pipeline(1)
            .with_summarizer(Arc::new(FailingSummarizer))
            .analyze(input)
            .await;
        assert_eq!(failing[0].summary, None);
        assert_eq!(failing[0].assessment, plain[0].assessment);
    }

    #[tokio::test]
    async fn more_workers_than_candidates() {
        let output = pipeline(16).analyze(candidates(&["https://a.org/1"])).await;
        assert_eq!(output.len(), 1);
    }
}
