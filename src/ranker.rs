//! Final ordering of analysed sources.

use crate::types::{AnalyzedSource, RankedSource};

/// Sort by score descending, assign ranks 1..N and keep the first `top_k`.
///
/// Equal scores keep discovery order (lower `position` first).
pub fn rank(mut sources: Vec<AnalyzedSource>, top_k: Option<usize>) -> Vec<RankedSource> {
    sources.sort_by_key(|source| source.candidate.position);
    sources.sort_by(|a, b| b.assessment.score.total_cmp(&a.assessment.score));

    if let Some(k) = top_k {
        sources.truncate(k);
    }

    sources
        .into_iter()
        .enumerate()
        .map(|(index, source)| RankedSource {
            rank: index + 1,
            candidate: source.candidate,
            extraction: source.extraction,
            assessment: source.assessment,
            summary: source.summary,
        })
        .collect()
}
