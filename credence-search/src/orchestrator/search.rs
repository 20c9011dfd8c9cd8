//! Core search orchestrator: concurrent multi-engine fan-out, dedup, score, rank.

use std::time::Duration;

use rand::Rng;

use crate::config::SearchConfig;
use crate::engine::SearchEngineTrait;
use crate::engines::{BingEngine, DuckDuckGoEngine};
use crate::error::SearchError;
use crate::types::{SearchEngine, SearchResult};

use super::dedup::deduplicate;
use super::scoring::{apply_cross_engine_boost, score_results};

/// Orchestrate a concurrent search across all enabled engines.
///
/// Each engine request starts after a random delay drawn from
/// `config.request_delay_ms`; all requests are joined before merging.
///
/// # Errors
///
/// Returns [`SearchError::AllEnginesFailed`] only if **every** enabled engine
/// fails. Engines that succeed with zero hits are not failures.
pub async fn orchestrate_search(
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>, SearchError> {
    let futures: Vec<_> = config
        .engines
        .iter()
        .map(|engine| {
            let eng = *engine;
            let delay = jitter(config.request_delay_ms);
            async move {
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                (eng, query_engine(eng, query, config).await)
            }
        })
        .collect();

    let outcomes = futures::future::join_all(futures).await;
    merge_engine_results(outcomes, config.max_results)
}

/// Merge per-engine outcomes into one ranked, deduplicated list.
///
/// Scores each engine's list by position, deduplicates by normalised URL,
/// boosts URLs several engines agree on, sorts by score (stable, so ties
/// keep first-seen order) and truncates to `max_results`.
///
/// # Errors
///
/// Returns [`SearchError::AllEnginesFailed`] when there was at least one
/// outcome and every outcome is an error.
pub fn merge_engine_results(
    outcomes: Vec<(SearchEngine, Result<Vec<SearchResult>, SearchError>)>,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    let mut all_results: Vec<SearchResult> = Vec::new();
    let mut errors: Vec<String> = Vec::new();
    let mut any_succeeded = false;

    for (engine, outcome) in outcomes {
        match outcome {
            Ok(engine_results) => {
                any_succeeded = true;
                tracing::debug!(%engine, count = engine_results.len(), "engine returned results");
                all_results.extend(score_results(engine_results));
            }
            Err(err) => {
                tracing::warn!(engine = %engine, error = %err, "engine query failed");
                errors.push(format!("{engine}: {err}"));
            }
        }
    }

    if !any_succeeded && !errors.is_empty() {
        return Err(SearchError::AllEnginesFailed(errors.join("; ")));
    }

    let mut merged: Vec<SearchResult> = deduplicate(all_results)
        .into_iter()
        .map(|dr| {
            let mut result = dr.result;
            result.score = apply_cross_engine_boost(result.score, dr.engines.len());
            result
        })
        .collect();

    merged.sort_by(|a, b| b.score.total_cmp(&a.score));
    merged.truncate(max_results);
    Ok(merged)
}

async fn query_engine(
    engine: SearchEngine,
    query: &str,
    config: &SearchConfig,
) -> Result<Vec<SearchResult>, SearchError> {
    match engine {
        SearchEngine::DuckDuckGo => DuckDuckGoEngine.search(query, config).await,
        SearchEngine::Bing => BingEngine.search(query, config).await,
    }
}

fn jitter((min, max): (u64, u64)) -> Duration {
    if max == 0 || min >= max {
        return Duration::from_millis(min);
    }
    Duration::from_millis(rand::thread_rng().gen_range(min..=max))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(url: &str, engine: SearchEngine) -> SearchResult {
        SearchResult {
            title: format!("Title from {engine}"),
            url: url.to_string(),
            snippet: String::new(),
            engine: engine.name().to_string(),
            score: 0.0,
        }
    }

    #[test]
    fn jitter_stays_in_range() {
        for _ in 0..50 {
            let d = jitter((10, 20)).as_millis();
            assert!((10..=20).contains(&d));
        }
        assert!(jitter((0, 0)).is_zero());
    }

    #[test]
    fn agreement_between_engines_wins() {
        let outcomes = vec![
            (
                SearchEngine::DuckDuckGo,
                Ok(vec![
                    make_result("https://ddg-only.org", SearchEngine::DuckDuckGo),
                    make_result("https://shared.edu/a", SearchEngine::DuckDuckGo),
                ]),
            ),
            (
                SearchEngine::Bing,
                Ok(vec![make_result("https://shared.edu/a/", SearchEngine::Bing)]),
            ),
        ];
        let merged = merge_engine_results(outcomes, 10).expect("merge");
        assert_eq!(merged.len(), 2);
        // DDG position 1 = 1/1.1 ≈ 0.909; boosted 1.2x ≈ 1.09 beats DDG position 0 = 1.0.
        assert_eq!(merged[0].url, "https://shared.edu/a");
        assert!(merged[0].score > 1.0);
    }

    #[test]
    fn partial_failure_keeps_successful_results() {
        let outcomes = vec![
            (SearchEngine::DuckDuckGo, Err(SearchError::Http("blocked".into()))),
            (
                SearchEngine::Bing,
                Ok(vec![make_result("https://a.org", SearchEngine::Bing)]),
            ),
        ];
        let merged = merge_engine_results(outcomes, 10).expect("merge");
        assert_eq!(merged.len(), 1);
    }

    #[test]
    fn all_failures_reported_together() {
        let outcomes = vec![
            (SearchEngine::DuckDuckGo, Err(SearchError::Http("blocked".into()))),
            (SearchEngine::Bing, Err(SearchError::Timeout("8s".into()))),
        ];
        let err = merge_engine_results(outcomes, 10).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("DuckDuckGo") && msg.contains("Bing"));
    }

    #[test]
    fn empty_success_is_not_failure() {
        let outcomes = vec![
            (SearchEngine::DuckDuckGo, Ok(vec![])),
            (SearchEngine::Bing, Err(SearchError::Http("blocked".into()))),
        ];
        assert!(merge_engine_results(outcomes, 10).expect("merge").is_empty());
    }

    #[test]
    fn truncates_to_max_results() {
        let results: Vec<SearchResult> = (0..20)
            .map(|i| make_result(&format!("https://site{i}.org"), SearchEngine::DuckDuckGo))
            .collect();
        let merged =
            merge_engine_results(vec![(SearchEngine::DuckDuckGo, Ok(results))], 5).expect("merge");
        assert_eq!(merged.len(), 5);
        assert_eq!(merged[0].url, "https://site0.org");
    }
}
