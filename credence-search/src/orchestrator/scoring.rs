//! Weighted position-decay scoring for merged search results.
//!
//! `score = engine_weight / (1.0 + position * 0.1)`, then multiplied by
//! `1.0 + 0.2 * (engines - 1)` when several engines returned the same page.

use crate::types::{SearchEngine, SearchResult};

/// Decay applied per result position.
const POSITION_DECAY: f64 = 0.1;

/// Extra weight for each additional engine that returned a URL.
const CROSS_ENGINE_STEP: f64 = 0.2;

/// Score one result from its engine weight and zero-based position.
/// Unknown engine names get weight 1.0.
pub fn calculate_score(result: &SearchResult, position: usize) -> f64 {
    let weight = SearchEngine::from_name(&result.engine).map_or(1.0, |engine| engine.weight());
    weight / (1.0 + position as f64 * POSITION_DECAY)
}

/// Score a single engine's result list in place of its existing scores.
pub fn score_results(mut results: Vec<SearchResult>) -> Vec<SearchResult> {
    for (position, result) in results.iter_mut().enumerate() {
        result.score = calculate_score(result, position);
    }
    results
}

/// Boost a score by the number of engines that agreed on the URL.
pub fn apply_cross_engine_boost(score: f64, engine_count: usize) -> f64 {
    let extra = engine_count.saturating_sub(1) as f64;
    score * (1.0 + CROSS_ENGINE_STEP * extra)
}
