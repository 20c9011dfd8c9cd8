//! Result deduplication by normalised URL.
//!
//! Merges results that refer to the same page, keeps the highest-scored
//! entry per page, and records every engine that returned it so the
//! scoring module can apply a cross-engine boost.

use std::collections::HashMap;

use crate::types::{SearchEngine, SearchResult};

use super::url_normalize::normalize_url;

/// A search result after deduplication.
#[derive(Debug, Clone)]
pub struct DeduplicatedResult {
    /// The best (highest-scored) result for this URL.
    pub result: SearchResult,
    /// Every engine that returned this URL, in first-seen order.
    pub engines: Vec<SearchEngine>,
}

/// Deduplicate search results by normalised URL.
///
/// Output order is the order in which each distinct URL was first seen,
/// which keeps the merge deterministic for identical inputs. On a score
/// tie the earlier entry is kept.
pub fn deduplicate(results: Vec<SearchResult>) -> Vec<DeduplicatedResult> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<DeduplicatedResult> = Vec::new();

    for result in results {
        let key = normalize_url(&result.url);
        let engine = SearchEngine::from_name(&result.engine);

        match index.get(&key) {
            Some(&slot) => {
                let entry = &mut merged[slot];
                if let Some(eng) = engine {
                    if !entry.engines.contains(&eng) {
                        entry.engines.push(eng);
                    }
                }
                if result.score > entry.result.score {
                    entry.result = result;
                }
            }
            None => {
                index.insert(key, merged.len());
                merged.push(DeduplicatedResult {
                    result,
                    engines: engine.into_iter().collect(),
                });
            }
        }
    }

    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(url: &str, engine: &str, score: f64) -> SearchResult {
        SearchResult {
            title: format!("Title from {engine}"),
            url: url.to_string(),
            snippet: format!("Snippet from {engine}"),
            engine: engine.to_string(),
            score,
        }
    }

    #[test]
    fn unique_urls_pass_through_in_order() {
        let deduped = deduplicate(vec![
            make_result("https://b.org", "Bing", 0.8),
            make_result("https://a.org", "DuckDuckGo", 1.0),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].result.url, "https://b.org");
        assert_eq!(deduped[1].result.url, "https://a.org");
    }

    #[test]
    fn highest_score_kept_and_engines_tracked() {
        let deduped = deduplicate(vec![
            make_result("https://example.edu/p", "Bing", 0.5),
            make_result("https://example.edu/p/", "DuckDuckGo", 1.0),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].result.engine, "DuckDuckGo");
        assert_eq!(
            deduped[0].engines,
            vec![SearchEngine::Bing, SearchEngine::DuckDuckGo]
        );
    }

    #[test]
    fn tie_keeps_first_seen() {
        let deduped = deduplicate(vec![
            make_result("https://example.edu/p", "Bing", 1.0),
            make_result("https://example.edu/p", "DuckDuckGo", 1.0),
        ]);
        assert_eq!(deduped[0].result.engine, "Bing");
    }

    #[test]
    fn query_strings_do_not_split_pages() {
        let deduped = deduplicate(vec![
            make_result("https://example.com/page?q=rust", "DuckDuckGo", 1.0),
            make_result("https://example.com/page?utm_source=x", "Bing", 0.9),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].engines.len(), 2);
    }

    #[test]
    fn same_engine_listed_once_unknown_engine_ignored() {
        let deduped = deduplicate(vec![
            make_result("https://example.com", "DuckDuckGo", 1.0),
            make_result("https://example.com", "DuckDuckGo", 0.9),
            make_result("https://example.com", "AltaVista", 0.1),
        ]);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].engines, vec![SearchEngine::DuckDuckGo]);
    }

    #[test]
    fn empty_input_returns_empty() {
        assert!(deduplicate(vec![]).is_empty());
    }
}
