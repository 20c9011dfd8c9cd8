//! Per-session query history.
//!
//! History is an ordinary value owned by whoever runs the session; there is
//! no process-wide store.

use crate::types::QueryReport;
use std::collections::VecDeque;

/// Default number of reports kept.
pub const DEFAULT_CAPACITY: usize = 20;

/// Bounded list of past query reports, oldest first.
#[derive(Debug, Clone)]
pub struct SessionHistory {
    entries: VecDeque<QueryReport>,
    capacity: usize,
}

impl Default for SessionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl SessionHistory {
    /// History keeping at most `capacity` reports (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a report, evicting the oldest when full.
    pub fn record(&mut self, report: QueryReport) {
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(report);
    }

    /// Reports from oldest to newest.
    pub fn entries(&self) -> impl Iterator<Item = &QueryReport> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&QueryReport> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn report(query: &str) -> QueryReport {
        QueryReport {
            query: query.into(),
            results: Vec::new(),
            started_at: Utc::now(),
            elapsed_ms: 0,
            candidates_discovered: 0,
            events: Vec::new(),
        }
    }

    #[test]
    fn evicts_oldest_at_capacity() {
        let mut history = SessionHistory::new(2);
        history.record(report("a"));
        history.record(report("b"));
        history.record(report("c"));
        let queries: Vec<_> = history.entries().map(|r| r.query.as_str()).collect();
        assert_eq!(queries, vec!["b", "c"]);
        assert_eq!(history.latest().map(|r| r.query.as_str()), Some("c"));
    }

    #[test]
    fn clear_empties_history() {
        let mut history = SessionHistory::default();
        assert_eq!(history.capacity(), DEFAULT_CAPACITY);
        history.record(report("a"));
        assert_eq!(history.len(), 1);
        history.clear();
        assert!(history.is_empty());
        assert!(history.latest().is_none());
    }

    #[test]
    fn zero_capacity_keeps_one() {
        let mut history = SessionHistory::new(0);
        history.record(report("a"));
        history.record(report("b"));
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn separate_sessions_do_not_share_state() {
        let mut first = SessionHistory::default();
        let second = SessionHistory::default();
        first.record(report("a"));
        assert!(second.is_empty());
    }
}
