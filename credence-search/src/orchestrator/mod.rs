//! Search orchestrator: concurrent engine queries, dedup, scoring, ranking.

pub mod dedup;
pub mod scoring;
pub mod search;
pub mod url_normalize;
