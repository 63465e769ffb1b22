//! # Result Ranker
//! Pure, testable logic that orders a merged topic list. No I/O; suitable for
//! unit tests and offline evaluation.
//!
//! This is the only place cross-source comparability is asserted, and it is
//! explicitly approximate: scores are per-source heuristics, not calibrated
//! against each other. Callers must treat the order as best effort.

use crate::topic::Topic;

/// Sort descending by score and truncate to `cap`.
///
/// The sort is stable: equal scores keep their insertion order, which makes
/// the final merge order deterministic for a given accumulator.
pub fn rank(mut topics: Vec<Topic>, cap: usize) -> Vec<Topic> {
    topics.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    topics.truncate(cap);
    topics
}
