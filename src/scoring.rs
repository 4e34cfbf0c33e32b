//! # Confidence Scorer
//! Deterministic, additive score for a generated reply.
//!
//! | condition                          | adjustment |
//! |------------------------------------|------------|
//! | base                               | 0.5        |
//! | reply longer than 50 chars         | +0.2       |
//! | reply longer than 100 chars        | +0.1       |
//! | at least one similar entry (> 0.7) | +0.2       |
//! | more than 2 similar entries        | +0.1       |
//!
//! The sum is capped at 1.0. Length is counted in chars, not bytes.

use crate::knowledge::{rank, TrainingEntry};

pub const BASE_CONFIDENCE: f32 = 0.5;
pub const MAX_CONFIDENCE: f32 = 1.0;

/// Score `response_text` against the knowledge matches for `message`.
pub fn score(response_text: &str, entries: &[TrainingEntry], message: &str) -> f32 {
    score_with_matches(response_text, rank(message, entries).len())
}

/// Same rule set when the similar-entry count is already known.
pub fn score_with_matches(response_text: &str, similar_entries: usize) -> f32 {
    let len = response_text.chars().count();

    let mut confidence = BASE_CONFIDENCE;
    if len > 50 {
        confidence += 0.2;
    }
    if len > 100 {
        confidence += 0.1;
    }
    if similar_entries > 0 {
        confidence += 0.2;
    }
    if similar_entries > 2 {
        confidence += 0.1;
    }
    confidence.min(MAX_CONFIDENCE)
}
