//! # Knowledge Base Matcher
//! Lexical similarity between an inbound message and the trained questions.
//!
//! Similarity is word-overlap (Jaccard) over lower-cased, whitespace-separated
//! tokens. No stemming, no stopword removal. Ties keep the caller's entry order.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Entries scoring strictly above this are "similar".
pub const SIMILARITY_THRESHOLD: f32 = 0.7;

/// One knowledge-base fact used to ground generated replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingEntry {
    pub category: String,
    pub question: String,
    pub answer: String,
    /// Free-form supplementary text folded into the prompt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl TrainingEntry {
    pub fn new(
        category: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            category: category.into(),
            question: question.into(),
            answer: answer.into(),
            context: None,
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }
}

/// An entry paired with its similarity against the inbound message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredEntry<'a> {
    pub entry: &'a TrainingEntry,
    pub score: f32,
}

fn token_set(input: &str) -> HashSet<String> {
    input.split_whitespace().map(str::to_lowercase).collect()
}

/// Jaccard similarity in [0, 1]. Two token-less inputs score 0.0.
pub fn similarity(a: &str, b: &str) -> f32 {
    let wa = token_set(a);
    let wb = token_set(b);

    let union = wa.union(&wb).count();
    if union == 0 {
        return 0.0;
    }
    let inter = wa.intersection(&wb).count();
    inter as f32 / union as f32
}

/// Every entry with its score, best first. `sort_by` is stable, so equal
/// scores keep their original order.
pub fn score_all<'a>(message: &str, entries: &'a [TrainingEntry]) -> Vec<ScoredEntry<'a>> {
    let mut scored = entries
        .iter()
        .map(|entry| ScoredEntry {
            entry,
            score: similarity(message, &entry.question),
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));
    scored
}

/// Entries whose similarity exceeds [`SIMILARITY_THRESHOLD`], best first.
pub fn rank<'a>(message: &str, entries: &'a [TrainingEntry]) -> Vec<ScoredEntry<'a>> {
    score_all(message, entries)
        .into_iter()
        .filter(|s| s.score > SIMILARITY_THRESHOLD)
        .collect()
}

/// Category of the closest entry sharing at least one word with the message.
pub fn best_category(message: &str, entries: &[TrainingEntry]) -> Option<String> {
    score_all(message, entries)
        .into_iter()
        .find(|s| s.score > 0.0)
        .map(|s| s.entry.category.clone())
}
