//! history.rs: bounded in-memory log of recent decisions for operators.
//!
//! Lives in the HTTP layer, not in the engine. Stores hashed message ids only.

use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::decision::DecisionResult;
use crate::error::EngineError;

pub const DEFAULT_HISTORY_CAPACITY: usize = 2000;
const MAX_CAPACITY: usize = 10_000;

#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    pub ts: DateTime<Utc>,
    pub message_id: String,
    /// "auto_reply" | "escalated" | "failed"
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Escalation rule labels, or the error class on failure.
    pub reasons: Vec<String>,
}

#[derive(Debug)]
pub struct History {
    inner: Mutex<Vec<HistoryEntry>>,
    cap: usize,
}

impl History {
    pub fn with_capacity(cap: usize) -> Self {
        let cap = cap.clamp(1, MAX_CAPACITY);
        Self {
            inner: Mutex::new(Vec::with_capacity(cap)),
            cap,
        }
    }

    pub fn record_decision(&self, message_id: &str, d: &DecisionResult) {
        self.push(HistoryEntry {
            ts: Utc::now(),
            message_id: message_id.to_string(),
            outcome: d.outcome().to_string(),
            confidence: Some(d.confidence),
            category: d.category.clone(),
            reasons: d
                .escalation_reasons
                .iter()
                .map(|r| r.label().to_string())
                .collect(),
        });
    }

    pub fn record_failure(&self, message_id: &str, e: &EngineError) {
        self.push(HistoryEntry {
            ts: Utc::now(),
            message_id: message_id.to_string(),
            outcome: "failed".to_string(),
            confidence: None,
            category: None,
            reasons: vec![e.kind().to_string()],
        });
    }

    fn push(&self, entry: HistoryEntry) {
        let mut v = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        v.push(entry);
        if v.len() > self.cap {
            let excess = v.len() - self.cap;
            v.drain(0..excess);
        }
    }

    pub fn snapshot_last_n(&self, n: usize) -> Vec<HistoryEntry> {
        let v = self.inner.lock().unwrap_or_else(|p| p.into_inner());
        let start = v.len().saturating_sub(n);
        v[start..].to_vec()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(|p| p.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for History {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }
}
