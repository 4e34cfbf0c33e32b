//! decision.rs: engine output for one inbound message.
//!
//! Shape returned to channel adapters (WhatsApp, Instagram, web chat). The
//! adapter persists it and either dispatches `content` or flags the
//! conversation for human pickup.

use serde::{Deserialize, Serialize};

pub use crate::escalation::EscalationReason;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionResult {
    /// Generated reply; never empty on success.
    pub content: String,
    /// Heuristic reliability in <0.5, 1.0>; not a calibrated probability.
    pub confidence: f32,
    pub should_escalate: bool,
    /// Category of the closest knowledge-base entry, when any word overlaps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Rules that fired; empty exactly when `should_escalate` is false.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub escalation_reasons: Vec<EscalationReason>,
}

impl DecisionResult {
    /// Builds a result whose escalation flag agrees with its reasons.
    pub fn new(
        content: impl Into<String>,
        confidence: f32,
        category: Option<String>,
        escalation_reasons: Vec<EscalationReason>,
    ) -> Self {
        Self {
            content: content.into(),
            confidence: confidence.clamp(0.0, 1.0),
            should_escalate: !escalation_reasons.is_empty(),
            category,
            escalation_reasons,
        }
    }

    /// "escalated" | "auto_reply", used in logs and decision history.
    pub fn outcome(&self) -> &'static str {
        if self.should_escalate {
            "escalated"
        } else {
            "auto_reply"
        }
    }
}
