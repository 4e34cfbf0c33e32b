//! # Escalation Classifier
//! Pure predicate deciding whether a conversation goes to a human operator.
//!
//! Any of these escalates:
//! 1. `confidence < 0.6`
//! 2. the customer message contains a handoff/dissatisfaction phrase
//! 3. the generated reply contains an uncertainty phrase
//!
//! Phrase matching is case-insensitive substring matching, not intent detection:
//! "não entendi a piada" escalates through the "não entendi" phrase. This is a
//! known limitation and is kept as is.

use serde::{Deserialize, Serialize};

/// Replies scoring below this are never auto-sent.
pub const ESCALATION_CONFIDENCE_FLOOR: f32 = 0.6;

pub const DEFAULT_CUSTOMER_PHRASES: &[&str] = &[
    "falar com atendente",
    "quero falar com humano",
    "transferir para pessoa",
    "não entendi",
    "isso não resolve",
    "quero cancelar",
    "problema urgente",
];

pub const DEFAULT_RESPONSE_PHRASES: &[&str] = &[
    "não tenho certeza",
    "não sei",
    "talvez",
    "possivelmente",
    "recomendo falar com",
];

/// Which rule fired. Phrase variants carry the configured phrase that matched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum EscalationReason {
    LowConfidence { confidence: f32 },
    CustomerPhrase { phrase: String },
    ResponsePhrase { phrase: String },
}

impl EscalationReason {
    /// Stable label for metrics.
    pub fn label(&self) -> &'static str {
        match self {
            EscalationReason::LowConfidence { .. } => "low_confidence",
            EscalationReason::CustomerPhrase { .. } => "customer_phrase",
            EscalationReason::ResponsePhrase { .. } => "response_phrase",
        }
    }
}

/// Phrase lists, configurable under `[escalation]` in the engine config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EscalationRules {
    pub customer_phrases: Vec<String>,
    pub response_phrases: Vec<String>,
}

impl Default for EscalationRules {
    fn default() -> Self {
        Self {
            customer_phrases: DEFAULT_CUSTOMER_PHRASES.iter().map(|s| s.to_string()).collect(),
            response_phrases: DEFAULT_RESPONSE_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl EscalationRules {
    pub fn should_escalate(&self, message: &str, response_text: &str, confidence: f32) -> bool {
        if below_floor(confidence) {
            return true;
        }
        find_phrase(message, &self.customer_phrases).is_some()
            || find_phrase(response_text, &self.response_phrases).is_some()
    }

    /// Every rule that fires, in rule order. Empty means auto-send.
    pub fn evaluate(
        &self,
        message: &str,
        response_text: &str,
        confidence: f32,
    ) -> Vec<EscalationReason> {
        let mut reasons = Vec::new();
        if below_floor(confidence) {
            reasons.push(EscalationReason::LowConfidence { confidence });
        }
        if let Some(p) = find_phrase(message, &self.customer_phrases) {
            reasons.push(EscalationReason::CustomerPhrase {
                phrase: p.to_string(),
            });
        }
        if let Some(p) = find_phrase(response_text, &self.response_phrases) {
            reasons.push(EscalationReason::ResponsePhrase {
                phrase: p.to_string(),
            });
        }
        reasons
    }
}

/// Shorthand using the default phrase lists.
pub fn should_escalate(message: &str, response_text: &str, confidence: f32) -> bool {
    EscalationRules::default().should_escalate(message, response_text, confidence)
}

/// First configured phrase found in `text`. Blank phrases never match.
/// NaN counts as below the floor.
fn below_floor(confidence: f32) -> bool {
    confidence.is_nan() || confidence < ESCALATION_CONFIDENCE_FLOOR
}

fn find_phrase<'a>(text: &str, phrases: &'a [String]) -> Option<&'a str> {
    let haystack = text.to_lowercase();
    phrases
        .iter()
        .map(String::as_str)
        .filter(|p| !p.trim().is_empty())
        .find(|p| haystack.contains(p.to_lowercase().as_str()))
}
