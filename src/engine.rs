//! # Decision Engine
//! inbound message → knowledge matches → generated reply → confidence → escalation.
//!
//! Stateless per call: training data and history arrive with every request and
//! nothing is cached between calls, so one engine can serve any number of
//! conversations concurrently. The only shared pieces are immutable settings
//! and the provider's HTTP client.

use std::time::Instant;

use metrics::{counter, histogram};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

use crate::config::EngineConfig;
use crate::conversation::ConversationTurn;
use crate::decision::DecisionResult;
use crate::error::{EngineError, EngineResult};
use crate::escalation::EscalationRules;
use crate::generator::ResponseGenerator;
use crate::knowledge::{self, TrainingEntry};
use crate::provider::{build_provider, DynProvider};
use crate::scoring;

/// What a channel adapter hands to the engine.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRequest {
    #[serde(default)]
    pub customer_message: Option<String>,
    #[serde(default)]
    pub training_data: Vec<TrainingEntry>,
    #[serde(default)]
    pub conversation_history: Vec<ConversationTurn>,
}

pub struct DecisionEngine {
    generator: ResponseGenerator,
    rules: EscalationRules,
}

impl DecisionEngine {
    /// Validate `config` and build its provider. Fails with `Configuration` on bad settings.
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let provider = build_provider(config)?;
        Ok(Self::with_provider(provider, config))
    }

    /// Use an explicit provider (tests, custom backends).
    pub fn with_provider(provider: DynProvider, config: &EngineConfig) -> Self {
        Self {
            generator: ResponseGenerator::new(provider, config),
            rules: config.escalation.clone(),
        }
    }

    pub fn rules(&self) -> &EscalationRules {
        &self.rules
    }

    pub fn provider_name(&self) -> &'static str {
        self.generator.provider_name()
    }

    /// Adapter entry point: rejects a missing message before doing any work.
    pub async fn handle(&self, request: &DecisionRequest) -> EngineResult<DecisionResult> {
        let message = request
            .customer_message
            .as_deref()
            .ok_or_else(|| EngineError::InvalidInput("customerMessage is required".into()))?;
        self.decide(message, &request.training_data, &request.conversation_history)
            .await
    }

    pub async fn decide(
        &self,
        message: &str,
        entries: &[TrainingEntry],
        history: &[ConversationTurn],
    ) -> EngineResult<DecisionResult> {
        validate_input(message, entries)?;
        let id = anon_hash(message);

        let similar = knowledge::rank(message, entries);
        let category = knowledge::best_category(message, entries);

        let started = Instant::now();
        let completion = match self.generator.generate(message, entries, history).await {
            Ok(c) => c,
            Err(e) => {
                if let EngineError::Generation(f) = &e {
                    counter!("atendos_generation_failures_total", "kind" => f.kind()).increment(1);
                }
                error!(%id, kind = e.kind(), error = %e, "reply generation failed");
                return Err(e);
            }
        };
        histogram!("atendos_generation_duration_ms").record(started.elapsed().as_millis() as f64);

        let confidence = scoring::score_with_matches(&completion.text, similar.len());
        let reasons = self.rules.evaluate(message, &completion.text, confidence);
        let result = DecisionResult::new(completion.text, confidence, category, reasons);

        counter!("atendos_decisions_total", "outcome" => result.outcome()).increment(1);
        for r in &result.escalation_reasons {
            counter!("atendos_escalations_total", "reason" => r.label()).increment(1);
        }

        if result.should_escalate {
            warn!(
                %id,
                confidence = result.confidence,
                reasons = ?result.escalation_reasons.iter().map(|r| r.label()).collect::<Vec<_>>(),
                "conversation escalated to human"
            );
        } else {
            info!(
                %id,
                confidence = result.confidence,
                similar = similar.len(),
                category = ?result.category,
                attempts = completion.attempts,
                prompt_version = completion.prompt_version,
                "auto reply decided"
            );
        }
        Ok(result)
    }
}

/// Reject blank messages and entries violating the non-empty invariant.
fn validate_input(message: &str, entries: &[TrainingEntry]) -> EngineResult<()> {
    if message.trim().is_empty() {
        return Err(EngineError::InvalidInput(
            "customerMessage must not be blank".into(),
        ));
    }
    for (i, e) in entries.iter().enumerate() {
        let blank = [
            ("category", &e.category),
            ("question", &e.question),
            ("answer", &e.answer),
        ]
        .into_iter()
        .find(|(_, v)| v.trim().is_empty());
        if let Some((field, _)) = blank {
            return Err(EngineError::InvalidInput(format!(
                "trainingData[{i}].{field} must not be empty"
            )));
        }
    }
    Ok(())
}

/// Short anonymized id for logs; raw customer text is never logged.
pub fn anon_hash(text: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let digest = hasher.finalize();
    let mut out = String::with_capacity(12);
    for b in digest.iter().take(6) {
        use std::fmt::Write as _;
        let _ = write!(&mut out, "{:02x}", b);
    }
    out
}
