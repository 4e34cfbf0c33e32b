// src/lib.rs
//! Automated response decision engine for Atendos IA.
//!
//! Given a customer message, the tenant's knowledge base and recent history, the
//! engine produces a reply, a confidence score and a human-handoff decision.
//! Channel adapters own persistence and message dispatch.

pub mod api;
pub mod config;
pub mod conversation;
pub mod decision;
pub mod engine;
pub mod error;
pub mod escalation;
pub mod generator;
pub mod history;
pub mod knowledge;
pub mod metrics;
pub mod prompt;
pub mod provider;
pub mod scoring;

// ---- Re-exports for stable public API ----
pub use crate::api::{router, AppState};
pub use crate::config::EngineConfig;
pub use crate::conversation::{ConversationTurn, Role};
pub use crate::decision::DecisionResult;
pub use crate::engine::{DecisionEngine, DecisionRequest};
pub use crate::error::{EngineError, EngineResult, GenerationFailure};
pub use crate::escalation::{should_escalate, EscalationReason, EscalationRules};
pub use crate::knowledge::{rank, similarity, TrainingEntry, SIMILARITY_THRESHOLD};
pub use crate::scoring::score;

use std::path::PathBuf;

/// Build the full HTTP app from a loaded config. `config_path` enables hot reload.
pub fn app_from_config(
    config: &EngineConfig,
    config_path: Option<PathBuf>,
) -> EngineResult<axum::Router> {
    let engine = DecisionEngine::from_config(config)?;
    Ok(router(AppState::new(engine, config_path)))
}
