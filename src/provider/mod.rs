//! Language-model provider boundary: `complete(system_prompt, messages) -> text`.
//!
//! The engine only owns prompt assembly; the model itself sits behind
//! [`CompletionProvider`]. Test modes swap in deterministic providers.

pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, ProviderKind};
use crate::error::{EngineResult, GenerationFailure};

pub use openai::OpenAiProvider;

/// Fixed reply of the mock provider (long enough to clear both length bonuses).
pub const MOCK_REPLY: &str = "Obrigado pelo contato! Nosso horário de atendimento é de \
segunda a sexta, das 8h às 18h. Posso ajudar com mais alguma coisa?";

/// A chat message as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }
}

#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Return the generated text. Auth/config problems surface as
    /// `EngineError::Configuration`, everything else as a `GenerationFailure`.
    async fn complete(&self, system_prompt: &str, messages: &[ChatMessage]) -> EngineResult<String>;

    /// Provider name for diagnostics.
    fn name(&self) -> &'static str;
}

pub type DynProvider = Arc<dyn CompletionProvider>;

/// Always answers with the same text.
#[derive(Debug, Clone)]
pub struct MockProvider {
    pub reply: String,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            reply: MOCK_REPLY.to_string(),
        }
    }
}

#[async_trait]
impl CompletionProvider for MockProvider {
    async fn complete(&self, _system_prompt: &str, _messages: &[ChatMessage]) -> EngineResult<String> {
        Ok(self.reply.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Always fails; exercises the caller's fallback path.
#[derive(Debug, Clone)]
pub struct FailingProvider {
    pub failure: GenerationFailure,
}

impl Default for FailingProvider {
    fn default() -> Self {
        Self {
            failure: GenerationFailure::Transport("provider unavailable (test mode)".into()),
        }
    }
}

#[async_trait]
impl CompletionProvider for FailingProvider {
    async fn complete(&self, _system_prompt: &str, _messages: &[ChatMessage]) -> EngineResult<String> {
        Err(self.failure.clone().into())
    }

    fn name(&self) -> &'static str {
        "error"
    }
}

/// Factory: build the provider selected in `config`.
pub fn build_provider(config: &EngineConfig) -> EngineResult<DynProvider> {
    match config.provider {
        ProviderKind::OpenAi => Ok(Arc::new(OpenAiProvider::from_config(config)?)),
        ProviderKind::Mock => Ok(Arc::new(MockProvider::default())),
        ProviderKind::Error => Ok(Arc::new(FailingProvider::default())),
    }
}
