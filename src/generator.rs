//! # Response Generator
//! Assembles the prompt and obtains a completion from the provider.
//!
//! The provider call is the only suspension point of the engine. Each attempt
//! runs under the configured deadline; on expiry it becomes
//! `GenerationFailure::Timeout`. Transient failures are retried up to
//! `max_retries` times with exponential backoff. Configuration errors are not.
//! Dropping the returned future drops the in-flight HTTP request.

use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::conversation::ConversationTurn;
use crate::error::{EngineResult, GenerationFailure};
use crate::knowledge::TrainingEntry;
use crate::prompt::{self, PROMPT_VERSION};
use crate::provider::DynProvider;

/// Text obtained from the provider plus call diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCompletion {
    pub text: String,
    pub prompt_version: &'static str,
    pub attempts: u32,
    pub elapsed: Duration,
}

pub struct ResponseGenerator {
    provider: DynProvider,
    timeout: Duration,
    history_window: usize,
    max_retries: u32,
    backoff: Duration,
}

impl ResponseGenerator {
    pub fn new(provider: DynProvider, config: &EngineConfig) -> Self {
        Self {
            provider,
            timeout: config.timeout(),
            history_window: config.history_window_size,
            max_retries: config.max_retries,
            backoff: config.retry_backoff(),
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn generate(
        &self,
        message: &str,
        entries: &[TrainingEntry],
        history: &[ConversationTurn],
    ) -> EngineResult<RawCompletion> {
        let system = prompt::system_prompt(entries);
        let messages = prompt::build_messages(history, message, self.history_window);
        debug!(
            prompt_version = PROMPT_VERSION,
            provider = self.provider.name(),
            entries = entries.len(),
            turns = messages.len(),
            "generating reply"
        );

        let started = Instant::now();
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            let outcome =
                match tokio::time::timeout(self.timeout, self.provider.complete(&system, &messages))
                    .await
                {
                    Ok(res) => res,
                    Err(_) => Err(GenerationFailure::Timeout(self.timeout).into()),
                };

            let outcome = outcome.and_then(|text| {
                let text = text.trim();
                if text.is_empty() {
                    Err(GenerationFailure::EmptyCompletion.into())
                } else {
                    Ok(text.to_string())
                }
            });

            match outcome {
                Ok(text) => {
                    return Ok(RawCompletion {
                        text,
                        prompt_version: PROMPT_VERSION,
                        attempts: attempt,
                        elapsed: started.elapsed(),
                    })
                }
                Err(e) if e.is_retryable() && attempt <= self.max_retries => {
                    let delay = self.backoff_for(attempt);
                    warn!(attempt, error = %e, delay_ms = delay.as_millis() as u64, "provider call failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// `backoff << (attempt - 1)`, saturating.
    fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = 1u32 << (attempt.saturating_sub(1)).min(16);
        self.backoff.saturating_mul(factor)
    }
}
