//! OpenAI-compatible chat-completions provider.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ChatMessage, CompletionProvider};
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, GenerationFailure};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Response bodies are truncated to this many chars in error values.
const ERROR_BODY_MAX: usize = 300;

pub struct OpenAiProvider {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl OpenAiProvider {
    pub fn from_config(config: &EngineConfig) -> EngineResult<Self> {
        if config.provider_api_key.trim().is_empty() {
            return Err(EngineError::Configuration(
                "missing provider API key (set OPENAI_API_KEY)".into(),
            ));
        }
        // The per-attempt deadline is enforced by the generator; this only bounds connects.
        let http = reqwest::Client::builder()
            .user_agent(concat!("atendos-engine/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(4))
            .build()
            .map_err(|e| EngineError::Configuration(format!("http client: {e}")))?;

        Ok(Self {
            http,
            api_key: config.provider_api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model_name.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Serialize)]
struct Req<'a> {
    model: &'a str,
    messages: Vec<&'a ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct Resp {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMsg,
}

#[derive(Deserialize)]
struct ChoiceMsg {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(&self, system_prompt: &str, messages: &[ChatMessage]) -> EngineResult<String> {
        let system = ChatMessage::system(system_prompt);
        let mut all = Vec::with_capacity(messages.len() + 1);
        all.push(&system);
        all.extend(messages.iter());

        let req = Req {
            model: &self.model,
            messages: all,
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let resp = self
            .http
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&req)
            .send()
            .await
            .map_err(|e| GenerationFailure::Transport(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(EngineError::Configuration(format!(
                "provider rejected credentials (HTTP {})",
                status.as_u16()
            )));
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(GenerationFailure::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_MAX).collect(),
            }
            .into());
        }

        let body: Resp = resp
            .json()
            .await
            .map_err(|e| GenerationFailure::Malformed(e.to_string()))?;

        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if content.is_empty() {
            return Err(GenerationFailure::EmptyCompletion.into());
        }
        debug!(model = %self.model, chars = content.chars().count(), "completion received");
        Ok(content)
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
