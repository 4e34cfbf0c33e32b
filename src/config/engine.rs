// src/config/engine.rs
//! Explicit engine configuration.
//!
//! Loaded from `config/engine.toml` (or `ATENDOS_CONFIG_PATH`), then patched by
//! environment overrides. `provider_api_key = "ENV"` (or an empty key) means:
//! read `OPENAI_API_KEY`.

use std::{
    env, fmt, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::conversation::DEFAULT_HISTORY_WINDOW;
use crate::error::{EngineError, EngineResult};
use crate::escalation::EscalationRules;
use crate::provider::openai::DEFAULT_BASE_URL;

pub const DEFAULT_CONFIG_PATH: &str = "config/engine.toml";

pub const ENV_CONFIG_PATH: &str = "ATENDOS_CONFIG_PATH";
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_MODEL: &str = "ATENDOS_MODEL";
pub const ENV_BASE_URL: &str = "ATENDOS_BASE_URL";
pub const ENV_TIMEOUT_MS: &str = "ATENDOS_TIMEOUT_MS";
pub const ENV_HISTORY_WINDOW: &str = "ATENDOS_HISTORY_WINDOW";
pub const ENV_MAX_RETRIES: &str = "ATENDOS_MAX_RETRIES";
/// "mock" | "error" switch to deterministic providers.
pub const ENV_TEST_MODE: &str = "AI_TEST_MODE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenAi,
    Mock,
    Error,
}

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub provider: ProviderKind,
    pub provider_api_key: String,
    pub model_name: String,
    pub base_url: String,
    /// Per-attempt deadline for the provider call.
    pub timeout_ms: u64,
    /// Most recent turns folded into the prompt.
    pub history_window_size: usize,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Extra attempts on transient failures (0 = single attempt).
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
    pub escalation: EscalationRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::OpenAi,
            provider_api_key: String::new(),
            model_name: "gpt-4o-mini".to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_ms: 15_000,
            history_window_size: DEFAULT_HISTORY_WINDOW,
            temperature: 0.7,
            max_tokens: 500,
            max_retries: 0,
            retry_backoff_ms: 500,
            escalation: EscalationRules::default(),
        }
    }
}

// Never print the key itself.
impl fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineConfig")
            .field("provider", &self.provider)
            .field("key_len", &self.provider_api_key.len())
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .field("timeout_ms", &self.timeout_ms)
            .field("history_window_size", &self.history_window_size)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_ms", &self.retry_backoff_ms)
            .field("escalation", &self.escalation)
            .finish()
    }
}

impl EngineConfig {
    /// Resolve the config path from `ATENDOS_CONFIG_PATH`, falling back to the default.
    pub fn config_path() -> PathBuf {
        env::var(ENV_CONFIG_PATH)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// File (if present) + environment overrides.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let mut cfg = if path.exists() {
            Self::load_from_file(path)?
        } else {
            info!(path = %path.display(), "engine config not found, using defaults");
            let mut cfg = Self::default();
            cfg.resolve_api_key();
            cfg
        };
        cfg.apply_env_overrides();
        info!(
            provider = ?cfg.provider,
            model = %cfg.model_name,
            key_len = cfg.provider_api_key.len(),
            timeout_ms = cfg.timeout_ms,
            history_window = cfg.history_window_size,
            "engine config loaded"
        );
        Ok(cfg)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| {
            anyhow::anyhow!("Failed to read engine config at {}: {}", path.display(), e)
        })?;
        Self::from_toml_str(&data)
    }

    pub fn from_toml_str(toml_str: &str) -> anyhow::Result<Self> {
        let mut cfg: EngineConfig = toml::from_str(toml_str)?;
        cfg.resolve_api_key();
        Ok(cfg)
    }

    fn resolve_api_key(&mut self) {
        let key = self.provider_api_key.trim();
        if key.is_empty() || key.eq_ignore_ascii_case("env") {
            self.provider_api_key = env::var(ENV_API_KEY).unwrap_or_default();
        }
    }

    /// Unparseable values are ignored with a warning.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(m) = env::var(ENV_MODEL) {
            if !m.trim().is_empty() {
                self.model_name = m.trim().to_string();
            }
        }
        if let Ok(u) = env::var(ENV_BASE_URL) {
            if !u.trim().is_empty() {
                self.base_url = u.trim().to_string();
            }
        }
        if let Some(v) = parse_env::<u64>(ENV_TIMEOUT_MS) {
            self.timeout_ms = v;
        }
        if let Some(v) = parse_env::<usize>(ENV_HISTORY_WINDOW) {
            self.history_window_size = v;
        }
        if let Some(v) = parse_env::<u32>(ENV_MAX_RETRIES) {
            self.max_retries = v;
        }
        match env::var(ENV_TEST_MODE)
            .unwrap_or_default()
            .to_ascii_lowercase()
            .as_str()
        {
            "mock" => self.provider = ProviderKind::Mock,
            "error" => self.provider = ProviderKind::Error,
            _ => {}
        }
    }

    /// Fatal problems that must surface before any message is handled.
    pub fn validate(&self) -> EngineResult<()> {
        if self.provider == ProviderKind::OpenAi && self.provider_api_key.trim().is_empty() {
            return Err(EngineError::Configuration(format!(
                "missing provider API key (set {ENV_API_KEY})"
            )));
        }
        if self.model_name.trim().is_empty() {
            return Err(EngineError::Configuration("model_name is empty".into()));
        }
        if self.timeout_ms == 0 {
            return Err(EngineError::Configuration("timeout_ms must be > 0".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }
}

fn parse_env<T: std::str::FromStr>(name: &str) -> Option<T> {
    let raw = env::var(name).ok()?;
    match raw.trim().parse::<T>() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(var = name, value = %raw, "ignoring unparseable env override");
            None
        }
    }
}
