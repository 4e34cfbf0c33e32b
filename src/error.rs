//! Error taxonomy for the decision engine.
//!
//! Three caller-visible classes, never merged into one:
//! - `Configuration`: missing/invalid provider credentials or settings. Fatal, never retried.
//! - `Generation`: the provider call failed, timed out, or produced no usable text.
//! - `InvalidInput`: the request was rejected before any work was attempted.

use std::time::Duration;

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("generation failure: {0}")]
    Generation(#[from] GenerationFailure),

    #[error("invalid input: {0}")]
    InvalidInput(String),
}

/// Why the language-model call did not yield a reply.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerationFailure {
    #[error("provider call timed out after {0:?}")]
    Timeout(Duration),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider returned an empty completion")]
    EmptyCompletion,

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

impl GenerationFailure {
    /// Short, stable label for metrics and log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            GenerationFailure::Timeout(_) => "timeout",
            GenerationFailure::Transport(_) => "transport",
            GenerationFailure::Status { .. } => "status",
            GenerationFailure::EmptyCompletion => "empty",
            GenerationFailure::Malformed(_) => "malformed",
        }
    }
}

impl EngineError {
    /// Transient generation failures may be retried; configuration and input errors never.
    pub fn is_retryable(&self) -> bool {
        match self {
            EngineError::Generation(f) => match f {
                GenerationFailure::Timeout(_) | GenerationFailure::Transport(_) => true,
                GenerationFailure::Status { status, .. } => *status == 429 || *status >= 500,
                GenerationFailure::EmptyCompletion | GenerationFailure::Malformed(_) => false,
            },
            EngineError::Configuration(_) | EngineError::InvalidInput(_) => false,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Configuration(_) => "configuration",
            EngineError::Generation(_) => "generation",
            EngineError::InvalidInput(_) => "invalid_input",
        }
    }
}
