//! Conversation history supplied by the caller, oldest turn first.

use serde::{Deserialize, Serialize};

/// Default number of prior turns folded into the prompt.
pub const DEFAULT_HISTORY_WINDOW: usize = 10;

/// Speaker of a prior turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Customer,
    Assistant,
}

impl Role {
    /// Role name understood by chat-completion APIs.
    pub fn as_chat_role(self) -> &'static str {
        match self {
            Role::Customer => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn customer(content: impl Into<String>) -> Self {
        Self {
            role: Role::Customer,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The most recent `n` turns, still in chronological order.
pub fn window(history: &[ConversationTurn], n: usize) -> &[ConversationTurn] {
    let start = history.len().saturating_sub(n);
    &history[start..]
}
