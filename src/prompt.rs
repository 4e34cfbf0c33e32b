//! Versioned prompt template and message assembly for the response generator.
//!
//! Bump [`PROMPT_VERSION`] whenever the instruction text or block layout changes;
//! the version is logged with every generation so replies can be traced to a template.

use crate::conversation::{window, ConversationTurn};
use crate::knowledge::TrainingEntry;
use crate::provider::ChatMessage;

pub const PROMPT_VERSION: &str = "2024-06.v1";

/// Persona: helpful, professional, Brazilian Portuguese only, escalates when unsure.
pub const SYSTEM_INSTRUCTION: &str = "Você é um assistente de atendimento ao cliente \
prestativo e profissional. Responda sempre em português do Brasil, de forma clara, \
cordial e objetiva, usando as informações da base de conhecimento abaixo. \
Não invente informações. Quando não tiver certeza da resposta, recomende que o \
cliente fale com um atendente humano.";

const KNOWLEDGE_HEADER: &str = "Base de conhecimento:";

/// One block per entry, in caller order, separated by a blank line.
pub fn context_block(entries: &[TrainingEntry]) -> String {
    entries
        .iter()
        .map(|e| {
            let mut block = format!(
                "Category: {}\nQuestion: {}\nAnswer: {}",
                e.category, e.question, e.answer
            );
            if let Some(ctx) = e.context.as_deref().filter(|c| !c.trim().is_empty()) {
                block.push_str("\nContext: ");
                block.push_str(ctx);
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Instruction followed by the knowledge section (omitted when there are no entries).
pub fn system_prompt(entries: &[TrainingEntry]) -> String {
    if entries.is_empty() {
        return SYSTEM_INSTRUCTION.to_string();
    }
    format!(
        "{SYSTEM_INSTRUCTION}\n\n{KNOWLEDGE_HEADER}\n\n{}",
        context_block(entries)
    )
}

/// Bounded history (chronological) followed by the new customer message.
pub fn build_messages(
    history: &[ConversationTurn],
    message: &str,
    history_window: usize,
) -> Vec<ChatMessage> {
    let recent = window(history, history_window);
    let mut out = Vec::with_capacity(recent.len() + 1);
    out.extend(
        recent
            .iter()
            .map(|t| ChatMessage::new(t.role.as_chat_role(), t.content.clone())),
    );
    out.push(ChatMessage::user(message));
    out
}
