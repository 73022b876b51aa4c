use serde::{Deserialize, Serialize};

use super::conversation::MessageRole;

/// A message as forwarded upstream: role and raw content only
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextMessage {
    pub role: MessageRole,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMeta {
    /// Count of non-error messages in the conversation
    pub total_message_count: usize,
    pub conversation_id: String,
    /// Message count at the last summary, 0 when none exists
    pub last_summary_at: usize,
}

/// Bounded view of a conversation, built fresh for every send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationContext {
    pub summary: Option<String>,
    pub relevant_messages: Vec<ContextMessage>,
    pub meta: ContextMeta,
}

/// Outbound request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub context: ConversationContext,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>, context: ConversationContext) -> Self {
        Self { message: message.into(), context }
    }
}
