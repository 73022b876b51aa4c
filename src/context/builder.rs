use tracing::debug;

use crate::models::{ContextMessage, ContextMeta, Conversation, ConversationContext};

/// Recent-message window used when the caller does not choose one
pub const DEFAULT_RECENT_MESSAGES: usize = 6;

/// Build the bounded context for the next send
///
/// Error messages are dropped first; both the window and `total_message_count` are computed over
/// what remains. The last `min(len, recent_count)` messages are kept in order and reduced to role
/// and content. An empty summary text counts as no summary, but its `message_count_at_update` is
/// still reported as `last_summary_at`.
///
/// # Examples
///
/// ```
/// use chat_content::context::build_context;
/// use chat_content::models::{Conversation, Message};
///
/// let mut conversation = Conversation::new();
/// conversation.messages.push(Message::user("first"));
/// conversation.messages.push(Message::error("network down"));
/// conversation.messages.push(Message::user("second"));
///
/// let context = build_context(&conversation, 1);
/// assert_eq!(context.relevant_messages[0].content, "second");
/// assert_eq!(context.meta.total_message_count, 2);
/// ```
pub fn build_context(conversation: &Conversation, recent_count: usize) -> ConversationContext {
    let messages: Vec<_> = conversation.context_messages().collect();
    let skip = messages.len().saturating_sub(recent_count);

    let relevant_messages = messages[skip..]
        .iter()
        .map(|msg| ContextMessage { role: msg.role, content: msg.content.clone() })
        .collect::<Vec<_>>();

    let summary = conversation.summary.as_ref();

    debug!(
        conversation_id = %conversation.id,
        total = messages.len(),
        window = relevant_messages.len(),
        "built conversation context"
    );

    ConversationContext {
        summary: summary.filter(|s| !s.text.is_empty()).map(|s| s.text.clone()),
        relevant_messages,
        meta: ContextMeta {
            total_message_count: messages.len(),
            conversation_id: conversation.id.clone(),
            last_summary_at: summary.map_or(0, |s| s.message_count_at_update),
        },
    }
}

/// [`build_context`] with the default six-message window
pub fn build_default_context(conversation: &Conversation) -> ConversationContext {
    build_context(conversation, DEFAULT_RECENT_MESSAGES)
}
