//! Rolling-summary refresh policy.
//!
//! The transport evaluates the policy after an exchange completes. The context it holds was built
//! before the user message and the reply were added, so the count is adjusted by
//! [`PENDING_EXCHANGE_MESSAGES`] before comparing against the threshold.

use crate::models::{ConversationContext, MessageRole};

/// New non-error messages required before the summary is regenerated
pub const SUMMARY_UPDATE_THRESHOLD: usize = 6;

/// Characters kept from each message quoted in the summary prompt
pub const SUMMARY_EXCERPT_CHARS: usize = 500;

/// Messages added by one exchange (the user message and the reply)
pub const PENDING_EXCHANGE_MESSAGES: usize = 2;

const SUMMARY_INSTRUCTION: &str = "Summarize this conversation concisely (2-3 sentences max), capturing key topics, decisions, and any important context needed for future messages. Focus on what was discussed and any conclusions reached.";

/// Threshold and excerpt length for summary regeneration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryPolicy {
    pub threshold: usize,
    pub excerpt_chars: usize,
}

impl Default for SummaryPolicy {
    fn default() -> Self {
        Self { threshold: SUMMARY_UPDATE_THRESHOLD, excerpt_chars: SUMMARY_EXCERPT_CHARS }
    }
}

impl SummaryPolicy {
    pub fn new(threshold: usize, excerpt_chars: usize) -> Self {
        Self { threshold, excerpt_chars }
    }

    /// True once `threshold` messages have accumulated since the last summary
    pub fn should_update(&self, total_message_count: usize, last_summary_at: usize) -> bool {
        last_summary_at <= total_message_count
            && total_message_count - last_summary_at >= self.threshold
    }

    /// Message count to record with a new summary, when one is due after the pending exchange
    pub fn refresh_due(&self, context: &ConversationContext) -> Option<usize> {
        let count_after_exchange = context.meta.total_message_count + PENDING_EXCHANGE_MESSAGES;
        self.should_update(count_after_exchange, context.meta.last_summary_at)
            .then_some(count_after_exchange)
    }

    /// Assemble the prompt that asks the upstream model for a fresh summary
    pub fn build_prompt(
        &self,
        context: &ConversationContext,
        user_message: &str,
        assistant_response: &str,
    ) -> String {
        let mut parts: Vec<String> = Vec::with_capacity(context.relevant_messages.len() + 3);

        if let Some(summary) = context.summary.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("Previous summary: {}", summary));
        }

        for msg in &context.relevant_messages {
            parts.push(self.excerpt(msg.role, &msg.content));
        }

        parts.push(self.excerpt(MessageRole::User, user_message));
        parts.push(self.excerpt(MessageRole::Assistant, assistant_response));

        format!("{}\n\nConversation:\n{}\n\nSummary:", SUMMARY_INSTRUCTION, parts.join("\n\n"))
    }

    fn excerpt(&self, role: MessageRole, content: &str) -> String {
        let label = match role {
            MessageRole::User => "User",
            MessageRole::Assistant => "Assistant",
        };
        format!("{}: {}", label, truncate_chars(content, self.excerpt_chars))
    }
}

/// Prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

/// [`SummaryPolicy::should_update`] with the default threshold
pub fn should_update_summary(total_message_count: usize, last_summary_at: usize) -> bool {
    SummaryPolicy::default().should_update(total_message_count, last_summary_at)
}

/// [`SummaryPolicy::refresh_due`] with the default threshold
pub fn summary_refresh_due(context: &ConversationContext) -> Option<usize> {
    SummaryPolicy::default().refresh_due(context)
}

/// [`SummaryPolicy::build_prompt`] with the default excerpt length
pub fn build_summary_prompt(
    context: &ConversationContext,
    user_message: &str,
    assistant_response: &str,
) -> String {
    SummaryPolicy::default().build_prompt(context, user_message, assistant_response)
}
