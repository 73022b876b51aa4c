use serde::{Deserialize, Serialize};

use crate::models::{ConversationContext, MessageRole};

/// Acknowledgement turn that follows the summary preamble
pub const SUMMARY_ACKNOWLEDGEMENT: &str =
    "I understand the context from our previous conversation. How can I help you?";

/// Role names as the upstream model API expects them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpstreamRole {
    User,
    Model,
}

impl From<MessageRole> for UpstreamRole {
    fn from(role: MessageRole) -> Self {
        match role {
            MessageRole::User => Self::User,
            MessageRole::Assistant => Self::Model,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamTurn {
    pub role: UpstreamRole,
    pub text: String,
}

impl UpstreamTurn {
    pub fn new(role: UpstreamRole, text: impl Into<String>) -> Self {
        Self { role, text: text.into() }
    }
}

/// Turn sequence for one upstream call
///
/// Without recent messages the call is treated as a first message and only the current text is
/// sent. Otherwise a summary, when present, is replayed as a user/model preamble, followed by the
/// recent history and the current message.
pub fn build_upstream_turns(
    context: &ConversationContext,
    current_message: &str,
) -> Vec<UpstreamTurn> {
    if context.relevant_messages.is_empty() {
        return vec![UpstreamTurn::new(UpstreamRole::User, current_message)];
    }

    let mut turns = Vec::with_capacity(context.relevant_messages.len() + 3);

    if let Some(summary) = context.summary.as_deref().filter(|s| !s.is_empty()) {
        turns.push(UpstreamTurn::new(
            UpstreamRole::User,
            format!("[Previous conversation summary: {}]", summary),
        ));
        turns.push(UpstreamTurn::new(UpstreamRole::Model, SUMMARY_ACKNOWLEDGEMENT));
    }

    turns.extend(
        context
            .relevant_messages
            .iter()
            .map(|msg| UpstreamTurn::new(msg.role.into(), msg.content.as_str())),
    );
    turns.push(UpstreamTurn::new(UpstreamRole::User, current_message));

    turns
}
