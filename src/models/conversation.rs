use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{ContentFormat, ParsedContent};

pub const DEFAULT_CONVERSATION_TITLE: &str = "New Chat";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    User,
    Assistant,
}

/// Lifecycle of a message: `streaming` until it ends as `complete`, `stopped` or `error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageStatus {
    Streaming,
    Complete,
    Stopped,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(deserialize_with = "crate::models::deserializers::deserialize_id")]
    pub id: String,
    pub role: MessageRole,
    pub content: String,
    pub status: MessageStatus,
    #[serde(default)]
    pub format: ContentFormat,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed_content: Option<ParsedContent>,
    #[serde(
        serialize_with = "crate::models::deserializers::serialize_timestamp",
        deserialize_with = "crate::models::deserializers::deserialize_timestamp"
    )]
    pub timestamp: DateTime<Utc>,
    /// Error messages are shown to the user but never replayed upstream
    #[serde(default)]
    pub is_error: bool,
}

impl Message {
    fn new(role: MessageRole, content: impl Into<String>, status: MessageStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: content.into(),
            status,
            format: ContentFormat::Text,
            parsed_content: None,
            timestamp: Utc::now(),
            is_error: false,
        }
    }

    /// A completed user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content, MessageStatus::Complete)
    }

    /// A completed assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content, MessageStatus::Complete)
    }

    /// Empty assistant message that receives streamed text
    pub fn assistant_placeholder() -> Self {
        Self::new(MessageRole::Assistant, String::new(), MessageStatus::Streaming)
    }

    /// Assistant-side error notice, excluded from conversation context
    pub fn error(content: impl Into<String>) -> Self {
        Self { is_error: true, ..Self::new(MessageRole::Assistant, content, MessageStatus::Error) }
    }
}

/// Rolling summary record as delivered by the summary update event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub text: String,
    /// Non-error message count the summary covers
    pub message_count_at_update: usize,
}

impl ConversationSummary {
    pub fn new(text: impl Into<String>, message_count_at_update: usize) -> Self {
        Self { text: text.into(), message_count_at_update }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    #[serde(deserialize_with = "crate::models::deserializers::deserialize_id")]
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(
        serialize_with = "crate::models::deserializers::serialize_timestamp",
        deserialize_with = "crate::models::deserializers::deserialize_timestamp"
    )]
    pub created_at: DateTime<Utc>,
    #[serde(
        serialize_with = "crate::models::deserializers::serialize_timestamp",
        deserialize_with = "crate::models::deserializers::deserialize_timestamp"
    )]
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<ConversationSummary>,
    #[serde(default)]
    pub is_private: bool,
}

impl Conversation {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: DEFAULT_CONVERSATION_TITLE.to_string(),
            messages: Vec::new(),
            created_at: now,
            updated_at: now,
            summary: None,
            is_private: false,
        }
    }

    pub fn message(&self, id: &str) -> Option<&Message> {
        self.messages.iter().find(|m| m.id == id)
    }

    /// Messages eligible for upstream context, in order
    pub fn context_messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.is_error)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
