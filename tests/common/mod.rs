//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::io::Write;

use chat_content::models::Conversation;
use tempfile::NamedTempFile;

/// Builder for messages in the client's JSON shape
pub struct MessageBuilder {
    id: String,
    role: String,
    content: String,
    status: String,
    timestamp: i64,
    is_error: bool,
}

impl MessageBuilder {
    /// Create a completed user message
    pub fn user(content: &str) -> Self {
        Self {
            id: "user-1".to_string(),
            role: "user".to_string(),
            content: content.to_string(),
            status: "complete".to_string(),
            timestamp: 1762076480016,
            is_error: false,
        }
    }

    /// Create a completed assistant message
    pub fn assistant(content: &str) -> Self {
        Self { role: "assistant".to_string(), id: "assistant-1".to_string(), ..Self::user(content) }
    }

    /// Create an assistant-side error message
    pub fn error(content: &str) -> Self {
        Self { status: "error".to_string(), is_error: true, ..Self::assistant(content) }
    }

    /// Set the message ID
    pub fn id(mut self, id: &str) -> Self {
        self.id = id.to_string();
        self
    }

    /// Set the timestamp
    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        serde_json::json!({
            "id": self.id,
            "role": self.role,
            "content": self.content,
            "status": self.status,
            "format": "text",
            "timestamp": self.timestamp,
            "isError": self.is_error,
        })
        .to_string()
    }
}

/// Builder for conversation files
pub struct ConversationBuilder {
    id: String,
    title: String,
    messages: Vec<MessageBuilder>,
    summary: Option<(String, usize)>,
}

impl ConversationBuilder {
    /// Create an empty conversation
    pub fn new() -> Self {
        Self {
            id: "550e8400-e29b-41d4-a716-446655440000".to_string(),
            title: "New Chat".to_string(),
            messages: Vec::new(),
            summary: None,
        }
    }

    /// Set the conversation title
    pub fn title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Add a message; its ID is made unique by position
    pub fn with_message(mut self, message: MessageBuilder) -> Self {
        let index = self.messages.len();
        self.messages.push(message.id(&format!("m{}", index)));
        self
    }

    /// Add alternating user/assistant messages numbered from 0
    pub fn with_exchanges(mut self, count: usize) -> Self {
        for i in 0..count {
            let message = if i % 2 == 0 {
                MessageBuilder::user(&format!("message {}", i))
            } else {
                MessageBuilder::assistant(&format!("message {}", i))
            };
            self = self.with_message(message);
        }
        self
    }

    /// Attach a rolling summary
    pub fn with_summary(mut self, text: &str, message_count_at_update: usize) -> Self {
        self.summary = Some((text.to_string(), message_count_at_update));
        self
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> String {
        let messages = self.messages.iter().map(|m| m.to_json()).collect::<Vec<_>>().join(",");
        let summary_field = self
            .summary
            .as_ref()
            .map(|(text, count)| {
                format!(
                    r#","summary":{{"text":{},"messageCountAtUpdate":{}}}"#,
                    serde_json::to_string(text).unwrap(),
                    count
                )
            })
            .unwrap_or_default();

        format!(
            r#"{{"id":"{}","title":{},"messages":[{}],"createdAt":1762076480000,"updatedAt":1762076490000{}}}"#,
            self.id,
            serde_json::to_string(&self.title).unwrap(),
            messages,
            summary_field
        )
    }

    /// Deserialize into the library type
    pub fn build(&self) -> Conversation {
        serde_json::from_str(&self.to_json()).expect("Builder produced invalid conversation JSON")
    }

    /// Write to a temporary file
    pub fn write_temp(&self) -> NamedTempFile {
        write_temp(&self.to_json())
    }
}

impl Default for ConversationBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Write text to a temporary file
pub fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(content.as_bytes()).expect("Failed to write temp file");
    file
}
