//! Explicitly owned conversation state.
//!
//! [`ChatState`] holds every conversation (newest first), the active conversation id and the
//! loading/error flags. All mutation goes through `&mut self`; callers that need to share it wrap
//! it themselves.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::context::{DEFAULT_RECENT_MESSAGES, build_context};
use crate::models::{ChatRequest, Conversation, ConversationSummary, Message, MessageRole};

/// Characters of the first user message used as the conversation title
pub const TITLE_MAX_CHARS: usize = 30;

fn default_context_window() -> usize {
    DEFAULT_RECENT_MESSAGES
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatState {
    pub conversations: Vec<Conversation>,
    pub active_conversation_id: Option<String>,
    #[serde(default)]
    pub is_loading: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(skip, default = "default_context_window")]
    context_window: usize,
}

/// An exchange that has been started by [`ChatState::begin_send`] and awaits its stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExchange {
    pub conversation_id: String,
    pub user_message_id: String,
    pub assistant_message_id: String,
    /// Request body to hand to the transport
    pub request: ChatRequest,
}

impl ChatState {
    /// Fresh state with one empty, active conversation
    pub fn new() -> Self {
        Self::from_conversations(Vec::new(), None)
    }

    /// Restore a snapshot
    ///
    /// An empty list gets a fresh conversation. The active id is kept when it names a stored
    /// conversation, otherwise the first conversation becomes active.
    pub fn from_conversations(
        mut conversations: Vec<Conversation>,
        active_id: Option<String>,
    ) -> Self {
        if conversations.is_empty() {
            conversations.push(Conversation::new());
        }

        let active_conversation_id = active_id
            .filter(|id| conversations.iter().any(|c| &c.id == id))
            .or_else(|| conversations.first().map(|c| c.id.clone()));

        Self {
            conversations,
            active_conversation_id,
            is_loading: false,
            error: None,
            context_window: DEFAULT_RECENT_MESSAGES,
        }
    }

    /// Number of recent messages forwarded with each send
    pub fn with_context_window(mut self, window: usize) -> Self {
        self.context_window = window;
        self
    }

    pub fn context_window(&self) -> usize {
        self.context_window
    }

    pub fn conversation(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    fn conversation_mut(&mut self, id: &str) -> Option<&mut Conversation> {
        self.conversations.iter_mut().find(|c| c.id == id)
    }

    pub fn active_conversation(&self) -> Option<&Conversation> {
        self.active_conversation_id.as_deref().and_then(|id| self.conversation(id))
    }

    /// Create a conversation at the top of the list and make it active
    pub fn create_conversation(&mut self) -> String {
        let conversation = Conversation::new();
        let id = conversation.id.clone();
        self.conversations.insert(0, conversation);
        self.active_conversation_id = Some(id.clone());
        debug!(conversation_id = %id, "created conversation");
        id
    }

    /// Returns false when no conversation has this id
    pub fn select_conversation(&mut self, id: &str) -> bool {
        if self.conversation(id).is_none() {
            return false;
        }
        self.active_conversation_id = Some(id.to_string());
        true
    }

    /// Remove a conversation; deleting the active one activates the first remaining
    pub fn delete_conversation(&mut self, id: &str) -> bool {
        let before = self.conversations.len();
        self.conversations.retain(|c| c.id != id);
        if self.conversations.len() == before {
            return false;
        }

        if self.active_conversation_id.as_deref() == Some(id) {
            self.active_conversation_id = self.conversations.first().map(|c| c.id.clone());
        }
        info!(conversation_id = %id, "deleted conversation");
        true
    }

    pub fn rename_conversation(&mut self, id: &str, title: impl Into<String>) -> bool {
        match self.conversation_mut(id) {
            Some(conversation) => {
                conversation.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Flip the privacy flag, returning the new value
    pub fn toggle_privacy(&mut self, id: &str) -> Option<bool> {
        let conversation = self.conversation_mut(id)?;
        conversation.is_private = !conversation.is_private;
        Some(conversation.is_private)
    }

    pub fn apply_summary_update(&mut self, id: &str, summary: ConversationSummary) -> bool {
        match self.conversation_mut(id) {
            Some(conversation) => {
                debug!(
                    conversation_id = %id,
                    message_count = summary.message_count_at_update,
                    "applied summary update"
                );
                conversation.summary = Some(summary);
                true
            }
            None => false,
        }
    }

    /// Append a message, titling an empty conversation after its first user message
    pub fn add_message(&mut self, conversation_id: &str, message: Message) -> bool {
        let Some(conversation) = self.conversation_mut(conversation_id) else {
            return false;
        };

        if conversation.messages.is_empty() && message.role == MessageRole::User {
            conversation.title = derive_title(&message.content);
        }
        conversation.messages.push(message);
        conversation.updated_at = Utc::now();
        true
    }

    /// Apply `update` to one message in place
    pub fn update_message<F>(&mut self, conversation_id: &str, message_id: &str, update: F) -> bool
    where
        F: FnOnce(&mut Message),
    {
        let Some(conversation) = self.conversation_mut(conversation_id) else {
            return false;
        };
        let Some(message) = conversation.messages.iter_mut().find(|m| m.id == message_id) else {
            return false;
        };

        update(message);
        conversation.updated_at = Utc::now();
        true
    }

    pub fn delete_message(&mut self, conversation_id: &str, message_id: &str) -> bool {
        let Some(conversation) = self.conversation_mut(conversation_id) else {
            return false;
        };

        let before = conversation.messages.len();
        conversation.messages.retain(|m| m.id != message_id);
        conversation.updated_at = Utc::now();
        conversation.messages.len() != before
    }

    /// Start an exchange in the active conversation
    ///
    /// Returns `None` for blank input, while another exchange is in flight, or without an
    /// active conversation. The context is built before the new messages are added.
    pub fn begin_send(&mut self, content: &str) -> Option<PendingExchange> {
        let message = content.trim();
        if message.is_empty() || self.is_loading {
            return None;
        }

        let conversation = self.active_conversation()?;
        let context = build_context(conversation, self.context_window);
        let conversation_id = conversation.id.clone();

        let user_message = Message::user(message);
        let assistant_message = Message::assistant_placeholder();
        let user_message_id = user_message.id.clone();
        let assistant_message_id = assistant_message.id.clone();

        self.add_message(&conversation_id, user_message);
        self.add_message(&conversation_id, assistant_message);
        self.is_loading = true;
        self.error = None;

        debug!(
            conversation_id = %conversation_id,
            context_messages = context.relevant_messages.len(),
            "started exchange"
        );

        Some(PendingExchange {
            conversation_id,
            user_message_id,
            assistant_message_id,
            request: ChatRequest::new(message, context),
        })
    }
}

impl Default for ChatState {
    fn default() -> Self {
        Self::new()
    }
}

/// Conversation title from a first message: 30 characters, `...` when cut
pub fn derive_title(content: &str) -> String {
    let mut chars = content.chars();
    let mut title: String = chars.by_ref().take(TITLE_MAX_CHARS).collect();
    if chars.next().is_some() {
        title.push_str("...");
    }
    title
}
