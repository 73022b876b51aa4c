//! Data models for conversations and the context sent upstream.
//!
//! - [`Conversation`] / [`Message`] - Client-side conversation records (camelCase JSON)
//! - [`ConversationSummary`] - Rolling summary record attached to a conversation
//! - [`ConversationContext`] - Bounded, error-free history view built per send
//! - [`ChatRequest`] - Outbound `{ message, context }` body
//!
//! Timestamps and ids go through the custom (de)serializers in the `deserializers` module.

pub mod context;
pub mod conversation;
pub mod deserializers;

pub use context::{ChatRequest, ContextMessage, ContextMeta, ConversationContext};
pub use conversation::{
    Conversation, ConversationSummary, DEFAULT_CONVERSATION_TITLE, Message, MessageRole,
    MessageStatus,
};
