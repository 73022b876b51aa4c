//! Conversation state and the streaming exchange lifecycle.
//!
//! [`ChatState::begin_send`] snapshots the context and adds the user and placeholder messages;
//! [`ChatState::consume_stream`] applies the decoded response events until the exchange ends.

pub mod state;
pub mod stream;

pub use state::{ChatState, PendingExchange, TITLE_MAX_CHARS, derive_title};
pub use stream::StreamEvent;
