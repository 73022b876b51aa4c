//! Consumer for decoded response events.
//!
//! The transport decodes the wire stream into [`StreamEvent`]s and hands them over as an iterator
//! of `anyhow::Result`s. The consumer applies them to the pending assistant message, checking the
//! [`CancellationToken`] before each event. Classification runs once, on the complete text.

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::state::{ChatState, PendingExchange};
use crate::content::analyze_content;
use crate::models::{ConversationSummary, Message, MessageStatus};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Next chunk of assistant text
    Text { text: String },
    /// Regenerated rolling summary for the pending conversation
    SummaryUpdate { summary: ConversationSummary },
    /// Upstream failure reported in-band
    Error { message: String },
}

impl StreamEvent {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }
}

impl ChatState {
    /// Drive a pending exchange to its terminal state
    ///
    /// Returns `Complete` when the events ran out normally, `Stopped` when cancelled (partial
    /// text is kept) and `Error` when an error event or transport failure ended the exchange.
    /// Loading is cleared in every case.
    pub fn consume_stream<I>(
        &mut self,
        pending: &PendingExchange,
        events: I,
        cancel: &CancellationToken,
    ) -> MessageStatus
    where
        I: IntoIterator<Item = anyhow::Result<StreamEvent>>,
    {
        let conversation_id = pending.conversation_id.as_str();
        let message_id = pending.assistant_message_id.as_str();
        let mut received_content = false;

        for event in events {
            if cancel.is_cancelled() {
                return self.finish_stopped(pending);
            }

            match event {
                Ok(StreamEvent::Text { text }) => {
                    if text.is_empty() {
                        continue;
                    }
                    received_content = true;
                    let appended = self.update_message(conversation_id, message_id, |m| {
                        m.content.push_str(&text)
                    });
                    if !appended {
                        warn!(message_id, "assistant message vanished while streaming");
                    }
                }
                Ok(StreamEvent::SummaryUpdate { summary }) => {
                    self.apply_summary_update(conversation_id, summary);
                }
                Ok(StreamEvent::Error { message }) => {
                    warn!(conversation_id, error = %message, "stream reported an error");
                    if received_content {
                        self.update_message(conversation_id, message_id, |m| {
                            m.status = MessageStatus::Stopped;
                        });
                    } else {
                        self.delete_message(conversation_id, message_id);
                    }
                    return self.finish_error(pending, message);
                }
                Err(err) => {
                    warn!(conversation_id, error = %err, "stream transport failed");
                    self.delete_message(conversation_id, message_id);
                    return self.finish_error(pending, err.to_string());
                }
            }
        }

        if cancel.is_cancelled() {
            return self.finish_stopped(pending);
        }

        self.update_message(conversation_id, message_id, |m| {
            let (parsed, format) = analyze_content(&m.content);
            m.status = MessageStatus::Complete;
            m.format = format;
            m.parsed_content = Some(parsed);
        });
        self.is_loading = false;

        debug!(conversation_id, message_id, "exchange complete");
        MessageStatus::Complete
    }

    fn finish_stopped(&mut self, pending: &PendingExchange) -> MessageStatus {
        self.update_message(&pending.conversation_id, &pending.assistant_message_id, |m| {
            m.status = MessageStatus::Stopped;
        });
        self.is_loading = false;

        info!(conversation_id = %pending.conversation_id, "generation stopped");
        MessageStatus::Stopped
    }

    fn finish_error(&mut self, pending: &PendingExchange, message: String) -> MessageStatus {
        self.add_message(&pending.conversation_id, Message::error(message.clone()));
        self.error = Some(message);
        self.is_loading = false;
        MessageStatus::Error
    }
}
