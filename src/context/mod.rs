//! Conversation context assembly.
//!
//! - [`build_context`] - bounded, error-free view of a conversation
//! - [`summary`] - when to regenerate the rolling summary and the prompt that asks for it
//! - [`build_upstream_turns`] - role-tagged turns for the upstream model call

pub mod builder;
pub mod summary;
pub mod upstream;

pub use builder::{DEFAULT_RECENT_MESSAGES, build_context, build_default_context};
pub use summary::{
    SUMMARY_EXCERPT_CHARS, SUMMARY_UPDATE_THRESHOLD, SummaryPolicy, build_summary_prompt,
    should_update_summary, summary_refresh_due,
};
pub use upstream::{UpstreamRole, UpstreamTurn, build_upstream_turns};
