//! Chat Content - Markdown parsing, content classification and context assembly for chat clients
//!
//! This library implements the parts of a chat client that have real algorithmic structure:
//!
//! - Parsing assistant markdown into a block/inline AST
//! - Classifying raw message text into code, JSON, table, heading and text segments
//! - Building a bounded, error-free conversation context for the upstream model
//! - Deciding when to regenerate the rolling summary and building its prompt
//! - Owning conversation state and applying a cancellable response stream to it
//!
//! # Example
//!
//! ```
//! use chat_content::{ContentFormat, analyze_content, parse_markdown};
//!
//! let (parsed, format) = analyze_content("```json\n{\"a\": 1}\n```");
//! assert!(parsed.has_json);
//! assert_eq!(format, ContentFormat::Json);
//!
//! let blocks = parse_markdown("# Title\n\nSome **bold** text");
//! assert_eq!(blocks.len(), 2);
//! ```

pub mod chat;
pub mod cli;
pub mod content;
pub mod context;
pub mod markdown;
pub mod models;
pub mod utils;

// Re-export commonly used types
pub use chat::{ChatState, PendingExchange, StreamEvent};
pub use content::{
    ContentFormat, ContentSegment, ParsedContent, SegmentType, analyze_content,
    detect_primary_format, get_content_summary, parse_content,
};
pub use context::{build_context, build_summary_prompt, build_upstream_turns, should_update_summary};
pub use markdown::{BlockNode, InlineNode, parse_inline, parse_markdown};
pub use models::{ChatRequest, Conversation, ConversationContext, Message};
