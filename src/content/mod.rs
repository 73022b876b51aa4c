//! Content classification for finished assistant messages.
//!
//! [`parse_content`] segments raw text into code, JSON, tables, headings and text;
//! [`detect_primary_format`] picks the message-level [`ContentFormat`]. The [`format`] helpers
//! are standalone utilities used when rendering those segments.

pub mod format;
pub mod parser;
pub mod segments;

pub use format::{SimpleTable, format_number, parse_json, parse_table};
pub use parser::{analyze_content, detect_primary_format, get_content_summary, parse_content};
pub use segments::{ContentFormat, ContentSegment, ParsedContent, SegmentType};
