//! Hand-written markdown parser producing a block/inline AST.
//!
//! - [`parse_markdown`] splits a document into [`BlockNode`]s (headings, fenced code, tables,
//!   blockquotes, lists, rules, paragraphs)
//! - [`parse_inline`] turns paragraph text into [`InlineNode`]s (bold, italic, code, links,
//!   strikethrough)
//!
//! Both parsers are total: any input string yields a node sequence, never an error. Recursion
//! (link labels, emphasis, blockquotes) is capped at [`MAX_NESTING_DEPTH`].

pub mod ast;
pub mod block;
pub mod inline;
pub(crate) mod patterns;
pub mod table;

/// Deepest recursion the inline and blockquote parsers will follow
pub const MAX_NESTING_DEPTH: usize = 32;

pub use ast::{Alignment, BlockNode, InlineNode, ListItem, TableData, plain_text};
pub use block::{DEFAULT_CODE_LANGUAGE, parse_markdown};
pub use inline::parse_inline;
pub use table::parse_table_lines;
