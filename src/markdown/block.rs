//! Block-level markdown parser.
//!
//! Works on the input split into lines with a cursor. Each step classifies the current line by
//! its trimmed form and consumes the run of lines belonging to that construct:
//!
//! ```text
//! blank        skipped
//! hr           ---  ***  ___   (3+ of one rule character set)
//! heading      #..###### text
//! code block   ```lang ... ```  (unterminated fences run to end of input)
//! table        | header |  followed by a separator line, then pipe rows
//! blockquote   > ...            (re-parsed recursively)
//! list         - * + item  |  1. item
//! paragraph    everything else, up to a blank line or the start of another block
//! ```

use tracing::debug;

use super::MAX_NESTING_DEPTH;
use super::ast::{BlockNode, InlineNode, ListItem};
use super::inline::parse_inline;
use super::patterns::{
    is_pipe_row, is_separator_row, re_heading, re_horizontal_rule, re_ordered_marker,
    re_unordered_marker, starts_block,
};
use super::table::parse_table_lines;

/// Language tag used for fences that do not name one
pub const DEFAULT_CODE_LANGUAGE: &str = "text";

/// Parse a markdown document into block nodes
///
/// # Examples
///
/// ```
/// use chat_content::markdown::{BlockNode, parse_markdown};
///
/// let blocks = parse_markdown("# Title\n\nSome *text*.\n\n---");
/// assert_eq!(blocks.len(), 3);
/// assert!(matches!(blocks[0], BlockNode::Heading { level: 1, .. }));
/// assert!(matches!(blocks[2], BlockNode::Hr));
/// ```
pub fn parse_markdown(text: &str) -> Vec<BlockNode> {
    BlockParser::new(text, 0).parse()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn marker_end(self, trimmed: &str) -> Option<usize> {
        let re = match self {
            Self::Unordered => re_unordered_marker(),
            Self::Ordered => re_ordered_marker(),
        };
        re.find(trimmed).map(|m| m.end())
    }
}

struct BlockParser<'a> {
    lines: Vec<&'a str>,
    pos: usize,
    depth: usize,
}

impl<'a> BlockParser<'a> {
    fn new(text: &'a str, depth: usize) -> Self {
        Self { lines: text.split('\n').collect(), pos: 0, depth }
    }

    fn current(&self) -> Option<&'a str> {
        self.lines.get(self.pos).copied()
    }

    fn peek(&self, offset: usize) -> Option<&'a str> {
        self.lines.get(self.pos + offset).copied()
    }

    fn parse(mut self) -> Vec<BlockNode> {
        let mut blocks = Vec::new();

        while let Some(line) = self.current() {
            let trimmed = line.trim();

            if trimmed.is_empty() {
                self.pos += 1;
                continue;
            }

            if re_horizontal_rule().is_match(trimmed) {
                blocks.push(BlockNode::Hr);
                self.pos += 1;
                continue;
            }

            if let Some(heading) = parse_heading(trimmed) {
                blocks.push(heading);
                self.pos += 1;
                continue;
            }

            if let Some(info) = trimmed.strip_prefix("```") {
                blocks.push(self.parse_code_block(info));
                continue;
            }

            if is_pipe_row(trimmed) {
                if let Some(table) = self.try_parse_table() {
                    blocks.push(table);
                    continue;
                }
                // No separator below: the line starts a paragraph instead
            }

            if trimmed.starts_with('>') {
                blocks.push(self.parse_blockquote());
                continue;
            }

            if ListKind::Unordered.marker_end(trimmed).is_some() {
                blocks.push(self.parse_list(ListKind::Unordered));
                continue;
            }

            if ListKind::Ordered.marker_end(trimmed).is_some() {
                blocks.push(self.parse_list(ListKind::Ordered));
                continue;
            }

            blocks.push(self.parse_paragraph());
        }

        blocks
    }

    fn parse_code_block(&mut self, info: &str) -> BlockNode {
        let language = match info.trim() {
            "" => DEFAULT_CODE_LANGUAGE.to_string(),
            lang => lang.to_string(),
        };

        self.pos += 1;
        let mut body = Vec::new();
        while let Some(line) = self.current() {
            if line.trim().starts_with("```") {
                break;
            }
            body.push(line);
            self.pos += 1;
        }
        // Step over the closing fence (no-op at end of input)
        self.pos += 1;

        BlockNode::CodeBlock { language, content: body.join("\n") }
    }

    /// Consume a table if the line after the current one is a separator. Leaves the cursor
    /// untouched otherwise.
    fn try_parse_table(&mut self) -> Option<BlockNode> {
        let header = self.current()?;
        let separator = self.peek(1)?;
        if !is_separator_row(separator.trim()) {
            return None;
        }

        let mut table_lines = vec![header, separator];
        let mut end = self.pos + 2;
        while let Some(&line) = self.lines.get(end) {
            if !is_pipe_row(line.trim()) {
                break;
            }
            table_lines.push(line);
            end += 1;
        }

        let table_data = parse_table_lines(&table_lines)?;
        self.pos = end;
        Some(BlockNode::Table { table_data })
    }

    fn parse_blockquote(&mut self) -> BlockNode {
        let mut quoted: Vec<&str> = Vec::new();

        while let Some(line) = self.current() {
            let trimmed = line.trim();
            if let Some(rest) = trimmed.strip_prefix('>') {
                quoted.push(rest.strip_prefix(char::is_whitespace).unwrap_or(rest));
            } else if trimmed.is_empty()
                && self.peek(1).is_some_and(|next| next.trim().starts_with('>'))
            {
                quoted.push("");
            } else {
                break;
            }
            self.pos += 1;
        }

        let inner = quoted.join("\n");
        let nested = if self.depth + 1 >= MAX_NESTING_DEPTH {
            debug!(depth = self.depth, "blockquote nesting limit reached, flattening");
            if inner.trim().is_empty() {
                Vec::new()
            } else {
                vec![BlockNode::Paragraph { children: parse_inline(&inner) }]
            }
        } else {
            BlockParser::new(&inner, self.depth + 1).parse()
        };

        BlockNode::Blockquote { nested }
    }

    fn parse_list(&mut self, kind: ListKind) -> BlockNode {
        let mut items = Vec::new();

        while let Some(line) = self.current() {
            let trimmed = line.trim();
            if let Some(marker_end) = kind.marker_end(trimmed) {
                items.push(ListItem::new(parse_inline(&trimmed[marker_end..])));
            } else if trimmed.is_empty()
                && self.peek(1).is_some_and(|next| kind.marker_end(next.trim()).is_some())
            {
                // Blank line between items of the same list
            } else {
                break;
            }
            self.pos += 1;
        }

        BlockNode::List { ordered: kind == ListKind::Ordered, items }
    }

    fn parse_paragraph(&mut self) -> BlockNode {
        // The first line always belongs to the paragraph, even if it looked like a block start
        // (a pipe row without a separator)
        let mut lines = Vec::new();
        if let Some(first) = self.current() {
            lines.push(first);
            self.pos += 1;
        }

        while let Some(line) = self.current() {
            let trimmed = line.trim();
            if trimmed.is_empty() || starts_block(trimmed) {
                break;
            }
            lines.push(line);
            self.pos += 1;
        }

        BlockNode::Paragraph { children: parse_inline(&lines.join("\n")) }
    }
}

fn parse_heading(trimmed: &str) -> Option<BlockNode> {
    let caps = re_heading().captures(trimmed)?;
    let level = caps.get(1)?.as_str().len() as u8;
    let children: Vec<InlineNode> = parse_inline(caps.get(2)?.as_str());
    Some(BlockNode::Heading { level, children })
}
