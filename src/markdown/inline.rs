//! Inline markup parser.
//!
//! Scans the input left to right. At every position the span patterns are tried in a fixed
//! priority order and the first one that matches *at that position* wins:
//!
//! ```text
//! code span      `...`
//! link           [label](href)      label parsed recursively
//! bold           **...** | __...__  content parsed recursively
//! italic         *...*   | _..._    content parsed recursively
//! strikethrough  ~~...~~            content parsed recursively
//! text           longest run without ` [ ] * _ ~
//! fallback       the single special character, as text
//! ```
//!
//! Delimited spans are non-greedy, require matching open/close delimiters and do not cross
//! line breaks. Every input character ends up in exactly one node.

use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use super::MAX_NESTING_DEPTH;
use super::ast::InlineNode;

fn re_code_span() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^`([^`]+)`").expect("code span pattern is valid"))
}

fn re_link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\[([^\]]+)\]\(([^)]+)\)").expect("link pattern is valid"))
}

fn re_bold() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\*\*(.+?)\*\*|__(.+?)__)").expect("bold pattern is valid"))
}

fn re_italic() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:\*(.+?)\*|_(.+?)_)").expect("italic pattern is valid"))
}

fn re_strikethrough() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^~~(.+?)~~").expect("strikethrough pattern is valid"))
}

fn re_plain_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^`\[\]*_~]+").expect("plain run pattern is valid"))
}

/// Parse a line or paragraph of text into inline nodes
///
/// # Examples
///
/// ```
/// use chat_content::markdown::{InlineNode, parse_inline};
///
/// let nodes = parse_inline("a **b** c");
/// assert_eq!(nodes[0], InlineNode::text("a "));
/// assert_eq!(nodes[1], InlineNode::Bold { children: vec![InlineNode::text("b")] });
/// assert_eq!(nodes[2], InlineNode::text(" c"));
/// ```
pub fn parse_inline(text: &str) -> Vec<InlineNode> {
    parse_inline_at_depth(text, 0)
}

fn parse_inline_at_depth(text: &str, depth: usize) -> Vec<InlineNode> {
    let mut nodes = Vec::new();

    if depth >= MAX_NESTING_DEPTH {
        debug!(depth, len = text.len(), "inline nesting limit reached, keeping text literal");
        if !text.is_empty() {
            nodes.push(InlineNode::text(text));
        }
        return nodes;
    }

    let mut remaining = text;
    while !remaining.is_empty() {
        let (node, consumed) = next_node(remaining, depth);
        nodes.push(node);
        remaining = &remaining[consumed..];
    }

    nodes
}

/// Match one node at the start of `remaining`, returning it with the number of bytes consumed
fn next_node(remaining: &str, depth: usize) -> (InlineNode, usize) {
    if let Some(caps) = re_code_span().captures(remaining) {
        return (InlineNode::code(&caps[1]), match_len(&caps));
    }

    if let Some(caps) = re_link().captures(remaining) {
        let node = InlineNode::Link {
            href: caps[2].to_string(),
            children: parse_inline_at_depth(&caps[1], depth + 1),
        };
        return (node, match_len(&caps));
    }

    if let Some((inner, len)) = delimited(re_bold(), remaining) {
        return (InlineNode::Bold { children: parse_inline_at_depth(inner, depth + 1) }, len);
    }

    if let Some((inner, len)) = delimited(re_italic(), remaining) {
        return (InlineNode::Italic { children: parse_inline_at_depth(inner, depth + 1) }, len);
    }

    if let Some((inner, len)) = delimited(re_strikethrough(), remaining) {
        let children = parse_inline_at_depth(inner, depth + 1);
        return (InlineNode::Strikethrough { children }, len);
    }

    if let Some(run) = re_plain_run().find(remaining) {
        return (InlineNode::text(run.as_str()), run.end());
    }

    // Unmatched special character: keep it literally
    let width = remaining.chars().next().map_or(1, char::len_utf8);
    (InlineNode::text(&remaining[..width]), width)
}

/// Inner text and total length of a delimited span, whichever alternative matched
fn delimited<'t>(re: &Regex, text: &'t str) -> Option<(&'t str, usize)> {
    let caps = re.captures(text)?;
    let inner = caps.get(1).or_else(|| caps.get(2))?;
    Some((inner.as_str(), match_len(&caps)))
}

fn match_len(caps: &Captures<'_>) -> usize {
    caps.get(0).map_or(0, |m| m.end())
}
