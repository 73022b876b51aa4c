//! Line and span patterns shared by the block parser and the content classifier.
//!
//! Every pattern is compiled once on first use. Block-level patterns are matched against a
//! single *trimmed* line; the `*_line` patterns run in multi-line mode over a whole document.

use std::sync::OnceLock;

use regex::Regex;

// Block-level (single trimmed line)

pub(crate) fn re_horizontal_rule() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*_]{3,}$").expect("horizontal rule pattern is valid"))
}

pub(crate) fn re_heading() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})\s+(.+)$").expect("heading pattern is valid"))
}

pub(crate) fn re_unordered_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-*+]\s+").expect("unordered marker pattern is valid"))
}

pub(crate) fn re_ordered_marker() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[0-9]+\.\s+").expect("ordered marker pattern is valid"))
}

pub(crate) fn re_table_separator() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\|[-:\s|]+\|$").expect("table separator pattern is valid"))
}

// Document-level (multi-line mode, whole text)

pub(crate) fn re_fenced_block() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?s)```([A-Za-z0-9_]+)?\n(.*?)```").expect("fenced block pattern is valid")
    })
}

pub(crate) fn re_heading_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^(#{1,6})[^\S\n]+(.+)$").expect("heading line pattern is valid")
    })
}

pub(crate) fn re_ordered_list_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[0-9]+\.[^\S\n]+.+$").expect("ordered list line pattern is valid")
    })
}

pub(crate) fn re_unordered_list_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?m)^[-*+][^\S\n]+.+$").expect("unordered list line pattern is valid")
    })
}

pub(crate) fn re_blockquote_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^>[^\S\n]+.+$").expect("blockquote line pattern is valid"))
}

/// A line that starts and ends with a pipe.
pub(crate) fn is_pipe_row(trimmed: &str) -> bool {
    trimmed.starts_with('|') && trimmed.ends_with('|')
}

/// A pipe-bounded line made only of dashes, colons, whitespace and pipes.
pub(crate) fn is_separator_row(trimmed: &str) -> bool {
    re_table_separator().is_match(trimmed)
}

/// Whether a trimmed line opens a block construct (and therefore ends a paragraph).
pub(crate) fn starts_block(trimmed: &str) -> bool {
    re_heading().is_match(trimmed)
        || trimmed.starts_with("```")
        || re_unordered_marker().is_match(trimmed)
        || re_ordered_marker().is_match(trimmed)
        || trimmed.starts_with('>')
        || re_horizontal_rule().is_match(trimmed)
        || is_pipe_row(trimmed)
}
