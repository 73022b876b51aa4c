//! Content-format classifier.
//!
//! Splits a finished message into ordered [`ContentSegment`]s and decides the message's primary
//! [`ContentFormat`]. Passes, in order:
//!
//! 1. Fenced code blocks (whole-text pattern). `json`/`jsonc` bodies that parse become JSON
//!    segments. Ranges are claimed.
//! 2. Pipe tables outside code ranges. Ranges are claimed.
//! 3. Headings that do not start inside a claimed range. Not claimed.
//! 4. List and blockquote presence flags over the whole text.
//! 5. Unclaimed gaps become trimmed text segments.
//!
//! The function is total; empty input yields a single text segment.

use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use tracing::debug;

use super::format::parse_json;
use super::segments::{ContentFormat, ContentSegment, ParsedContent, SegmentType};
use crate::markdown::DEFAULT_CODE_LANGUAGE;
use crate::markdown::patterns::{
    is_pipe_row, is_separator_row, re_blockquote_line, re_fenced_block, re_heading_line,
    re_ordered_list_line, re_unordered_list_line,
};

const JSON_LANGUAGES: [&str; 2] = ["json", "jsonc"];

fn re_number() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^-?[0-9]+\.?[0-9]*$").expect("number pattern is valid"))
}

#[derive(Debug)]
struct FencedBlock<'a> {
    language: String,
    code: &'a str,
    range: Range<usize>,
}

#[derive(Debug)]
struct TableRegion {
    text: String,
    range: Range<usize>,
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}

fn extract_fenced_blocks(content: &str) -> Vec<FencedBlock<'_>> {
    re_fenced_block()
        .captures_iter(content)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let language = caps
                .get(1)
                .map(|m| m.as_str().to_lowercase())
                .unwrap_or_else(|| DEFAULT_CODE_LANGUAGE.to_string());
            let code = caps.get(2).map_or("", |m| m.as_str());
            Some(FencedBlock { language, code, range: whole.range() })
        })
        .collect()
}

/// Pipe-row runs that contain a header line directly followed by a separator
///
/// Mirrors the block parser: pipe rows before the header stay unclaimed, and the table runs to the
/// end of the pipe-row run.
fn extract_table_regions(content: &str) -> Vec<TableRegion> {
    let mut regions = Vec::new();
    let mut run: Vec<(usize, &str)> = Vec::new();
    let mut offset = 0;

    for line in content.split('\n') {
        let line_start = offset;
        offset += line.len() + 1;

        if is_pipe_row(line.trim()) {
            run.push((line_start, line));
        } else {
            flush_table_run(&mut run, &mut regions);
        }
    }
    flush_table_run(&mut run, &mut regions);

    regions
}

fn flush_table_run(run: &mut Vec<(usize, &str)>, regions: &mut Vec<TableRegion>) {
    let header = run.windows(2).position(|pair| is_separator_row(pair[1].1.trim()));
    if let (Some(header), Some(&(last_start, last_line))) = (header, run.last()) {
        let lines: Vec<&str> = run[header..].iter().map(|(_, line)| *line).collect();
        regions.push(TableRegion {
            text: lines.join("\n"),
            range: run[header].0..last_start + last_line.len(),
        });
    }
    run.clear();
}

/// Classify raw message text into segments and presence flags
///
/// # Examples
///
/// ```
/// use chat_content::content::{SegmentType, parse_content};
///
/// let parsed = parse_content("Intro\n```rust\nfn main() {}\n```\nOutro");
/// let kinds: Vec<_> = parsed.segments.iter().map(|s| s.segment_type).collect();
/// assert_eq!(kinds, vec![SegmentType::Text, SegmentType::Code, SegmentType::Text]);
/// assert_eq!(parsed.languages, vec!["rust"]);
/// ```
pub fn parse_content(content: &str) -> ParsedContent {
    let mut parsed = ParsedContent::default();
    let mut segments: Vec<ContentSegment> = Vec::new();
    let mut claimed: Vec<Range<usize>> = Vec::new();

    for block in extract_fenced_blocks(content) {
        if block.language != DEFAULT_CODE_LANGUAGE && !parsed.languages.contains(&block.language) {
            parsed.languages.push(block.language.clone());
        }

        let json_value = if JSON_LANGUAGES.contains(&block.language.as_str()) {
            parse_json(block.code)
        } else {
            None
        };

        // A fence that parses as JSON reports `has_json` only, never `has_code`
        match json_value {
            Some(value) => {
                parsed.has_json = true;
                let range = block.range.clone();
                segments.push(ContentSegment::json(block.code, block.language, value, range));
            }
            None => {
                parsed.has_code = true;
                let range = block.range.clone();
                segments.push(ContentSegment::code(block.code, block.language, range));
            }
        }
        claimed.push(block.range);
    }

    let code_ranges = claimed.clone();
    for table in extract_table_regions(content) {
        if code_ranges.iter().any(|range| overlaps(range, &table.range)) {
            debug!(start = table.range.start, "table candidate inside code block, skipped");
            continue;
        }
        parsed.has_table = true;
        segments.push(ContentSegment::table(table.text, table.range.clone()));
        claimed.push(table.range);
    }

    for caps in re_heading_line().captures_iter(content) {
        let (Some(whole), Some(hashes), Some(title)) = (caps.get(0), caps.get(1), caps.get(2))
        else {
            continue;
        };
        let index = whole.start();
        if claimed.iter().any(|range| range.contains(&index)) {
            continue;
        }
        let level = hashes.as_str().len() as u8;
        segments.push(ContentSegment::heading(title.as_str().trim_end(), level, whole.range()));
    }

    parsed.has_list =
        re_ordered_list_line().is_match(content) || re_unordered_list_line().is_match(content);
    parsed.has_blockquote = re_blockquote_line().is_match(content);

    claimed.sort_by_key(|range| range.start);
    let tail = content.len()..content.len();
    let mut last_end = 0;
    for range in claimed.iter().chain(std::iter::once(&tail)) {
        if range.start > last_end {
            let text = content[last_end..range.start].trim();
            if !text.is_empty() {
                segments.push(ContentSegment::text(text, last_end..range.start));
            }
        }
        last_end = last_end.max(range.end);
    }

    if segments.is_empty() {
        segments.push(ContentSegment::text(content, 0..content.len()));
    }

    // Stable: a heading keeps its place ahead of a text gap starting at the same offset
    segments.sort_by_key(|segment| segment.start);
    parsed.segments = segments;

    debug!(
        segments = parsed.segments.len(),
        has_code = parsed.has_code,
        has_json = parsed.has_json,
        has_table = parsed.has_table,
        "classified content"
    );

    parsed
}

/// Pick the message's primary format: JSON, then table, then bare number, then text
pub fn detect_primary_format(parsed: &ParsedContent) -> ContentFormat {
    if parsed.has_json {
        return ContentFormat::Json;
    }

    if parsed.has_table {
        return ContentFormat::Table;
    }

    if let [only] = parsed.segments.as_slice() {
        if only.segment_type == SegmentType::Text && re_number().is_match(only.content.trim()) {
            return ContentFormat::Number;
        }
    }

    ContentFormat::Text
}

/// Human-readable comma list of what the content contains, e.g. `code (python), list, text`
pub fn get_content_summary(parsed: &ParsedContent) -> String {
    let mut parts: Vec<String> = Vec::new();

    if parsed.has_code {
        if parsed.languages.is_empty() {
            parts.push("code".to_string());
        } else {
            parts.push(format!("code ({})", parsed.languages.join(", ")));
        }
    }

    if parsed.has_json {
        parts.push("JSON".to_string());
    }

    if parsed.has_table {
        parts.push("table".to_string());
    }

    if parsed.has_list {
        parts.push("list".to_string());
    }

    if parsed.has_text() {
        parts.push("text".to_string());
    }

    parts.join(", ")
}

/// Classify and pick the primary format in one call
pub fn analyze_content(content: &str) -> (ParsedContent, ContentFormat) {
    let parsed = parse_content(content);
    let format = detect_primary_format(&parsed);
    (parsed, format)
}
