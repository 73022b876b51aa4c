use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Kind of a classified content segment
///
/// `List` and `Blockquote` are never produced by the classifier (lists and quotes are reported
/// through flags) but are accepted when reading previously stored content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentType {
    Text,
    Code,
    Json,
    Table,
    Heading,
    List,
    Blockquote,
}

/// One classified, position-ordered chunk of a message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentSegment {
    #[serde(rename = "type")]
    pub segment_type: SegmentType,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<u8>,
    /// Only present on `list` segments read from stored content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordered: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parsed: Option<Value>,
    /// Byte offset where the segment's source range starts
    #[serde(default)]
    pub start: usize,
    /// Byte offset one past the segment's source range
    #[serde(default)]
    pub end: usize,
}

impl ContentSegment {
    fn new(segment_type: SegmentType, content: impl Into<String>, range: Range<usize>) -> Self {
        Self {
            segment_type,
            content: content.into(),
            language: None,
            level: None,
            ordered: None,
            parsed: None,
            start: range.start,
            end: range.end,
        }
    }

    pub fn text(content: impl Into<String>, range: Range<usize>) -> Self {
        Self::new(SegmentType::Text, content, range)
    }

    pub fn code(
        content: impl Into<String>,
        language: impl Into<String>,
        range: Range<usize>,
    ) -> Self {
        Self { language: Some(language.into()), ..Self::new(SegmentType::Code, content, range) }
    }

    pub fn json(
        content: impl Into<String>,
        language: impl Into<String>,
        parsed: Value,
        range: Range<usize>,
    ) -> Self {
        Self {
            language: Some(language.into()),
            parsed: Some(parsed),
            ..Self::new(SegmentType::Json, content, range)
        }
    }

    pub fn table(content: impl Into<String>, range: Range<usize>) -> Self {
        Self::new(SegmentType::Table, content, range)
    }

    pub fn heading(content: impl Into<String>, level: u8, range: Range<usize>) -> Self {
        Self { level: Some(level), ..Self::new(SegmentType::Heading, content, range) }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Whether this segment exclusively owns its source range (code, JSON and tables do)
    pub fn claims_range(&self) -> bool {
        matches!(self.segment_type, SegmentType::Code | SegmentType::Json | SegmentType::Table)
    }
}

/// Classifier output: ordered segments plus document-level presence flags
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedContent {
    pub segments: Vec<ContentSegment>,
    pub has_code: bool,
    pub has_json: bool,
    pub has_table: bool,
    pub has_list: bool,
    #[serde(default)]
    pub has_blockquote: bool,
    /// Code languages in order of first appearance, `text` excluded
    pub languages: Vec<String>,
}

impl ParsedContent {
    pub fn segments_of(&self, segment_type: SegmentType) -> impl Iterator<Item = &ContentSegment> {
        self.segments.iter().filter(move |s| s.segment_type == segment_type)
    }

    pub fn has_text(&self) -> bool {
        self.segments_of(SegmentType::Text).next().is_some()
    }
}

/// Overall classification of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentFormat {
    Json,
    Table,
    Number,
    #[default]
    Text,
}

impl fmt::Display for ContentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Json => "json",
            Self::Table => "table",
            Self::Number => "number",
            Self::Text => "text",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_segment_serialization_shape() {
        let segment = ContentSegment::json("{\"a\":1}", "json", json!({"a": 1}), 0..14);
        let value = serde_json::to_value(&segment).unwrap();
        assert_eq!(value["type"], "json");
        assert_eq!(value["parsed"]["a"], 1);
        assert!(value.get("level").is_none());
    }

    #[test]
    fn test_stored_segment_without_offsets() {
        // Content stored by older clients has no offsets and may carry blockquote markers
        let segment: ContentSegment =
            serde_json::from_str(r#"{"type":"blockquote","content":""}"#).unwrap();
        assert_eq!(segment.segment_type, SegmentType::Blockquote);
        assert_eq!(segment.range(), 0..0);
        assert!(!segment.claims_range());
    }

    #[test]
    fn test_stored_list_segment_keeps_ordered() {
        let segment: ContentSegment =
            serde_json::from_str(r#"{"type":"list","content":"1. a\n2. b","ordered":true}"#)
                .unwrap();
        assert_eq!(segment.segment_type, SegmentType::List);
        assert_eq!(segment.ordered, Some(true));

        let value = serde_json::to_value(&segment).unwrap();
        assert_eq!(value["ordered"], true);
        assert!(value.get("language").is_none());
    }

    #[test]
    fn test_parsed_content_camel_case() {
        let parsed = ParsedContent { has_code: true, ..ParsedContent::default() };
        let value = serde_json::to_value(&parsed).unwrap();
        assert_eq!(value["hasCode"], true);
        assert_eq!(value["hasBlockquote"], false);
    }

    #[test]
    fn test_format_display() {
        assert_eq!(ContentFormat::Json.to_string(), "json");
        assert_eq!(ContentFormat::default(), ContentFormat::Text);
    }
}
