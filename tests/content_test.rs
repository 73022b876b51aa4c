/// Content classifier integration tests
///
/// Message-sized inputs and the partition/priority properties of the classifier
use chat_content::BlockNode;
use chat_content::content::{
    ContentFormat, ContentSegment, ParsedContent, SegmentType, analyze_content,
    detect_primary_format, format_number, get_content_summary, parse_content, parse_json,
    parse_table,
};
use pretty_assertions::assert_eq;
use serde_json::json;

const SAMPLES: &[&str] = &[
    "",
    "   ",
    "42",
    "Hello world",
    "```json\n{\"a\":1}\n```",
    "| A | B |\n|---|---|\n| 1 | 2 |",
    "```\n| Not | Table |\n|---|---|\n```",
    "# Title\nIntro text\n\n```rust\nfn main() {}\n```\n\n| x | y |\n|---|---|\n| 1 | 2 |\n\nOutro",
    "Before\n```json\n{broken\n```\nAfter\n```jsonc\n[1, 2]\n```",
    "- a\n- b\n\n> quote\n\n1. one",
    "```python\nunterminated",
    "| a |\n|---|\n```\ncode\n```\n| b |\n|---|",
    "| x |\n| A |\n|---|\n| 1 |",
    "text ```inline``` more",
    "## Heading only",
    "Ünïcödé ```js\nconst é = 1;\n``` tail",
];

fn claimed(segments: &[ContentSegment]) -> Vec<&ContentSegment> {
    let mut claimed: Vec<_> = segments.iter().filter(|s| s.claims_range()).collect();
    claimed.sort_by_key(|s| s.start);
    claimed
}

#[test]
fn test_scenario_json_block() {
    let parsed = parse_content("```json\n{\"a\":1}\n```");
    assert!(parsed.has_json);
    assert_eq!(parsed.segments.len(), 1);
    assert_eq!(parsed.segments[0].segment_type, SegmentType::Json);
    assert_eq!(parsed.segments[0].parsed, Some(json!({"a": 1})));
    assert_eq!(detect_primary_format(&parsed), ContentFormat::Json);
}

#[test]
fn test_scenario_table() {
    let input = "| A | B |\n|---|---|\n| 1 | 2 |";
    let parsed = parse_content(input);
    assert!(parsed.has_table);

    let table = parse_table(input).unwrap();
    assert_eq!(table.headers, vec!["A", "B"]);
    assert_eq!(table.rows, vec![vec!["1", "2"]]);
}

#[test]
fn test_scenario_number() {
    assert_eq!(detect_primary_format(&parse_content("42")), ContentFormat::Number);
    assert_eq!(format_number("42"), "42");
}

#[test]
fn test_scenario_table_inside_fence() {
    let parsed = parse_content("```\n| Not | Table |\n|---|---|\n```");
    assert!(!parsed.has_table);
    assert!(parsed.has_code);
}

#[test]
fn test_table_detection_agrees_with_block_parser() {
    let inputs = [
        "| A | B |\n|---|---|\n| 1 | 2 |",
        "| x |\n| A |\n|---|\n| 1 |",
        "| x |\n| y |\n| A |\n|:--|\n| 1 |\n| 2 |",
        "| a |\n| b |",
        "text\n| A |\n|---|",
    ];
    for input in inputs {
        let block_tables = chat_content::parse_markdown(input)
            .iter()
            .filter(|block| matches!(block, BlockNode::Table { .. }))
            .count();
        let parsed = parse_content(input);
        assert_eq!(parsed.has_table, block_tables > 0, "{:?}", input);
        assert_eq!(parsed.segments_of(SegmentType::Table).count(), block_tables, "{:?}", input);
    }
}

#[test]
fn test_segment_partition_property() {
    for input in SAMPLES {
        let parsed = parse_content(input);
        assert!(!parsed.segments.is_empty(), "no segments for {:?}", input);

        // Claimed ranges are disjoint and in bounds
        let claimed = claimed(&parsed.segments);
        for pair in claimed.windows(2) {
            assert!(pair[0].end <= pair[1].start, "overlapping claims in {:?}", input);
        }
        assert!(claimed.iter().all(|s| s.end <= input.len()));

        if input.trim().is_empty() {
            continue;
        }

        // Claimed plus text segments cover the input, only whitespace left out
        let mut covering: Vec<_> =
            parsed.segments.iter().filter(|s| s.segment_type != SegmentType::Heading).collect();
        covering.sort_by_key(|s| s.start);

        let mut cursor = 0;
        for segment in covering {
            assert!(segment.start >= cursor, "segments out of order in {:?}", input);
            assert!(
                input[cursor..segment.start].trim().is_empty(),
                "uncovered text in {:?}",
                input
            );
            if segment.segment_type == SegmentType::Text {
                assert_eq!(segment.content, input[segment.range()].trim());
            }
            cursor = segment.end;
        }
        assert!(input[cursor..].trim().is_empty(), "uncovered tail in {:?}", input);
    }
}

#[test]
fn test_segments_sorted_by_position() {
    for input in SAMPLES {
        let parsed = parse_content(input);
        let starts: Vec<_> = parsed.segments.iter().map(|s| s.start).collect();
        let mut sorted = starts.clone();
        sorted.sort();
        assert_eq!(starts, sorted, "unsorted segments for {:?}", input);
    }
}

#[test]
fn test_format_priority_property() {
    for input in SAMPLES {
        let parsed = parse_content(input);
        let format = detect_primary_format(&parsed);
        if parsed.has_json {
            assert_eq!(format, ContentFormat::Json, "{:?}", input);
        } else if parsed.has_table {
            assert_eq!(format, ContentFormat::Table, "{:?}", input);
        }
    }
}

#[test]
fn test_json_idempotence_property() {
    for input in SAMPLES {
        for segment in parse_content(input).segments_of(SegmentType::Json) {
            let value = segment.parsed.as_ref().unwrap();
            let reparsed = parse_json(&serde_json::to_string(value).unwrap());
            assert_eq!(reparsed.as_ref(), Some(value));
        }
    }
}

#[test]
fn test_mixed_message() {
    let parsed = parse_content(SAMPLES[7]);
    let kinds: Vec<_> = parsed.segments.iter().map(|s| s.segment_type).collect();
    assert_eq!(
        kinds,
        vec![
            SegmentType::Heading,
            SegmentType::Text,
            SegmentType::Code,
            SegmentType::Table,
            SegmentType::Text,
        ]
    );
    assert_eq!(parsed.segments[1].content, "# Title\nIntro text");
    assert_eq!(parsed.languages, vec!["rust"]);
    assert_eq!(get_content_summary(&parsed), "code (rust), table, text");
    assert_eq!(detect_primary_format(&parsed), ContentFormat::Table);
}

#[test]
fn test_broken_json_and_jsonc() {
    let parsed = parse_content(SAMPLES[8]);
    assert!(parsed.has_code);
    assert!(parsed.has_json);
    assert_eq!(parsed.languages, vec!["json", "jsonc"]);

    let json_segment = parsed.segments_of(SegmentType::Json).next().unwrap();
    assert_eq!(json_segment.language.as_deref(), Some("jsonc"));
    assert_eq!(json_segment.parsed, Some(json!([1, 2])));
    assert_eq!(get_content_summary(&parsed), "code (json, jsonc), JSON, text");
}

#[test]
fn test_unterminated_fence_is_text() {
    let (parsed, format) = analyze_content(SAMPLES[10]);
    assert!(!parsed.has_code);
    assert_eq!(format, ContentFormat::Text);
}

#[test]
fn test_inline_triple_backticks_need_newline() {
    let parsed = parse_content(SAMPLES[13]);
    assert!(!parsed.has_code);
    assert_eq!(parsed.segments.len(), 1);
}

#[test]
fn test_multibyte_offsets() {
    let parsed = parse_content(SAMPLES[15]);
    assert_eq!(parsed.segments.len(), 3);
    assert_eq!(parsed.segments[0].content, "Ünïcödé");
    assert_eq!(parsed.segments[1].content, "const é = 1;\n");
    assert_eq!(parsed.segments[2].content, "tail");
}

#[test]
fn test_flags_for_lists_and_quotes() {
    let parsed = parse_content(SAMPLES[9]);
    assert!(parsed.has_list);
    assert!(parsed.has_blockquote);
    assert_eq!(get_content_summary(&parsed), "list, text");
}

#[test]
fn test_parsed_content_round_trips_through_json() {
    let parsed = parse_content(SAMPLES[7]);
    let json = serde_json::to_string(&parsed).unwrap();
    let restored: ParsedContent = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, restored);
}
