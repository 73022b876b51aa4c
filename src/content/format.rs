//! Standalone format helpers shared by the classifier and renderers.
//!
//! None of these fail: malformed input yields `None` or is handed back unchanged.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

fn re_separator_line() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[-|:\s]+$").expect("separator line pattern is valid"))
}

/// Header and rows of a loosely parsed table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Strict JSON parse of the trimmed input
///
/// # Examples
///
/// ```
/// use chat_content::content::parse_json;
///
/// assert_eq!(parse_json(" [1, 2] ").unwrap()[1], 2);
/// assert!(parse_json("{invalid}").is_none());
/// ```
pub fn parse_json(text: &str) -> Option<Value> {
    serde_json::from_str(text.trim()).ok()
}

/// Parse pipe-separated text into headers and rows
///
/// Needs at least two non-blank lines. The second line is skipped when it only contains
/// dashes, colons, pipes and whitespace; otherwise it is the first data row. Lines without
/// pipes become a single cell.
pub fn parse_table(text: &str) -> Option<SimpleTable> {
    let lines: Vec<&str> = text.trim().split('\n').filter(|line| !line.trim().is_empty()).collect();
    if lines.len() < 2 {
        return None;
    }

    let headers = split_cells(lines[0]);
    let data_start = if re_separator_line().is_match(lines[1]) { 2 } else { 1 };
    let rows = lines[data_start..].iter().map(|line| split_cells(line)).collect();

    Some(SimpleTable { headers, rows })
}

fn split_cells(line: &str) -> Vec<String> {
    let cells: Vec<&str> = line.split('|').map(str::trim).collect();
    if cells.len() == 1 {
        return vec![cells[0].to_string()];
    }
    cells[1..cells.len() - 1].iter().map(|cell| cell.to_string()).collect()
}

/// Render a numeric string with thousands separators
///
/// Up to three fraction digits are kept (rounded); trailing zeros are dropped. Input that is not
/// a finite number is returned unchanged.
///
/// # Examples
///
/// ```
/// use chat_content::content::format_number;
///
/// assert_eq!(format_number("1234567.891"), "1,234,567.891");
/// assert_eq!(format_number("42"), "42");
/// assert_eq!(format_number("n/a"), "n/a");
/// ```
pub fn format_number(value: &str) -> String {
    let trimmed = value.trim();
    match trimmed.parse::<f64>() {
        Ok(number) if number.is_finite() && !trimmed.is_empty() => group_thousands(number),
        _ => value.to_string(),
    }
}

fn group_thousands(number: f64) -> String {
    let fixed = format!("{:.3}", number.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 1);
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let mut out = String::new();
    if number.is_sign_negative() && (grouped != "0" || !frac_part.is_empty()) {
        out.push('-');
    }
    out.push_str(&grouped);
    if !frac_part.is_empty() {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}
