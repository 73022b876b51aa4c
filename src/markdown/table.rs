use super::ast::{Alignment, TableData};

/// Build a [`TableData`] from a header line, a separator line and any number of row lines
///
/// Returns `None` when fewer than two lines are given. Cell counts are taken as found.
pub fn parse_table_lines(lines: &[&str]) -> Option<TableData> {
    let [header, separator, rows @ ..] = lines else {
        return None;
    };

    let headers = split_row(header);
    let alignments = split_row(separator).iter().map(|cell| alignment_of(cell)).collect();
    let rows = rows.iter().map(|line| split_row(line)).collect();

    Some(TableData { headers, alignments, rows })
}

/// Split a pipe-bounded row into trimmed cells, dropping the fragments outside the outer pipes
pub fn split_row(line: &str) -> Vec<String> {
    let parts: Vec<&str> = line.trim().split('|').collect();
    if parts.len() < 2 {
        return Vec::new();
    }
    parts[1..parts.len() - 1].iter().map(|cell| cell.trim().to_string()).collect()
}

fn alignment_of(cell: &str) -> Alignment {
    let cell = cell.trim();
    match (cell.starts_with(':'), cell.ends_with(':')) {
        (true, true) => Alignment::Center,
        (false, true) => Alignment::Right,
        (true, false) => Alignment::Left,
        (false, false) => Alignment::None,
    }
}
