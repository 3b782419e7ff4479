//! GFM tables (distilled spec §4.2.10). Cell splitting is backtick-aware: a `|` inside an
//! unclosed code span doesn't split a row, matching the behaviour of the inline parser that will
//! later walk the same text.

use super::Parser;
use crate::nodes::{AstNode, NodeValue, TableAlignment};
use crate::strings::trim_slice;

/// True when `current_line` is a plausible delimiter row (`---|:--:|--:`) immediately following
/// a single-line paragraph buffer, i.e. the two lines together could be a table header.
pub fn looks_like_table_start(prior_paragraph: &str, current_line: &str) -> bool {
    if prior_paragraph.trim().is_empty() || prior_paragraph.contains('\n') {
        return false;
    }
    parse_delimiter_row(current_line).is_some()
}

/// Attempts to convert `container` (an open paragraph whose content is the would-be header row)
/// plus `delimiter_line` into a `Table` + header `TableRow`, returning the new table node.
pub fn try_open<'a, 'o>(
    parser: &mut Parser<'a, 'o>,
    container: &'a AstNode<'a>,
    header_line: &str,
    delimiter_line: &str,
) -> Option<&'a AstNode<'a>> {
    let alignments = parse_delimiter_row(delimiter_line)?;
    let header_cells = split_row(header_line);
    if header_cells.len() != alignments.len() {
        return None;
    }

    let parent = container.parent()?;
    container.detach();

    let table = parser.add_child(parent, NodeValue::Table(alignments), container.data.borrow().start_column);
    let header_row = parser.add_child(table, NodeValue::TableRow(true), container.data.borrow().start_column);
    for cell in header_cells {
        let cell_node = parser.add_child(header_row, NodeValue::TableCell, 1);
        cell_node.data.borrow_mut().content = cell;
        cell_node.data.borrow_mut().open = false;
    }
    header_row.data.borrow_mut().open = false;

    Some(table)
}

/// Appends one more body row to an already-open `Table`/`TableRow` container, splitting `line`
/// into cells. Returns `false` (leaving the table to close normally) once `line` no longer looks
/// like a table row, e.g. because it's blank or has too few columns to plausibly belong.
pub fn try_continue_row<'a, 'o>(
    parser: &mut Parser<'a, 'o>,
    container: &'a AstNode<'a>,
    line: &str,
) -> bool {
    let table = match container.data.borrow().value {
        NodeValue::Table(_) => Some(container),
        NodeValue::TableRow(_) | NodeValue::TableCell => container.parent().and_then(|p| {
            if matches!(p.data.borrow().value, NodeValue::Table(_)) {
                Some(p)
            } else {
                p.parent()
            }
        }),
        _ => None,
    };
    let table = match table {
        Some(t) => t,
        None => return false,
    };
    if trim_slice(line).is_empty() {
        return false;
    }

    let n_cols = match table.data.borrow().value {
        NodeValue::Table(ref aligns) => aligns.len(),
        _ => return false,
    };

    let cells = split_row(line);
    let row = parser.add_child(table, NodeValue::TableRow(false), 1);
    for i in 0..n_cols {
        let cell_node = parser.add_child(row, NodeValue::TableCell, 1);
        if let Some(text) = cells.get(i) {
            cell_node.data.borrow_mut().content = text.clone();
        }
        cell_node.data.borrow_mut().open = false;
    }
    row.data.borrow_mut().open = false;
    true
}

/// Parses a delimiter row (e.g. `| :--- | :---: | ---: |`) into per-column alignments, or
/// `None` if any cell isn't a valid delimiter cell.
fn parse_delimiter_row(line: &str) -> Option<Vec<TableAlignment>> {
    let trimmed = trim_slice(line);
    let trimmed = trimmed.strip_prefix('|').unwrap_or(trimmed);
    let trimmed = trimmed.strip_suffix('|').unwrap_or(trimmed);
    if trimmed.trim().is_empty() {
        return None;
    }

    let mut aligns = Vec::new();
    for cell in split_row(trimmed) {
        let cell = cell.trim();
        if cell.is_empty() {
            return None;
        }
        let left = cell.starts_with(':');
        let right = cell.ends_with(':');
        let dashes = cell.trim_matches(':');
        if dashes.is_empty() || !dashes.bytes().all(|b| b == b'-') {
            return None;
        }
        aligns.push(match (left, right) {
            (true, true) => TableAlignment::Center,
            (true, false) => TableAlignment::Left,
            (false, true) => TableAlignment::Right,
            (false, false) => TableAlignment::None,
        });
    }
    if aligns.is_empty() {
        None
    } else {
        Some(aligns)
    }
}

/// Splits a table row into cells on unescaped `|` characters, treating the contents of a
/// backtick code span as opaque (a `|` between a matched pair of equal-length backtick runs
/// doesn't split the row).
fn split_row(line: &str) -> Vec<String> {
    let line = trim_slice(line);
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);

    let bytes = line.as_bytes();
    let mut cells = Vec::new();
    let mut cur = String::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' if i + 1 < bytes.len() => {
                cur.push(bytes[i] as char);
                cur.push(bytes[i + 1] as char);
                i += 2;
            }
            b'`' => {
                let run_start = i;
                while i < bytes.len() && bytes[i] == b'`' {
                    i += 1;
                }
                let run_len = i - run_start;
                let span_start = i;
                let close = find_backtick_run(bytes, i, run_len);
                match close {
                    Some(close_start) => {
                        cur.push_str(&line[run_start..close_start + run_len]);
                        i = close_start + run_len;
                    }
                    None => {
                        cur.push_str(&line[run_start..span_start]);
                        i = span_start;
                    }
                }
            }
            b'|' => {
                cells.push(unescape_pipes(cur.trim()));
                cur = String::new();
                i += 1;
            }
            _ => {
                // Advance by full UTF-8 char, not byte, to avoid splitting multi-byte sequences.
                let ch_len = utf8_char_len(bytes[i]);
                cur.push_str(&line[i..i + ch_len]);
                i += ch_len;
            }
        }
    }
    cells.push(unescape_pipes(cur.trim()));
    cells
}

fn find_backtick_run(bytes: &[u8], from: usize, run_len: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let start = i;
            while i < bytes.len() && bytes[i] == b'`' {
                i += 1;
            }
            if i - start == run_len {
                return Some(start);
            }
        } else {
            i += 1;
        }
    }
    None
}

fn utf8_char_len(b: u8) -> usize {
    if b & 0x80 == 0 {
        1
    } else if b & 0xE0 == 0xC0 {
        2
    } else if b & 0xF0 == 0xE0 {
        3
    } else if b & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

fn unescape_pipes(cell: &str) -> String {
    cell.replace("\\|", "|")
}
