//! Row parsing for detected table regions.
//!
//! Each variant drains contiguous rows until an end-of-table condition
//! fires. Malformed rows are skipped, never fatal: the next detection pass
//! and the whole-document fallback scan get another chance at them.

use rust_decimal::Decimal;

use crate::models::statement::{DateFormat, ParsedTransaction};

use super::detect::{is_single_line_header, split_columns, ColumnLayout, FormatVariant, TableRegion};
use super::rules::amounts::{find_row_amount, parse_amount_token, AmountKind, AmountToken};
use super::rules::dates::{is_valid_date, normalize_separator, parse_date_by_format};
use super::rules::patterns::TWO_DATES_LINE_START;

/// Rows failing date validation tolerated before a table is considered
/// ended.
const MAX_CONSECUTIVE_MISSES: usize = 5;

/// Keywords that terminate a header-less table.
const TABLE_END_KEYWORDS: [&str; 3] = ["balance", "total", "summary"];

/// Transactions drained from one region plus the cursor for the next
/// detection pass.
#[derive(Debug)]
pub struct TableParse {
    pub transactions: Vec<ParsedTransaction>,
    /// One past the last line this table consumed. For header-less regions
    /// this always lies beyond `data_start`, so repeated detection from the
    /// returned cursor cannot re-commit the same region.
    pub next_line: usize,
}

/// Parse every coherent row of a detected region.
pub fn parse_table(lines: &[&str], region: &TableRegion, format: DateFormat) -> TableParse {
    match (&region.variant, &region.columns) {
        (FormatVariant::SingleLineColumns { amount_header }, Some(layout)) => {
            let header = Some(amount_header.as_str());
            parse_columnar_rows(lines, region.data_start, layout, header, format)
        }
        (FormatVariant::MultiLineHeader, Some(layout))
            if layout.description.is_some() && layout.amount.is_some() =>
        {
            parse_columnar_rows(lines, region.data_start, layout, None, format)
        }
        (FormatVariant::MultiLineHeader, _) | (FormatVariant::MultiLineTransactionBlock, _) => {
            parse_block_rows(lines, region.data_start, format)
        }
        (FormatVariant::PatternBasedTwoDate, _) => {
            parse_pattern_rows(lines, region.data_start, format)
        }
        // A columnar region without a layout has nothing to consume.
        (FormatVariant::SingleLineColumns { .. }, None) => TableParse {
            transactions: Vec::new(),
            next_line: region.data_start,
        },
    }
}

/// One transaction per line, cells split on column gaps.
fn parse_columnar_rows(
    lines: &[&str],
    data_start: usize,
    layout: &ColumnLayout,
    amount_header: Option<&str>,
    format: DateFormat,
) -> TableParse {
    let mut transactions = Vec::new();
    let mut misses = 0usize;
    let mut idx = data_start;

    while idx < lines.len() {
        let line = lines[idx];

        // A fresh header means the next table has begun.
        if is_single_line_header(line) {
            break;
        }

        let cells = split_columns(line);
        let date_cell = cells.get(layout.date).copied().unwrap_or("");
        let date = parse_date_by_format(date_cell, format);
        if !is_valid_date(&date, format) {
            misses += 1;
            idx += 1;
            if misses >= MAX_CONSECUTIVE_MISSES {
                break;
            }
            continue;
        }
        misses = 0;

        let description = layout
            .description
            .and_then(|col| cells.get(col))
            .map(|cell| cell.trim())
            .unwrap_or("");
        if description.is_empty() {
            idx += 1;
            continue;
        }

        let amount_cell = layout.amount.and_then(|col| cells.get(col).copied());
        if let Some(token) = amount_cell.and_then(parse_amount_token) {
            let kind = classify_columnar_amount(&token, amount_header);
            transactions.push(build_transaction(&date, description, token.value, kind, format));
        }
        idx += 1;
    }

    TableParse { transactions, next_line: idx }
}

/// Rows opening with two adjacent date tokens, no header.
fn parse_pattern_rows(lines: &[&str], data_start: usize, format: DateFormat) -> TableParse {
    let mut transactions = Vec::new();
    let mut idx = data_start;

    while idx < lines.len() {
        let line = lines[idx];
        if is_table_end(line) {
            break;
        }

        if let Some(caps) = TWO_DATES_LINE_START.captures(line) {
            let date = &caps[1];
            if is_valid_date(date, format) {
                let tail = &line[caps.get(0).unwrap().end()..];
                if let Some(txn) = pattern_row_transaction(date, tail, format) {
                    transactions.push(txn);
                }
            }
        }
        idx += 1;
    }

    TableParse {
        transactions,
        next_line: idx.max(data_start + 1),
    }
}

/// Three physical lines per transaction: date, description, amount.
fn parse_block_rows(lines: &[&str], data_start: usize, format: DateFormat) -> TableParse {
    let mut transactions = Vec::new();
    let mut misses = 0usize;
    let mut idx = data_start;

    while idx < lines.len() {
        if is_table_end(lines[idx]) {
            break;
        }

        // Concatenated double date tokens collapse to the leading one.
        let date = parse_date_by_format(lines[idx], format);
        if is_valid_date(&date, format) && idx + 2 < lines.len() {
            let description = lines[idx + 1].trim();
            if description.len() >= 3 {
                if let Some((value, kind)) = block_amount(lines[idx + 2]) {
                    misses = 0;
                    transactions.push(build_transaction(&date, description, value, kind, format));
                    idx += 3;
                    continue;
                }
            }
        }

        misses += 1;
        idx += 1;
        if misses >= MAX_CONSECUTIVE_MISSES {
            break;
        }
    }

    TableParse { transactions, next_line: idx }
}

/// Extract description and amount from the text that follows a two-date row
/// prefix. Shared by the header-less table rows and the whole-document
/// fallback scan.
pub(crate) fn pattern_row_transaction(
    date: &str,
    tail: &str,
    format: DateFormat,
) -> Option<ParsedTransaction> {
    let (token, amount_offset) = find_row_amount(tail)?;
    let description = strip_row_identifier(&tail[..amount_offset]);
    if description.is_empty() {
        return None;
    }
    let kind = token.kind.unwrap_or(AmountKind::Debit);
    Some(build_transaction(date, &description, token.value, kind, format))
}

/// Drop a leading 4-digit reference token and collapse the whitespace.
fn strip_row_identifier(text: &str) -> String {
    let mut words: Vec<&str> = text.split_whitespace().collect();
    if let Some(first) = words.first() {
        if first.len() == 4 && first.chars().all(|c| c.is_ascii_digit()) {
            words.remove(0);
        }
    }
    words.join(" ")
}

/// Amount line of a three-line block: the first marked token wins, else the
/// first numeric token is a debit.
fn block_amount(line: &str) -> Option<(Decimal, AmountKind)> {
    let cells = split_columns(line);
    for cell in &cells {
        if let Some(token) = parse_amount_token(cell) {
            if let Some(kind) = token.kind {
                return Some((token.value, kind));
            }
        }
    }
    for cell in &cells {
        if let Some(token) = parse_amount_token(cell) {
            return Some((token.value, AmountKind::Debit));
        }
    }
    None
}

/// Single-line tables consult the amount column's header first; a plain
/// `Amount` header defers to the token's own marker, with debit as the
/// unmarked default. Columnar tables without header text also default
/// unmarked amounts to debit.
fn classify_columnar_amount(token: &AmountToken, amount_header: Option<&str>) -> AmountKind {
    if let Some(header) = amount_header {
        let lower = header.to_lowercase();
        if lower.contains("debit") {
            return AmountKind::Debit;
        }
        if lower.contains("credit") {
            return AmountKind::Credit;
        }
    }
    match token.kind {
        Some(AmountKind::Credit) => AmountKind::Credit,
        _ => AmountKind::Debit,
    }
}

fn is_table_end(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return true;
    }
    let lower = trimmed.to_lowercase();
    TABLE_END_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

fn build_transaction(
    date: &str,
    description: &str,
    value: Decimal,
    kind: AmountKind,
    format: DateFormat,
) -> ParsedTransaction {
    let (debit, credit) = match kind {
        AmountKind::Debit => (Some(value), None),
        AmountKind::Credit => (None, Some(value)),
    };
    ParsedTransaction {
        date: normalize_separator(date, format),
        description: description.to_string(),
        debit,
        credit,
    }
}
