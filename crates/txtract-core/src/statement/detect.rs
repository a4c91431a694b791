//! Transaction table detection over the extracted line sequence.
//!
//! Detection is an ordered list of competing heuristics; the first strategy
//! to commit wins. The orchestrator re-invokes the detector from a moving
//! cursor, so one document can yield several table regions.

use tracing::debug;

use crate::models::statement::DateFormat;

use super::rules::dates::{is_valid_date, leading_date_token};
use super::rules::patterns::{COLUMN_GAP, TWO_DATES_LINE_START};

/// How far ahead the header-less two-date scan looks.
const PATTERN_SCAN_WINDOW: usize = 200;
/// How far ahead the multi-line header scan looks for its keyword lines.
const MULTI_LINE_HEADER_WINDOW: usize = 100;
/// How far past a multi-line header the first data row may start.
const DATA_START_WINDOW: usize = 50;
/// Data rows sampled when inferring a column layout.
const SAMPLE_ROWS: usize = 5;

/// Header keywords that can name the amount column.
const AMOUNT_HEADER_KEYWORDS: [&str; 4] = ["amount", "debit", "credit", "paid"];

/// Split-segment indices for one table's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    pub date: usize,
    pub description: Option<usize>,
    pub amount: Option<usize>,
}

/// Row shape of a detected table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatVariant {
    /// Explicit single-line header; columns split on multi-space gaps.
    SingleLineColumns {
        /// Header text over the amount column, consulted when classifying
        /// unmarked amounts.
        amount_header: String,
    },
    /// Header keywords spread over separate lines. The row parser resolves
    /// the actual row shape from the inferred column layout.
    MultiLineHeader,
    /// No header; every row starts with two adjacent date tokens.
    PatternBasedTwoDate,
    /// Three physical lines per transaction: date, description, amount.
    MultiLineTransactionBlock,
}

/// One detected table: where its data starts and how its rows are shaped.
///
/// Created fresh per detection attempt and consumed immediately by the row
/// parser; never persisted.
#[derive(Debug, Clone)]
pub struct TableRegion {
    pub header_row: Option<usize>,
    pub data_start: usize,
    pub columns: Option<ColumnLayout>,
    pub variant: FormatVariant,
}

/// A single table-detection heuristic.
pub trait TableDetectionStrategy {
    fn name(&self) -> &'static str;

    /// Find the next table at or after `from`, or report not-found.
    fn detect(&self, lines: &[&str], from: usize, format: DateFormat) -> Option<TableRegion>;
}

/// Split a line into cells on column gaps (tabs or >=2 spaces).
pub fn split_columns(line: &str) -> Vec<&str> {
    COLUMN_GAP
        .split(line.trim())
        .filter(|cell| !cell.is_empty())
        .collect()
}

/// Whether a line reads as a single-line table header.
pub fn is_single_line_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    (lower.contains("transaction date") || lower.contains("date"))
        && lower.contains("description")
        && AMOUNT_HEADER_KEYWORDS.iter().any(|kw| lower.contains(kw))
}

/// Header and data on one line per transaction, columns split by gaps.
pub struct SingleLineHeaderStrategy;

impl TableDetectionStrategy for SingleLineHeaderStrategy {
    fn name(&self) -> &'static str {
        "single-line-header"
    }

    fn detect(&self, lines: &[&str], from: usize, _format: DateFormat) -> Option<TableRegion> {
        for idx in from..lines.len() {
            if !is_single_line_header(lines[idx]) {
                continue;
            }

            let cells = split_columns(lines[idx]);
            let lower: Vec<String> = cells.iter().map(|cell| cell.to_lowercase()).collect();
            let date = lower.iter().position(|cell| cell.contains("date"));
            let description = lower.iter().position(|cell| cell.contains("description"));
            let amount = lower
                .iter()
                .position(|cell| AMOUNT_HEADER_KEYWORDS.iter().any(|kw| cell.contains(kw)));

            // The first keyword line decides: unresolvable columns fail the
            // whole strategy so the later heuristics get their turn.
            let (date, description, amount) = match (date, description, amount) {
                (Some(d), Some(s), Some(a)) => (d, s, a),
                _ => return None,
            };

            return Some(TableRegion {
                header_row: Some(idx),
                data_start: idx + 1,
                columns: Some(ColumnLayout {
                    date,
                    description: Some(description),
                    amount: Some(amount),
                }),
                variant: FormatVariant::SingleLineColumns {
                    amount_header: cells[amount].to_string(),
                },
            });
        }
        None
    }
}

/// Header-less tables recognized by their two-date row shape.
pub struct TwoDatePatternStrategy;

impl TableDetectionStrategy for TwoDatePatternStrategy {
    fn name(&self) -> &'static str {
        "two-date-pattern"
    }

    fn detect(&self, lines: &[&str], from: usize, format: DateFormat) -> Option<TableRegion> {
        let end = lines.len().min(from.saturating_add(PATTERN_SCAN_WINDOW));
        for idx in from..end {
            if let Some(caps) = TWO_DATES_LINE_START.captures(lines[idx]) {
                if is_valid_date(&caps[1], format) {
                    return Some(TableRegion {
                        header_row: None,
                        data_start: idx,
                        columns: None,
                        variant: FormatVariant::PatternBasedTwoDate,
                    });
                }
            }
        }
        None
    }
}

/// Header keywords spread over separate lines, data shape inferred from
/// sampled rows.
pub struct MultiLineHeaderStrategy;

impl TableDetectionStrategy for MultiLineHeaderStrategy {
    fn name(&self) -> &'static str {
        "multi-line-header"
    }

    fn detect(&self, lines: &[&str], from: usize, format: DateFormat) -> Option<TableRegion> {
        let end = lines.len().min(from.saturating_add(MULTI_LINE_HEADER_WINDOW));

        let mut date_kw = None;
        let mut desc_kw = None;
        let mut debit_kw = None;
        let mut credit_kw = None;
        for idx in from..end {
            let lower = lines[idx].to_lowercase();
            if date_kw.is_none()
                && (lower.contains("transaction date") || lower.contains("posting date"))
            {
                date_kw = Some(idx);
            }
            if desc_kw.is_none() && lower.contains("description") {
                desc_kw = Some(idx);
            }
            if debit_kw.is_none() && lower.contains("debit") && lower.contains("dr") {
                debit_kw = Some(idx);
            }
            if credit_kw.is_none() && lower.contains("credit") && lower.contains("cr") {
                credit_kw = Some(idx);
            }
        }

        let date_kw = date_kw?;
        let desc_kw = desc_kw?;
        let side_kw = debit_kw.max(credit_kw)?;
        let header_row = date_kw.max(desc_kw).max(side_kw);

        // First data row: the first line after the header that starts with a
        // date-shaped token.
        let scan_end = lines.len().min(header_row + 1 + DATA_START_WINDOW);
        let data_start = (header_row + 1..scan_end)
            .find(|&idx| leading_date_token(lines[idx], format).is_some())?;

        let sample_end = lines.len().min(data_start + SAMPLE_ROWS);
        let columns = infer_columns(&lines[data_start..sample_end], format)?;

        Some(TableRegion {
            header_row: Some(header_row),
            data_start,
            columns: Some(columns),
            variant: FormatVariant::MultiLineHeader,
        })
    }
}

/// Infer which split segment holds the date, description, and amount by
/// shape, from sampled data rows.
///
/// The first segment matching a leading date pattern is the date column; the
/// first segment after it longer than 3 chars and not purely
/// digits/punctuation is the description; the first segment after both that
/// contains a digit is the amount. `None` when no date column resolves.
pub fn infer_columns(samples: &[&str], format: DateFormat) -> Option<ColumnLayout> {
    let first = samples.first()?;
    let cells = split_columns(first);

    let date = cells
        .iter()
        .position(|cell| leading_date_token(cell, format).is_some())?;

    let description = cells
        .iter()
        .enumerate()
        .skip(date + 1)
        .find(|(_, cell)| {
            cell.len() > 3
                && !cell.chars().all(|c| {
                    c.is_ascii_digit() || c.is_ascii_punctuation() || c.is_whitespace()
                })
        })
        .map(|(idx, _)| idx);

    let amount = cells
        .iter()
        .enumerate()
        .skip(description.unwrap_or(date) + 1)
        .find(|(_, cell)| cell.chars().any(|c| c.is_ascii_digit()))
        .map(|(idx, _)| idx);

    Some(ColumnLayout { date, description, amount })
}

/// Ordered detection policy: strategies are consulted in sequence and the
/// first committed region wins.
pub struct TableRegionDetector {
    strategies: Vec<Box<dyn TableDetectionStrategy + Send + Sync>>,
}

impl TableRegionDetector {
    pub fn new() -> Self {
        Self {
            strategies: vec![
                Box::new(SingleLineHeaderStrategy),
                Box::new(TwoDatePatternStrategy),
                Box::new(MultiLineHeaderStrategy),
            ],
        }
    }

    /// Find the next table region at or after `from`.
    pub fn detect(&self, lines: &[&str], from: usize, format: DateFormat) -> Option<TableRegion> {
        for strategy in &self.strategies {
            if let Some(region) = strategy.detect(lines, from, format) {
                debug!(
                    "table detected via {} strategy at line {}",
                    strategy.name(),
                    region.data_start
                );
                return Some(region);
            }
        }
        None
    }
}

impl Default for TableRegionDetector {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FMT: DateFormat = DateFormat::DayMonthYearSlash;

    #[test]
    fn test_single_line_header_resolves_columns() {
        let lines = vec![
            "ACME BANK",
            "Transaction Date  Description  Amount",
            "01/02/2024  COFFEE SHOP  4.500 DR",
        ];

        let region = SingleLineHeaderStrategy.detect(&lines, 0, FMT).unwrap();
        assert_eq!(region.header_row, Some(1));
        assert_eq!(region.data_start, 2);
        let columns = region.columns.unwrap();
        assert_eq!(columns.date, 0);
        assert_eq!(columns.description, Some(1));
        assert_eq!(columns.amount, Some(2));
        assert_eq!(
            region.variant,
            FormatVariant::SingleLineColumns { amount_header: "Amount".to_string() }
        );
    }

    #[test]
    fn test_single_line_header_requires_keywords() {
        // "description" never appears, so no line qualifies as a header.
        let lines = vec!["Posting Date  Details  Amount", "01/02/2024  COFFEE  4.500 DR"];
        assert!(SingleLineHeaderStrategy.detect(&lines, 0, FMT).is_none());
    }

    #[test]
    fn test_two_date_pattern_commits_on_valid_date() {
        let lines = vec![
            "STATEMENT OF ACCOUNT",
            "06/12/2025  06/12/2025  9941  MOCA  40.000 DR  0 CR",
        ];

        let region = TwoDatePatternStrategy.detect(&lines, 0, FMT).unwrap();
        assert_eq!(region.header_row, None);
        assert_eq!(region.data_start, 1);
        assert_eq!(region.variant, FormatVariant::PatternBasedTwoDate);
    }

    #[test]
    fn test_two_date_pattern_rejects_invalid_first_date() {
        let lines = vec!["13/13/2025  14/13/2025  BAD ROW  1.000 DR"];
        assert!(TwoDatePatternStrategy.detect(&lines, 0, FMT).is_none());
    }

    #[test]
    fn test_multi_line_header_with_columnar_rows() {
        let lines = vec![
            "Transaction Date",
            "Description",
            "Debit (DR)",
            "Credit (CR)",
            "",
            "01/02/2024  COFFEE HOUSE  50.000 DR",
        ];

        let region = MultiLineHeaderStrategy.detect(&lines, 0, FMT).unwrap();
        assert_eq!(region.header_row, Some(3));
        assert_eq!(region.data_start, 5);
        assert_eq!(region.variant, FormatVariant::MultiLineHeader);
        let columns = region.columns.unwrap();
        assert_eq!(columns.date, 0);
        assert_eq!(columns.description, Some(1));
        assert_eq!(columns.amount, Some(2));
    }

    #[test]
    fn test_multi_line_header_date_only_rows() {
        let lines = vec![
            "Transaction Date",
            "Description",
            "Debit (DR)",
            "06/12/2025",
            "GRAB RIDE",
            "45.000 DR",
        ];

        let region = MultiLineHeaderStrategy.detect(&lines, 0, FMT).unwrap();
        assert_eq!(region.data_start, 3);
        let columns = region.columns.unwrap();
        assert_eq!(columns.description, None);
        assert_eq!(columns.amount, None);
    }

    #[test]
    fn test_multi_line_header_needs_all_keyword_lines() {
        let lines = vec!["Transaction Date", "Debit (DR)", "01/02/2024"];
        assert!(MultiLineHeaderStrategy.detect(&lines, 0, FMT).is_none());
    }

    #[test]
    fn test_infer_columns_by_shape() {
        let samples = vec!["01/02/2024  COFFEE HOUSE  50.000 DR"];
        let columns = infer_columns(&samples, FMT).unwrap();
        assert_eq!(columns.date, 0);
        assert_eq!(columns.description, Some(1));
        assert_eq!(columns.amount, Some(2));
    }

    #[test]
    fn test_infer_columns_without_description() {
        let samples = vec!["01/02/2024"];
        let columns = infer_columns(&samples, FMT).unwrap();
        assert_eq!(columns.date, 0);
        assert_eq!(columns.description, None);
        assert_eq!(columns.amount, None);
    }

    #[test]
    fn test_infer_columns_requires_date() {
        let samples = vec!["COFFEE HOUSE  50.000 DR"];
        assert!(infer_columns(&samples, FMT).is_none());
    }

    #[test]
    fn test_detector_prefers_explicit_header() {
        let lines = vec![
            "Transaction Date  Description  Amount",
            "06/12/2025  06/12/2025  COFFEE  1.000 DR",
        ];

        let region = TableRegionDetector::new().detect(&lines, 0, FMT).unwrap();
        assert!(matches!(region.variant, FormatVariant::SingleLineColumns { .. }));
    }

    #[test]
    fn test_detector_not_found_past_content() {
        let lines = vec!["Transaction Date  Description  Amount", "01/02/2024  X  1.000 DR"];
        assert!(TableRegionDetector::new().detect(&lines, 2, FMT).is_none());
    }
}
