//! Statement parsing orchestration.

use std::collections::HashSet;
use std::time::Instant;

use rust_decimal::Decimal;
use tracing::{debug, info};

use crate::models::statement::{DateFormat, ParsedStatement, ParsedTransaction};

use super::detect::{TableRegion, TableRegionDetector};
use super::rows::{parse_table, pattern_row_transaction};
use super::rules::amounts::AmountKind;
use super::rules::card::extract_card_last4;
use super::rules::dates::is_valid_date;
use super::rules::patterns::TWO_DATES_ANYWHERE;

/// Result of one statement extraction pass.
#[derive(Debug, Clone)]
pub struct ParseOutcome {
    /// Extracted statement data.
    pub statement: ParsedStatement,
    /// Structural absences worth surfacing; never fatal.
    pub warnings: Vec<String>,
    /// Processing time in milliseconds.
    pub processing_time_ms: u64,
}

/// Heuristic, multi-strategy statement parser.
///
/// A deterministic, synchronous transform over the extracted text: no I/O,
/// no shared state, safe to run concurrently for independent documents.
pub struct StatementParser {
    format: DateFormat,
    /// Whether the whole-document scan for rows that escaped table
    /// detection runs after table discovery.
    fallback_scan: bool,
    /// Whether the masked/labeled card number pass runs.
    card_detection: bool,
    detector: TableRegionDetector,
}

/// Orchestrator position while walking the line sequence.
enum ScanState {
    Scanning(usize),
    TableFound(TableRegion),
    EndOfDocument,
}

/// Dedup identity of a transaction: canonical date, normalized description,
/// signed amount.
type DedupKey = (String, String, AmountKind, Decimal);

impl StatementParser {
    /// Create a parser for statements using the given date format.
    pub fn new(format: DateFormat) -> Self {
        Self {
            format,
            fallback_scan: true,
            card_detection: true,
            detector: TableRegionDetector::new(),
        }
    }

    /// Toggle the whole-document fallback scan.
    pub fn with_fallback_scan(mut self, enabled: bool) -> Self {
        self.fallback_scan = enabled;
        self
    }

    /// Toggle card/account number detection.
    pub fn with_card_detection(mut self, enabled: bool) -> Self {
        self.card_detection = enabled;
        self
    }

    /// Parse layout-preserving statement text.
    ///
    /// Absences are data, not errors: a document with no recognizable table
    /// and no card number yields an empty statement plus warnings.
    pub fn parse(&self, text: &str) -> ParseOutcome {
        let start = Instant::now();
        let mut warnings = Vec::new();

        let lines: Vec<&str> = text.lines().collect();
        info!("parsing statement text: {} lines", lines.len());

        let mut transactions = Vec::new();
        let mut state = ScanState::Scanning(0);
        loop {
            state = match state {
                ScanState::Scanning(cursor) => {
                    match self.detector.detect(&lines, cursor, self.format) {
                        Some(region) => ScanState::TableFound(region),
                        None => ScanState::EndOfDocument,
                    }
                }
                ScanState::TableFound(region) => {
                    let parsed = parse_table(&lines, &region, self.format);
                    debug!(
                        "table at line {} yielded {} transactions",
                        region.data_start,
                        parsed.transactions.len()
                    );
                    transactions.extend(parsed.transactions);
                    ScanState::Scanning(parsed.next_line)
                }
                ScanState::EndOfDocument => break,
            };
        }

        if self.fallback_scan {
            let mut seen: HashSet<DedupKey> = transactions.iter().filter_map(dedup_key).collect();
            for txn in self.scan_loose_rows(text) {
                let Some(key) = dedup_key(&txn) else { continue };
                if seen.insert(key) {
                    transactions.push(txn);
                }
            }
        }

        if transactions.is_empty() {
            warnings.push("no transactions found".to_string());
        }

        let card_number_last4 = if self.card_detection {
            extract_card_last4(text)
        } else {
            None
        };
        if self.card_detection && card_number_last4.is_none() {
            warnings.push("no card number found".to_string());
        }

        debug!("extracted {} transactions", transactions.len());

        ParseOutcome {
            statement: ParsedStatement { card_number_last4, transactions },
            warnings,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }

    /// Whole-document pass for two-date rows that escaped every table-level
    /// heuristic. Matches anywhere on a line are mined with the same row
    /// extraction the header-less tables use.
    fn scan_loose_rows(&self, text: &str) -> Vec<ParsedTransaction> {
        let mut found = Vec::new();
        for caps in TWO_DATES_ANYWHERE.captures_iter(text) {
            let date = &caps[1];
            if !is_valid_date(date, self.format) {
                continue;
            }
            let whole = caps.get(0).unwrap();
            let line_end = text[whole.end()..]
                .find('\n')
                .map(|offset| whole.end() + offset)
                .unwrap_or(text.len());
            let tail = &text[whole.end()..line_end];
            if let Some(txn) = pattern_row_transaction(date, tail, self.format) {
                found.push(txn);
            }
        }
        found
    }
}

fn dedup_key(txn: &ParsedTransaction) -> Option<DedupKey> {
    let description = txn
        .description
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    match (txn.debit, txn.credit) {
        (Some(value), None) => Some((txn.date.clone(), description, AmountKind::Debit, value)),
        (None, Some(value)) => Some((txn.date.clone(), description, AmountKind::Credit, value)),
        _ => None,
    }
}

/// Parse layout-preserving statement text into transactions plus an optional
/// masked account number.
///
/// Convenience wrapper over [`StatementParser`] with the default options.
pub fn parse_statement(text: &str, format: DateFormat) -> ParsedStatement {
    StatementParser::new(format).parse(text).statement
}
