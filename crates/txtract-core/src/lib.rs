//! Core library for statement table extraction.
//!
//! Given raw, layout-preserving text recovered from a bank or credit-card
//! statement, this crate produces a structured list of transactions (date,
//! description, debit/credit amount) plus an optional masked account number.
//! The input carries no schema or fixed column layout; extraction is a
//! best-effort sequence of competing table heuristics:
//!
//! - single-line tables with an explicit header row
//! - header-less tables detected by their two-date row shape
//! - multi-line headers over columnar or three-line-per-transaction rows
//! - a whole-document fallback scan for rows every table pass missed
//!
//! The engine is a pure, synchronous transform with no I/O and no shared
//! state; concurrent invocations over independent documents need no locking.

pub mod error;
pub mod models;
pub mod statement;

pub use error::{ExtractionError, Result, TxtractError};
pub use models::statement::{DateFormat, ParsedStatement, ParsedTransaction};
pub use statement::{parse_statement, ParseOutcome, StatementParser};
