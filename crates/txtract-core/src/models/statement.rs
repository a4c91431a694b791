//! Statement output models and the date format configuration.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::TxtractError;

/// Statement date formats supported by the engine.
///
/// A caller-supplied configuration value, never inferred from the document.
/// Input parsing accepts `/` and `-` interchangeably regardless of the
/// declared separator; emitted dates use the separator the format implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateFormat {
    #[serde(rename = "DD/MM/YYYY")]
    DayMonthYearSlash,
    #[serde(rename = "MM/DD/YYYY")]
    MonthDayYearSlash,
    #[serde(rename = "YYYY-MM-DD")]
    YearMonthDayDash,
    #[serde(rename = "DD-MM-YYYY")]
    DayMonthYearDash,
    #[serde(rename = "MM-DD-YYYY")]
    MonthDayYearDash,
}

/// Field reading order implied by a [`DateFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOrder {
    DayFirst,
    MonthFirst,
    YearFirst,
}

impl DateFormat {
    /// Separator used when emitting canonical dates.
    pub fn separator(&self) -> char {
        match self {
            DateFormat::DayMonthYearSlash | DateFormat::MonthDayYearSlash => '/',
            DateFormat::YearMonthDayDash
            | DateFormat::DayMonthYearDash
            | DateFormat::MonthDayYearDash => '-',
        }
    }

    /// How the numeric fields of a matching token are read.
    pub fn field_order(&self) -> FieldOrder {
        match self {
            DateFormat::YearMonthDayDash => FieldOrder::YearFirst,
            DateFormat::MonthDayYearSlash | DateFormat::MonthDayYearDash => FieldOrder::MonthFirst,
            DateFormat::DayMonthYearSlash | DateFormat::DayMonthYearDash => FieldOrder::DayFirst,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            DateFormat::DayMonthYearSlash => "DD/MM/YYYY",
            DateFormat::MonthDayYearSlash => "MM/DD/YYYY",
            DateFormat::YearMonthDayDash => "YYYY-MM-DD",
            DateFormat::DayMonthYearDash => "DD-MM-YYYY",
            DateFormat::MonthDayYearDash => "MM-DD-YYYY",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = TxtractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DD/MM/YYYY" => Ok(DateFormat::DayMonthYearSlash),
            "MM/DD/YYYY" => Ok(DateFormat::MonthDayYearSlash),
            "YYYY-MM-DD" => Ok(DateFormat::YearMonthDayDash),
            "DD-MM-YYYY" => Ok(DateFormat::DayMonthYearDash),
            "MM-DD-YYYY" => Ok(DateFormat::MonthDayYearDash),
            other => Err(TxtractError::UnknownDateFormat(other.to_string())),
        }
    }
}

/// One extracted statement row.
///
/// Exactly one of `debit`/`credit` is set on every emitted transaction, and
/// the set side is strictly positive. A row that resolves to neither is
/// discarded during parsing rather than emitted half-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    /// Transaction date in the canonical form of the configured format.
    pub date: String,

    /// Merchant/narrative text, trimmed, never empty.
    pub description: String,

    /// Charge amount, when the row is a debit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debit: Option<Decimal>,

    /// Payment/refund amount, when the row is a credit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credit: Option<Decimal>,
}

/// Everything extracted from one statement document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedStatement {
    /// Last four digits of a masked or labeled card/account number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_number_last4: Option<String>,

    /// Transactions in table-discovery document order, with post-dedup
    /// fallback-scan matches appended last.
    pub transactions: Vec<ParsedTransaction>,
}
