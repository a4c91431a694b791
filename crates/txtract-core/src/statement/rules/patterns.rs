//! Compiled regex patterns for statement table extraction.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Column gap: a tab or a run of >=2 spaces. The upstream text extraction
    // renders significant horizontal gaps exactly this way.
    pub static ref COLUMN_GAP: Regex = Regex::new(r"\t+|[ ]{2,}").unwrap();

    // Leading date token shapes. Day-first and month-first formats share one
    // shape; the field interpretation is the caller's concern.
    pub static ref LEADING_DATE_DMY: Regex = Regex::new(
        r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})"
    ).unwrap();

    pub static ref LEADING_DATE_YMD: Regex = Regex::new(
        r"^(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})"
    ).unwrap();

    // Anchored whole-token forms used by date validation.
    pub static ref DATE_DMY_FULL: Regex = Regex::new(
        r"^(\d{1,2})[/\-](\d{1,2})[/\-](\d{4})$"
    ).unwrap();

    pub static ref DATE_YMD_FULL: Regex = Regex::new(
        r"^(\d{4})[/\-](\d{1,2})[/\-](\d{1,2})$"
    ).unwrap();

    // Two date tokens at line start (header-less table rows).
    pub static ref TWO_DATES_LINE_START: Regex = Regex::new(
        r"^\s*(\d{1,4}[/\-]\d{1,2}[/\-]\d{1,4})[ \t]+(\d{1,4}[/\-]\d{1,2}[/\-]\d{1,4})"
    ).unwrap();

    // Two adjacent date tokens anywhere on a line, separator optional so
    // concatenated pairs also match (fallback scan).
    pub static ref TWO_DATES_ANYWHERE: Regex = Regex::new(
        r"(\d{1,4}[/\-]\d{1,2}[/\-]\d{1,4})[ \t]*(\d{1,4}[/\-]\d{1,2}[/\-]\d{1,4})"
    ).unwrap();

    // Amount token: dot-grouped digits, optional comma decimal, optional
    // debit/credit marker.
    pub static ref AMOUNT_TOKEN: Regex = Regex::new(
        r"(?i)^([\d.]+)(?:,(\d+))?\s*(DR|CR|DEBIT|CREDIT)?$"
    ).unwrap();

    // "<debit> DR <credit> CR" two-slot amount form.
    pub static ref DEBIT_CREDIT_SLOTS: Regex = Regex::new(
        r"(?i)([\d.,]+)\s*DR\s+([\d.,]+)\s*CR"
    ).unwrap();

    // A number carrying an explicit trailing marker.
    pub static ref SUFFIXED_AMOUNT: Regex = Regex::new(
        r"(?i)([\d.,]+)\s*(DR|CR|DEBIT|CREDIT)\b"
    ).unwrap();

    // Bare digit run at end of line.
    pub static ref TRAILING_BARE_AMOUNT: Regex = Regex::new(
        r"([\d.]+(?:,\d+)?)\s*$"
    ).unwrap();

    // Labeled card/account numbers.
    pub static ref CARD_NUMBER_LABEL: Regex = Regex::new(
        r"(?i)card\s+number\s*:?\s*(\d{4,})"
    ).unwrap();

    pub static ref CARD_HASH_LABEL: Regex = Regex::new(
        r"(?i)card\s*#\s*:?\s*(\d{4,})"
    ).unwrap();

    pub static ref CARD_ENDING_LABEL: Regex = Regex::new(
        r"(?i)card\s+ending\s+in\s*:?\s*(\d{4,})"
    ).unwrap();

    pub static ref ACCOUNT_NUMBER_LABEL: Regex = Regex::new(
        r"(?i)account\s+number\s*:?\s*(\d{4,})"
    ).unwrap();

    // Masked card forms.
    pub static ref MASKED_GROUPS: Regex = Regex::new(
        r"\*{4} \*{4} \*{4} (\d{4})"
    ).unwrap();

    pub static ref MASKED_PREFIX: Regex = Regex::new(
        r"\*{3,}(\d{4})\b"
    ).unwrap();

    pub static ref MASKED_X_GROUPS: Regex = Regex::new(
        r"(?i)x{4} x{4} x{4} (\d{4})"
    ).unwrap();

    pub static ref MASKED_INFIX: Regex = Regex::new(
        r"(?i)\d{4,}[x*]+(\d{4})\b"
    ).unwrap();
}
