//! Amount token parsing.
//!
//! Statement amounts in this domain group thousands with `.` and mark the
//! decimal point with `,` (Vietnamese-formatted statements); debit/credit is
//! carried by a trailing `DR`/`CR`/`DEBIT`/`CREDIT` marker.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::patterns::{AMOUNT_TOKEN, DEBIT_CREDIT_SLOTS, SUFFIXED_AMOUNT, TRAILING_BARE_AMOUNT};

/// Longest digit run accepted in a single amount. Two adjacent numbers that
/// lost their separating whitespace produce runs longer than this.
pub const MAX_AMOUNT_DIGITS: usize = 12;

/// Debit/credit classification of an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountKind {
    Debit,
    Credit,
}

impl AmountKind {
    fn from_marker(marker: &str) -> Self {
        match marker.to_ascii_uppercase().as_str() {
            "CR" | "CREDIT" => AmountKind::Credit,
            _ => AmountKind::Debit,
        }
    }
}

/// A parsed monetary token. `value` is strictly positive.
#[derive(Debug, Clone, PartialEq)]
pub struct AmountToken {
    pub value: Decimal,
    /// Marker-derived classification; `None` when the token carried no
    /// suffix. Defaulting an unmarked token is the caller's concern.
    pub kind: Option<AmountKind>,
}

/// Parse one numeric token into an amount.
///
/// Returns `None` for non-numeric tokens, zero values, and digit runs
/// exceeding [`MAX_AMOUNT_DIGITS`].
pub fn parse_amount_token(token: &str) -> Option<AmountToken> {
    let caps = AMOUNT_TOKEN.captures(token.trim())?;
    let value = decimal_from_parts(&caps[1], caps.get(2).map(|m| m.as_str()))?;
    if value.is_zero() {
        return None;
    }
    let kind = caps.get(3).map(|m| AmountKind::from_marker(m.as_str()));
    Some(AmountToken { value, kind })
}

/// Locate the amount expression in the free-text remainder of a transaction
/// row. Returns the token and the byte offset where the expression starts,
/// so the description can be cut in front of it.
///
/// Priority: the `"<n> DR <n> CR"` two-slot form (non-zero slot wins, debit
/// first), then the last explicitly suffixed number, then a bare trailing
/// digit run (unmarked).
pub fn find_row_amount(tail: &str) -> Option<(AmountToken, usize)> {
    if let Some(caps) = DEBIT_CREDIT_SLOTS.captures(tail) {
        let start = caps.get(0).unwrap().start();
        let debit = decimal_from_slot(&caps[1]);
        let credit = decimal_from_slot(&caps[2]);
        match (debit, credit) {
            (Some(value), _) if !value.is_zero() => {
                return Some((AmountToken { value, kind: Some(AmountKind::Debit) }, start));
            }
            (_, Some(value)) if !value.is_zero() => {
                return Some((AmountToken { value, kind: Some(AmountKind::Credit) }, start));
            }
            _ => {}
        }
    }

    if let Some(caps) = SUFFIXED_AMOUNT.captures_iter(tail).last() {
        let whole = caps.get(0).unwrap();
        if let Some(token) = parse_amount_token(whole.as_str()) {
            return Some((token, whole.start()));
        }
        return None;
    }

    let caps = TRAILING_BARE_AMOUNT.captures(tail)?;
    let m = caps.get(1).unwrap();
    let token = parse_amount_token(m.as_str())?;
    Some((token, m.start()))
}

/// Build a decimal from a dot-grouped integer part and an optional decimal
/// part split off at a comma.
fn decimal_from_parts(integer: &str, decimal: Option<&str>) -> Option<Decimal> {
    let digits: String = integer.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() || digits.len() > MAX_AMOUNT_DIGITS {
        return None;
    }
    let repr = match decimal {
        Some(frac) => format!("{digits}.{frac}"),
        None => digits,
    };
    Decimal::from_str(&repr).ok()
}

/// Parse one slot of the two-slot form. Zero is meaningful here: it marks
/// the unused side.
fn decimal_from_slot(slot: &str) -> Option<Decimal> {
    match slot.split_once(',') {
        Some((integer, frac)) => decimal_from_parts(integer, Some(frac)),
        None => decimal_from_parts(slot, None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_dot_is_thousands_separator() {
        let token = parse_amount_token("4.500 DR").unwrap();
        assert_eq!(token.value, dec("4500"));
        assert_eq!(token.kind, Some(AmountKind::Debit));

        let token = parse_amount_token("1.234.567").unwrap();
        assert_eq!(token.value, dec("1234567"));
        assert_eq!(token.kind, None);
    }

    #[test]
    fn test_comma_is_decimal_point() {
        let token = parse_amount_token("12,5").unwrap();
        assert_eq!(token.value, dec("12.5"));

        let token = parse_amount_token("1.234,56 CR").unwrap();
        assert_eq!(token.value, dec("1234.56"));
        assert_eq!(token.kind, Some(AmountKind::Credit));
    }

    #[test]
    fn test_markers_case_insensitive() {
        assert_eq!(
            parse_amount_token("2.000 credit").unwrap().kind,
            Some(AmountKind::Credit)
        );
        assert_eq!(
            parse_amount_token("2.000 debit").unwrap().kind,
            Some(AmountKind::Debit)
        );
    }

    #[test]
    fn test_rejects_zero_and_garbage() {
        assert!(parse_amount_token("0").is_none());
        assert!(parse_amount_token("0,00").is_none());
        assert!(parse_amount_token("POS").is_none());
        assert!(parse_amount_token("").is_none());
    }

    #[test]
    fn test_rejects_concatenated_digit_runs() {
        // Two amounts fused without a separator exceed the digit cap.
        assert!(parse_amount_token("4500000001200000").is_none());
        assert!(parse_amount_token("123456789012").is_some());
    }

    #[test]
    fn test_two_slot_form_picks_nonzero_side() {
        let (token, start) = find_row_amount("9941  MOCA  40.000 DR  0 CR").unwrap();
        assert_eq!(token.value, dec("40000"));
        assert_eq!(token.kind, Some(AmountKind::Debit));
        assert_eq!(start, 12);

        let (token, _) = find_row_amount("TRANSFER IN  0 DR  15.000 CR").unwrap();
        assert_eq!(token.value, dec("15000"));
        assert_eq!(token.kind, Some(AmountKind::Credit));
    }

    #[test]
    fn test_suffixed_fallback() {
        let (token, start) = find_row_amount("COFFEE HOUSE 55.000 DR").unwrap();
        assert_eq!(token.value, dec("55000"));
        assert_eq!(token.kind, Some(AmountKind::Debit));
        assert_eq!(start, 13);
    }

    #[test]
    fn test_bare_trailing_fallback_is_unmarked() {
        let (token, _) = find_row_amount("TAXI 120.000").unwrap();
        assert_eq!(token.value, dec("120000"));
        assert_eq!(token.kind, None);
    }

    #[test]
    fn test_no_amount() {
        assert!(find_row_amount("NO NUMBERS HERE").is_none());
        assert!(find_row_amount("0 DR  0 CR").is_none());
    }
}
