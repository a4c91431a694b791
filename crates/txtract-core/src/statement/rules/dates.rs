//! Date validation and normalization against the configured format.

use chrono::NaiveDate;

use crate::models::statement::{DateFormat, FieldOrder};

use super::patterns::{DATE_DMY_FULL, DATE_YMD_FULL, LEADING_DATE_DMY, LEADING_DATE_YMD};

/// Year bounds accepted on statement rows.
const MIN_YEAR: i32 = 1900;
const MAX_YEAR: i32 = 2100;

/// Whether `candidate` is a real calendar date under `format`.
///
/// Either `/` or `-` is accepted as separator. Fields are read in the order
/// the format declares, range-checked, and round-tripped through calendar
/// construction so the likes of Feb 30 are rejected.
pub fn is_valid_date(candidate: &str, format: DateFormat) -> bool {
    let Some((day, month, year)) = split_fields(candidate.trim(), format) else {
        return false;
    };
    if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
        return false;
    }
    if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
        return false;
    }
    NaiveDate::from_ymd_opt(year, month, day).is_some()
}

fn split_fields(candidate: &str, format: DateFormat) -> Option<(u32, u32, i32)> {
    match format.field_order() {
        FieldOrder::YearFirst => {
            let caps = DATE_YMD_FULL.captures(candidate)?;
            let year = caps[1].parse().unwrap_or(0);
            let month = caps[2].parse().unwrap_or(0);
            let day = caps[3].parse().unwrap_or(0);
            Some((day, month, year))
        }
        order => {
            let caps = DATE_DMY_FULL.captures(candidate)?;
            let first: u32 = caps[1].parse().unwrap_or(0);
            let second: u32 = caps[2].parse().unwrap_or(0);
            let year = caps[3].parse().unwrap_or(0);
            match order {
                FieldOrder::MonthFirst => Some((second, first, year)),
                _ => Some((first, second, year)),
            }
        }
    }
}

/// Extract the leading date-shaped substring of `raw`, tolerant of whatever
/// trails it (including a second concatenated date token).
///
/// Returns the input unchanged when nothing date-shaped leads it; callers
/// must re-validate with [`is_valid_date`].
pub fn parse_date_by_format(raw: &str, format: DateFormat) -> String {
    match leading_date_token(raw, format) {
        Some(token) => token.to_string(),
        None => raw.to_string(),
    }
}

/// The date-shaped token a string starts with, if any.
pub fn leading_date_token(s: &str, format: DateFormat) -> Option<&str> {
    let s = s.trim_start();
    let re = match format.field_order() {
        FieldOrder::YearFirst => &*LEADING_DATE_YMD,
        _ => &*LEADING_DATE_DMY,
    };
    re.find(s).map(|m| m.as_str())
}

/// Rewrite a date's separators to the one the declared format emits.
pub fn normalize_separator(raw: &str, format: DateFormat) -> String {
    let sep = format.separator();
    raw.chars()
        .map(|c| if c == '/' || c == '-' { sep } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_day_first() {
        assert!(is_valid_date("01/02/2024", DateFormat::DayMonthYearSlash));
        assert!(is_valid_date("31/12/2024", DateFormat::DayMonthYearSlash));
        // Separator tolerance: dashes accepted under a slash format.
        assert!(is_valid_date("06-12-2025", DateFormat::DayMonthYearSlash));
    }

    #[test]
    fn test_month_13_rejected() {
        assert!(!is_valid_date("13/13/2024", DateFormat::DayMonthYearSlash));
        assert!(!is_valid_date("13/13/2024", DateFormat::MonthDayYearSlash));
    }

    #[test]
    fn test_calendar_invalid_rejected() {
        assert!(!is_valid_date("30/02/2024", DateFormat::DayMonthYearSlash));
        assert!(!is_valid_date("02/30/2024", DateFormat::MonthDayYearSlash));
        assert!(!is_valid_date("2023-02-29", DateFormat::YearMonthDayDash));
    }

    #[test]
    fn test_field_order_by_format() {
        // Day 28 of month 2 vs month 28.
        assert!(is_valid_date("28/02/2024", DateFormat::DayMonthYearSlash));
        assert!(!is_valid_date("28/02/2024", DateFormat::MonthDayYearSlash));
        assert!(is_valid_date("02/28/2024", DateFormat::MonthDayYearSlash));
    }

    #[test]
    fn test_year_first() {
        assert!(is_valid_date("2024-02-01", DateFormat::YearMonthDayDash));
        assert!(!is_valid_date("01-02-2024", DateFormat::YearMonthDayDash));
    }

    #[test]
    fn test_year_bounds() {
        assert!(!is_valid_date("01/01/1899", DateFormat::DayMonthYearSlash));
        assert!(!is_valid_date("01/01/2101", DateFormat::DayMonthYearSlash));
        assert!(is_valid_date("01/01/1900", DateFormat::DayMonthYearSlash));
    }

    #[test]
    fn test_parse_date_extracts_leading_token() {
        assert_eq!(
            parse_date_by_format("01/02/2024Balance", DateFormat::DayMonthYearSlash),
            "01/02/2024"
        );
        // Concatenated double date collapses to the first.
        assert_eq!(
            parse_date_by_format("06/12/202506/12/2025", DateFormat::DayMonthYearSlash),
            "06/12/2025"
        );
        assert_eq!(
            parse_date_by_format("2025-12-06 GRAB", DateFormat::YearMonthDayDash),
            "2025-12-06"
        );
    }

    #[test]
    fn test_parse_date_returns_input_when_shapeless() {
        assert_eq!(
            parse_date_by_format("COFFEE SHOP", DateFormat::DayMonthYearSlash),
            "COFFEE SHOP"
        );
    }

    #[test]
    fn test_normalize_separator() {
        assert_eq!(
            normalize_separator("06/12/2025", DateFormat::DayMonthYearDash),
            "06-12-2025"
        );
        assert_eq!(
            normalize_separator("06-12-2025", DateFormat::DayMonthYearSlash),
            "06/12/2025"
        );
    }
}
