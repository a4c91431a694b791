//! Masked / labeled card and account number extraction.

use regex::Regex;

use super::patterns::{
    ACCOUNT_NUMBER_LABEL, CARD_ENDING_LABEL, CARD_HASH_LABEL, CARD_NUMBER_LABEL, MASKED_GROUPS,
    MASKED_INFIX, MASKED_PREFIX, MASKED_X_GROUPS,
};

/// Scan the whole document for a masked or labeled card/account number and
/// return its last four digits.
///
/// Labeled forms are tried first (`Card Number:`, `Card #`, `Card ending
/// in`, `Account Number:`), then masked forms (`**** **** **** 1234`,
/// `***1234`, `xxxx xxxx xxxx 1234`, `402737xxxxxx9656`). Runs once,
/// independent of table detection.
pub fn extract_card_last4(text: &str) -> Option<String> {
    let labels: [&Regex; 4] = [
        &CARD_NUMBER_LABEL,
        &CARD_HASH_LABEL,
        &CARD_ENDING_LABEL,
        &ACCOUNT_NUMBER_LABEL,
    ];
    for label in labels {
        if let Some(caps) = label.captures(text) {
            let digits = &caps[1];
            return Some(digits[digits.len() - 4..].to_string());
        }
    }

    let masks: [&Regex; 4] = [&MASKED_GROUPS, &MASKED_PREFIX, &MASKED_X_GROUPS, &MASKED_INFIX];
    for mask in masks {
        if let Some(caps) = mask.captures(text) {
            return Some(caps[1].to_string());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labeled_card_number() {
        let text = "Statement Period: Jan 2024\nCard Number: 4111111111111111\n";
        assert_eq!(extract_card_last4(text), Some("1111".to_string()));
    }

    #[test]
    fn test_card_hash_and_ending_labels() {
        assert_eq!(
            extract_card_last4("Card # 5500123412349876"),
            Some("9876".to_string())
        );
        assert_eq!(
            extract_card_last4("Your Card ending in 4321 was charged"),
            Some("4321".to_string())
        );
    }

    #[test]
    fn test_account_number_label() {
        assert_eq!(
            extract_card_last4("Account Number: 00123456789"),
            Some("6789".to_string())
        );
    }

    #[test]
    fn test_masked_groups() {
        assert_eq!(
            extract_card_last4("Card: **** **** **** 1234"),
            Some("1234".to_string())
        );
    }

    #[test]
    fn test_masked_prefix() {
        assert_eq!(extract_card_last4("Acct ***4422"), Some("4422".to_string()));
        assert_eq!(extract_card_last4("Acct ****4422"), Some("4422".to_string()));
    }

    #[test]
    fn test_masked_x_groups() {
        assert_eq!(
            extract_card_last4("XXXX XXXX XXXX 8765"),
            Some("8765".to_string())
        );
    }

    #[test]
    fn test_masked_infix() {
        assert_eq!(
            extract_card_last4("Card 402737xxxxxx9656 statement"),
            Some("9656".to_string())
        );
    }

    #[test]
    fn test_label_wins_over_mask() {
        let text = "Card Number: 4111111111111111\nAlso seen: **** **** **** 9999";
        assert_eq!(extract_card_last4(text), Some("1111".to_string()));
    }

    #[test]
    fn test_no_card_number() {
        assert_eq!(extract_card_last4("No identifiers in this text"), None);
    }
}
