//! Field-level extraction rules shared by the table parsers.

pub mod amounts;
pub mod card;
pub mod dates;
pub mod patterns;

pub use amounts::{find_row_amount, parse_amount_token, AmountKind, AmountToken};
pub use card::extract_card_last4;
pub use dates::{is_valid_date, normalize_separator, parse_date_by_format};
