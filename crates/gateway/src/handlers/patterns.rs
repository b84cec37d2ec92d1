//! Field patterns shared by request bodies.

use once_cell::sync::Lazy;
use regex::Regex;

/// Digits with optional spaces or dashes and a leading `+`, 7 to 20 characters.
pub static PHONE_NUMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{5,18}[0-9]$").expect("phone pattern compiles"));

/// ISO 4217 style three letter code.
pub static CURRENCY_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency pattern compiles"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_numbers() {
        assert!(PHONE_NUMBER.is_match("+250 788 123 456"));
        assert!(PHONE_NUMBER.is_match("0788123456"));
        assert!(!PHONE_NUMBER.is_match("call me"));
        assert!(!PHONE_NUMBER.is_match("12"));
    }

    #[test]
    fn currency_codes() {
        assert!(CURRENCY_CODE.is_match("RWF"));
        assert!(!CURRENCY_CODE.is_match("rwf"));
        assert!(!CURRENCY_CODE.is_match("EURO"));
    }
}
