//! Small field checks shared by the domain records.

use chrono::NaiveDate;

use crate::error::{DomainError, DomainResult};

/// Reject ranges that end before they start.
pub fn ensure_date_range(start: NaiveDate, end: NaiveDate, what: &str) -> DomainResult<()> {
    if end < start {
        return Err(DomainError::validation(format!(
            "{} end date {} is before start date {}",
            what, end, start
        )));
    }
    Ok(())
}

/// Emails are compared case-insensitively and stored lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Reject empty or whitespace-only text.
pub fn ensure_not_blank(value: &str, field: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{} must not be blank", field)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn single_day_range_is_valid() {
        assert!(ensure_date_range(date(2024, 5, 1), date(2024, 5, 1), "Leave").is_ok());
    }

    #[test]
    fn inverted_range_is_rejected() {
        let err = ensure_date_range(date(2024, 5, 2), date(2024, 5, 1), "Leave").unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn blank_text_is_rejected() {
        assert!(ensure_not_blank("  ", "title").is_err());
        assert!(ensure_not_blank("Gloria", "title").is_ok());
    }
}
