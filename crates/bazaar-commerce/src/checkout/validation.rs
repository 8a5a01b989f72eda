//! Field rules for payment input.
//!
//! All rules are pure apart from reading the clock once per expiry check.

use crate::clock::Clock;
use thiserror::Error;

/// Number of digits in an accepted card number.
pub const CARD_NUMBER_DIGITS: usize = 16;

/// Inline field error, displayed next to the offending input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationError {
    #[error("Card number must be 16 digits")]
    CardNumberLength,

    #[error("Invalid expiry format (MM/YY)")]
    ExpiryFormat,

    #[error("Card has expired")]
    Expired,

    #[error("CVV must be 3 or 4 digits")]
    CvvLength,
}

fn all_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

/// Exactly 16 ASCII digits.
pub fn validate_card_number(digits: &str) -> Result<(), ValidationError> {
    if digits.len() == CARD_NUMBER_DIGITS && all_digits(digits) {
        Ok(())
    } else {
        Err(ValidationError::CardNumberLength)
    }
}

/// Month in 1..=12 and (year, month) not before the clock's (year % 100, month).
pub fn validate_expiry(month: u32, year: u32, clock: &dyn Clock) -> Result<(), ValidationError> {
    if !(1..=12).contains(&month) || year > 99 {
        return Err(ValidationError::ExpiryFormat);
    }
    let (current_year, current_month) = clock.year_month();
    if (year, month) < (current_year, current_month) {
        return Err(ValidationError::Expired);
    }
    Ok(())
}

/// Parse `MM/YY` and apply [`validate_expiry`].
pub fn validate_expiry_text(text: &str, clock: &dyn Clock) -> Result<(), ValidationError> {
    let (month, year) = parse_expiry(text).ok_or(ValidationError::ExpiryFormat)?;
    validate_expiry(month, year, clock)
}

/// Split `MM/YY` into numeric parts. Both parts must be two digits.
pub fn parse_expiry(text: &str) -> Option<(u32, u32)> {
    let (mm, yy) = text.split_once('/')?;
    if mm.len() != 2 || yy.len() != 2 || !all_digits(mm) || !all_digits(yy) {
        return None;
    }
    Some((mm.parse().ok()?, yy.parse().ok()?))
}

/// Three or four ASCII digits.
pub fn validate_cvv(digits: &str) -> Result<(), ValidationError> {
    if matches!(digits.len(), 3 | 4) && all_digits(digits) {
        Ok(())
    } else {
        Err(ValidationError::CvvLength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    /// June 2026.
    fn clock() -> FixedClock {
        FixedClock::new(Utc.with_ymd_and_hms(2026, 6, 15, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_card_number() {
        assert!(validate_card_number("4111111111111111").is_ok());
        assert_eq!(
            validate_card_number("411111111111111"),
            Err(ValidationError::CardNumberLength)
        );
        assert!(validate_card_number("4111 1111 1111 1111").is_err());
        assert!(validate_card_number("41111111111111a1").is_err());
        assert!(validate_card_number("").is_err());
    }

    #[test]
    fn test_expiry_boundaries() {
        let clock = clock();
        assert!(validate_expiry(6, 26, &clock).is_ok());
        assert!(validate_expiry(7, 26, &clock).is_ok());
        assert!(validate_expiry(1, 27, &clock).is_ok());
        assert_eq!(validate_expiry(5, 26, &clock), Err(ValidationError::Expired));
        assert_eq!(validate_expiry(12, 25, &clock), Err(ValidationError::Expired));
        assert_eq!(validate_expiry(0, 30, &clock), Err(ValidationError::ExpiryFormat));
        assert_eq!(validate_expiry(13, 30, &clock), Err(ValidationError::ExpiryFormat));
    }

    #[test]
    fn test_expiry_text() {
        let clock = clock();
        assert_eq!(validate_expiry_text("01/20", &clock), Err(ValidationError::Expired));
        assert!(validate_expiry_text("12/29", &clock).is_ok());
        assert_eq!(validate_expiry_text("12", &clock), Err(ValidationError::ExpiryFormat));
        assert_eq!(validate_expiry_text("1/29", &clock), Err(ValidationError::ExpiryFormat));
        assert_eq!(validate_expiry_text("12/2", &clock), Err(ValidationError::ExpiryFormat));
        assert_eq!(validate_expiry_text("", &clock), Err(ValidationError::ExpiryFormat));
    }

    #[test]
    fn test_expiry_reads_clock_each_call() {
        let december = FixedClock::new(Utc.with_ymd_and_hms(2026, 12, 31, 23, 59, 59).unwrap());
        let january = FixedClock::new(Utc.with_ymd_and_hms(2027, 1, 1, 0, 0, 0).unwrap());
        assert!(validate_expiry(12, 26, &december).is_ok());
        assert_eq!(validate_expiry(12, 26, &january), Err(ValidationError::Expired));
    }

    #[test]
    fn test_cvv() {
        assert!(validate_cvv("123").is_ok());
        assert!(validate_cvv("1234").is_ok());
        assert_eq!(validate_cvv("12"), Err(ValidationError::CvvLength));
        assert!(validate_cvv("12345").is_err());
        assert!(validate_cvv("12a").is_err());
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(ValidationError::Expired.to_string(), "Card has expired");
        assert_eq!(
            ValidationError::ExpiryFormat.to_string(),
            "Invalid expiry format (MM/YY)"
        );
    }

    proptest! {
        #[test]
        fn prop_sixteen_digits_always_valid(digits in "[0-9]{16}") {
            prop_assert!(validate_card_number(&digits).is_ok());
        }

        #[test]
        fn prop_other_lengths_rejected(digits in "[0-9]{0,40}") {
            prop_assume!(digits.len() != 16);
            prop_assert!(validate_card_number(&digits).is_err());
        }

        #[test]
        fn prop_non_digit_rejected(prefix in "[0-9]{0,15}", bad in "[^0-9]", len in 0usize..16) {
            let mut s: String = prefix.chars().take(len).collect();
            s.push_str(&bad);
            while s.chars().count() < 16 {
                s.push('1');
            }
            prop_assert!(validate_card_number(&s).is_err());
        }

        #[test]
        fn prop_expiry_matches_calendar_order(month in 0u32..=14, year in 0u32..=99) {
            let clock = clock();
            let result = validate_expiry(month, year, &clock);
            if !(1..=12).contains(&month) {
                prop_assert_eq!(result, Err(ValidationError::ExpiryFormat));
            } else if (year, month) >= (26, 6) {
                prop_assert!(result.is_ok());
            } else {
                prop_assert_eq!(result, Err(ValidationError::Expired));
            }
        }
    }
}
