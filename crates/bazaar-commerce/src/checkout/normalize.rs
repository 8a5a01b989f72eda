//! Keystroke normalization for card fields.
//!
//! Each function takes whatever the input field currently holds and returns
//! the canonical text to display. Applying a normalizer to its own output
//! returns the same text.

use crate::checkout::validation::CARD_NUMBER_DIGITS;

const CARD_GROUP: usize = 4;
const EXPIRY_DIGITS: usize = 4;
const CVV_MAX_DIGITS: usize = 4;

fn digits(raw: &str, cap: usize) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).take(cap).collect()
}

/// Digits only, at most 16.
pub fn card_digits(raw: &str) -> String {
    digits(raw, CARD_NUMBER_DIGITS)
}

/// Digits grouped in fours, e.g. `"4111111111"` becomes `"4111 1111 11"`.
pub fn normalize_card_number(raw: &str) -> String {
    let digits = card_digits(raw);
    let mut out = String::with_capacity(digits.len() + digits.len() / CARD_GROUP);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && i % CARD_GROUP == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// At most four digits, with `/` after the month once a year digit exists.
pub fn normalize_expiry(raw: &str) -> String {
    let digits = digits(raw, EXPIRY_DIGITS);
    if digits.len() > 2 {
        format!("{}/{}", &digits[..2], &digits[2..])
    } else {
        digits
    }
}

/// Digits only, at most four.
pub fn normalize_cvv(raw: &str) -> String {
    digits(raw, CVV_MAX_DIGITS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_card_grouping() {
        assert_eq!(normalize_card_number("4111111111111111"), "4111 1111 1111 1111");
        assert_eq!(normalize_card_number("41111"), "4111 1");
        assert_eq!(normalize_card_number("4111"), "4111");
        assert_eq!(normalize_card_number(""), "");
    }

    #[test]
    fn test_card_strips_and_caps() {
        assert_eq!(
            normalize_card_number("4111-1111-1111-1111-9999"),
            "4111 1111 1111 1111"
        );
        assert_eq!(card_digits("4111 1111 abc 1"), "411111111");
    }

    #[test]
    fn test_expiry() {
        assert_eq!(normalize_expiry("1"), "1");
        assert_eq!(normalize_expiry("12"), "12");
        assert_eq!(normalize_expiry("123"), "12/3");
        assert_eq!(normalize_expiry("12/345"), "12/34");
        assert_eq!(normalize_expiry("1a2b2c9"), "12/29");
    }

    #[test]
    fn test_cvv() {
        assert_eq!(normalize_cvv("12a34 5"), "1234");
        assert_eq!(normalize_cvv("99"), "99");
    }

    proptest! {
        #[test]
        fn prop_card_normalization_idempotent(s in ".{0,40}") {
            let once = normalize_card_number(&s);
            prop_assert_eq!(normalize_card_number(&once), once.clone());
        }

        #[test]
        fn prop_card_normalization_keeps_digits(s in ".{0,40}") {
            let once = normalize_card_number(&s);
            prop_assert_eq!(card_digits(&once), card_digits(&s));
            prop_assert!(once.len() <= 19);
        }

        #[test]
        fn prop_expiry_and_cvv_idempotent(s in ".{0,12}") {
            let expiry = normalize_expiry(&s);
            prop_assert_eq!(normalize_expiry(&expiry), expiry.clone());
            let cvv = normalize_cvv(&s);
            prop_assert_eq!(normalize_cvv(&cvv), cvv.clone());
        }
    }
}
