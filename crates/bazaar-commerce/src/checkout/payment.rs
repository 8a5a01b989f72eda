//! Card details captured on the payment step.

use crate::checkout::normalize::{card_digits, normalize_card_number, normalize_cvv, normalize_expiry};
use crate::checkout::validation::{
    validate_card_number, validate_cvv, validate_expiry_text, ValidationError,
};
use crate::clock::Clock;
use std::fmt;

/// Card fields as displayed in the form, always in normalized form.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct PaymentDraft {
    card_number: String,
    expiry: String,
    cvv: String,
}

impl PaymentDraft {
    /// Card number as displayed, grouped in fours.
    pub fn card_number(&self) -> &str {
        &self.card_number
    }

    /// Card number without separators.
    pub fn card_digits(&self) -> String {
        card_digits(&self.card_number)
    }

    pub fn expiry(&self) -> &str {
        &self.expiry
    }

    pub fn cvv(&self) -> &str {
        &self.cvv
    }

    /// All three fields hold something.
    pub fn is_filled(&self) -> bool {
        !self.card_number.is_empty() && !self.expiry.is_empty() && !self.cvv.is_empty()
    }

    pub(crate) fn set_card_number(&mut self, raw: &str) {
        self.card_number = normalize_card_number(raw);
    }

    pub(crate) fn set_expiry(&mut self, raw: &str) {
        self.expiry = normalize_expiry(raw);
    }

    pub(crate) fn set_cvv(&mut self, raw: &str) {
        self.cvv = normalize_cvv(raw);
    }

    /// Last four digits, for display once the full number is gone.
    pub fn last_four(&self) -> String {
        let digits = self.card_digits();
        digits[digits.len().saturating_sub(4)..].to_string()
    }
}

impl fmt::Debug for PaymentDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentDraft")
            .field("card_number", &format_args!("**** {}", self.last_four()))
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

/// Inline errors for the three payment fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationState {
    pub card_number: Option<ValidationError>,
    pub expiry: Option<ValidationError>,
    pub cvv: Option<ValidationError>,
}

impl ValidationState {
    /// Run every rule against the draft.
    pub fn evaluate(draft: &PaymentDraft, clock: &dyn Clock) -> Self {
        Self {
            card_number: card_number_error(draft),
            expiry: expiry_error(draft, clock),
            cvv: cvv_error(draft),
        }
    }

    pub fn is_clear(&self) -> bool {
        self.card_number.is_none() && self.expiry.is_none() && self.cvv.is_none()
    }
}

pub(crate) fn card_number_error(draft: &PaymentDraft) -> Option<ValidationError> {
    validate_card_number(&draft.card_digits()).err()
}

pub(crate) fn expiry_error(draft: &PaymentDraft, clock: &dyn Clock) -> Option<ValidationError> {
    validate_expiry_text(draft.expiry(), clock).err()
}

pub(crate) fn cvv_error(draft: &PaymentDraft) -> Option<ValidationError> {
    validate_cvv(draft.cvv()).err()
}
