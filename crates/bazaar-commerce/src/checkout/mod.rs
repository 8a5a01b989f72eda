//! Checkout module.
//!
//! Contains the step machine, addresses, card capture and validation, and
//! the order types returned by the store.

mod address;
mod flow;
mod normalize;
mod order;
mod payment;
mod submission;
mod validation;

pub use address::{is_address_complete, Address, AddressField, SavedAddress};
pub use flow::{CheckoutSession, CheckoutStep};
pub use normalize::{card_digits, normalize_card_number, normalize_cvv, normalize_expiry};
pub use order::{Order, OrderLineItem};
pub use payment::{PaymentDraft, ValidationState};
pub use submission::SubmissionOutcome;
pub use validation::{
    parse_expiry, validate_card_number, validate_cvv, validate_expiry, validate_expiry_text,
    ValidationError, CARD_NUMBER_DIGITS,
};
