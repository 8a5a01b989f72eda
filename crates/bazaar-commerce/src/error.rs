//! Commerce error types.

use thiserror::Error;

/// Failures of a call to the remote store.
///
/// These never escape the cart or checkout workflow as faults: they are
/// converted into pending messages or submission outcomes where they occur.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// The request never produced a response (network, timeout, closed channel).
    #[error("Transport error: {0}")]
    Transport(String),

    /// The transport answered with an error list instead of data.
    #[error("Server error: {0}")]
    Server(String),

    /// The response did not have the expected shape.
    #[error("Malformed response: {0}")]
    Malformed(String),
}

/// Errors raised by the cart and checkout workflow.
#[derive(Error, Debug)]
pub enum CommerceError {
    /// No authenticated buyer in the session.
    #[error("No authenticated buyer in session")]
    NotAuthenticated,

    /// Checkout cannot start without items.
    #[error("Cart is empty")]
    EmptyCart,

    /// Another quantity change for this cart is still in flight.
    #[error("A cart update is already in progress")]
    CartBusy,

    /// An order submission for this checkout is still in flight.
    #[error("Order submission already in progress")]
    SubmissionInFlight,

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// Checkout incomplete.
    #[error("Checkout incomplete: missing {0}")]
    CheckoutIncomplete(String),

    /// The order has been placed; the session no longer accepts input.
    #[error("Checkout already confirmed")]
    CheckoutLocked,

    /// Input was sent to a step that is not the current one.
    #[error("Cannot edit {field} during the {step} step")]
    StepMismatch { field: String, step: String },

    /// A saved address index was out of range.
    #[error("Saved address not found: {0}")]
    AddressNotFound(usize),

    /// Invalid price amount.
    #[error("Invalid price: {0}")]
    InvalidPrice(String),

    /// Remote store failure that the caller asked to see directly.
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
