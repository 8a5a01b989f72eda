//! Cart-to-order workflow for the Bazaar storefront.
//!
//! This crate holds the stateful part of the storefront:
//!
//! - **Cart**: quantity changes against the remote cart, one at a time,
//!   with a short-lived status message per item
//! - **Checkout**: the Shipping → Payment → Confirmation wizard, field
//!   validation, card input formatting and order submission
//! - **Remote**: the store contract the workflow calls, plus an in-memory
//!   implementation
//!
//! The buyer is passed in as a [`Session`]; nothing is read from global
//! state.
//!
//! # Example
//!
//! ```rust,ignore
//! use bazaar_commerce::prelude::*;
//!
//! let store = Arc::new(MemoryStore::from_json(&fixture)?);
//! let session = Session::authenticated(store.buyer(&UserId::new("u1")).unwrap());
//!
//! let cart = CartCoordinator::new(store.clone(), &session, CartConfig::default())?;
//! cart.refresh().await?;
//! cart.add_one(&ItemId::new("b1"), ItemType::Book).await?;
//!
//! let mut checkout = CheckoutSession::begin(
//!     &session,
//!     Some(cart.checkout_handoff()),
//!     CheckoutConfig::default(),
//!     Arc::new(SystemClock),
//! )?;
//! checkout.continue_to_payment()?;
//! checkout.edit_card_number("4111 1111 1111 1111")?;
//! checkout.edit_expiry("12/29")?;
//! checkout.edit_cvv("123")?;
//! let outcome = checkout.place_order(store.as_ref()).await?;
//! ```

pub mod clock;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;
pub mod session;

pub mod cart;
pub mod checkout;
pub mod remote;

pub use error::{CommerceError, RemoteError};
pub use ids::*;
pub use money::Price;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::clock::{Clock, FixedClock, SystemClock};
    pub use crate::config::{CartConfig, CheckoutConfig, WorkflowConfig};
    pub use crate::error::{CommerceError, RemoteError};
    pub use crate::ids::*;
    pub use crate::money::Price;
    pub use crate::session::{Buyer, Session};

    // Cart
    pub use crate::cart::{
        CartCoordinator, CartItem, CheckoutHandoff, ItemType, MessageKind, MutationKind,
        MutationOutcome, PendingMessage,
    };

    // Checkout
    pub use crate::checkout::{
        Address, AddressField, CheckoutSession, CheckoutStep, Order, PaymentDraft, SavedAddress,
        SubmissionOutcome, ValidationError, ValidationState,
    };

    // Remote
    pub use crate::remote::{
        CreateOrderPayload, CreateOrderRequest, MemoryStore, MutationResponse, RemoteStore,
        StoreOperation, StoreSnapshot,
    };
}
