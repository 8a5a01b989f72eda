//! Checkout step machine.
//!
//! A session walks `Shipping -> Payment -> Confirmation`. The only backward
//! edge is Payment to Shipping, and Confirmation is terminal: once an order
//! is placed the session refuses every further input.

use crate::cart::CheckoutHandoff;
use crate::checkout::address::{Address, AddressField, SavedAddress};
use crate::checkout::payment::{self, PaymentDraft, ValidationState};
use crate::checkout::submission::SubmissionOutcome;
use crate::checkout::Order;
use crate::clock::Clock;
use crate::config::CheckoutConfig;
use crate::error::{CommerceError, RemoteError};
use crate::ids::UserId;
use crate::money::Price;
use crate::remote::{CartItemInput, CreateOrderPayload, CreateOrderRequest, PaymentInput, RemoteStore};
use crate::session::Session;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutStep {
    /// Shipping address selection.
    Shipping,
    /// Card details.
    Payment,
    /// Order placed.
    Confirmation,
}

impl CheckoutStep {
    pub const ALL: [CheckoutStep; 3] = [
        CheckoutStep::Shipping,
        CheckoutStep::Payment,
        CheckoutStep::Confirmation,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Confirmation => "confirmation",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Confirmation => "Confirmation",
        }
    }

    /// Get the step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Shipping => 1,
            CheckoutStep::Payment => 2,
            CheckoutStep::Confirmation => 3,
        }
    }

    /// Label of the forward button, if the step has one.
    pub fn action_label(&self, submitting: bool) -> Option<&'static str> {
        match self {
            _ if submitting => Some("Processing…"),
            CheckoutStep::Shipping => Some("Next"),
            CheckoutStep::Payment => Some("Place Order"),
            CheckoutStep::Confirmation => None,
        }
    }
}

/// All state collected across the checkout wizard for one buyer.
pub struct CheckoutSession {
    user_id: UserId,
    handoff: CheckoutHandoff,
    step: CheckoutStep,
    /// Read-only, from the buyer profile.
    billing: Address,
    shipping: Address,
    saved_shipping: Vec<SavedAddress>,
    use_same_address: bool,
    payment: PaymentDraft,
    validation: ValidationState,
    is_submitting: bool,
    placed_order: Option<Order>,
    last_error: Option<String>,
    clock: Arc<dyn Clock>,
    config: CheckoutConfig,
}

impl CheckoutSession {
    /// Start checkout for the session's buyer with the cart snapshot.
    ///
    /// A missing hand-off is treated as an empty cart, which cannot be
    /// checked out.
    pub fn begin(
        session: &Session,
        handoff: Option<CheckoutHandoff>,
        config: CheckoutConfig,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CommerceError> {
        let buyer = session.require_buyer()?;
        let handoff = CheckoutHandoff::or_empty(handoff);
        if handoff.is_empty() {
            return Err(CommerceError::EmptyCart);
        }

        tracing::debug!(user_id = %buyer.id, lines = handoff.cart_items.len(), "checkout started");
        Ok(Self {
            user_id: buyer.id.clone(),
            handoff,
            step: CheckoutStep::Shipping,
            billing: buyer.billing_address(),
            shipping: buyer.default_shipping_address(),
            saved_shipping: buyer.shipping.clone(),
            use_same_address: true,
            payment: PaymentDraft::default(),
            validation: ValidationState::default(),
            is_submitting: false,
            placed_order: None,
            last_error: None,
            clock,
            config,
        })
    }

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn handoff(&self) -> &CheckoutHandoff {
        &self.handoff
    }

    pub fn total_price(&self) -> Price {
        self.handoff.total_price
    }

    pub fn billing(&self) -> &Address {
        &self.billing
    }

    pub fn shipping(&self) -> &Address {
        &self.shipping
    }

    pub fn saved_shipping_addresses(&self) -> &[SavedAddress] {
        &self.saved_shipping
    }

    pub fn use_same_address(&self) -> bool {
        self.use_same_address
    }

    /// The address that ships: billing when `use_same_address` is set.
    pub fn active_shipping_address(&self) -> &Address {
        if self.use_same_address {
            &self.billing
        } else {
            &self.shipping
        }
    }

    pub fn payment(&self) -> &PaymentDraft {
        &self.payment
    }

    pub fn validation(&self) -> &ValidationState {
        &self.validation
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_confirmed(&self) -> bool {
        self.placed_order.is_some()
    }

    pub fn placed_order(&self) -> Option<&Order> {
        self.placed_order.as_ref()
    }

    /// Failure from the last submission attempt, cleared on the next one.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Label for the forward button of the current step.
    pub fn action_label(&self) -> Option<&'static str> {
        self.step.action_label(self.is_submitting)
    }

    // Shipping

    /// Edit one field of the shipping address.
    pub fn edit_shipping_field(
        &mut self,
        field: AddressField,
        value: impl Into<String>,
    ) -> Result<(), CommerceError> {
        self.ensure_editable(CheckoutStep::Shipping, field.as_str())?;
        self.shipping.set(field, value);
        Ok(())
    }

    /// Pick one of the buyer's saved shipping addresses.
    pub fn select_shipping_address(&mut self, index: usize) -> Result<(), CommerceError> {
        self.ensure_editable(CheckoutStep::Shipping, "shipping address")?;
        let saved = self
            .saved_shipping
            .get(index)
            .ok_or(CommerceError::AddressNotFound(index))?;
        self.shipping = saved.address();
        self.use_same_address = false;
        Ok(())
    }

    pub fn set_use_same_address(&mut self, same: bool) -> Result<(), CommerceError> {
        self.ensure_editable(CheckoutStep::Shipping, "use same address")?;
        self.use_same_address = same;
        Ok(())
    }

    /// Whether the Shipping step may advance.
    pub fn can_continue(&self) -> bool {
        self.step == CheckoutStep::Shipping
            && !self.is_submitting
            && self.active_shipping_address().is_complete()
    }

    /// Shipping to Payment.
    pub fn continue_to_payment(&mut self) -> Result<CheckoutStep, CommerceError> {
        self.ensure_unlocked()?;
        if self.step != CheckoutStep::Shipping {
            return Err(self.invalid_transition(CheckoutStep::Payment));
        }
        let missing = self.active_shipping_address().missing_fields();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(AddressField::as_str).collect();
            return Err(CommerceError::CheckoutIncomplete(names.join(", ")));
        }
        self.transition(CheckoutStep::Payment);
        Ok(self.step)
    }

    /// Payment back to Shipping. Entered values are kept.
    pub fn back(&mut self) -> Result<CheckoutStep, CommerceError> {
        self.ensure_unlocked()?;
        if self.is_submitting {
            return Err(CommerceError::SubmissionInFlight);
        }
        if self.step != CheckoutStep::Payment {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: "none".to_string(),
            });
        }
        self.transition(CheckoutStep::Shipping);
        Ok(self.step)
    }

    // Payment

    pub fn edit_card_number(&mut self, raw: &str) -> Result<(), CommerceError> {
        self.ensure_editable(CheckoutStep::Payment, "card number")?;
        self.payment.set_card_number(raw);
        self.validation.card_number = payment::card_number_error(&self.payment);
        Ok(())
    }

    pub fn edit_expiry(&mut self, raw: &str) -> Result<(), CommerceError> {
        self.ensure_editable(CheckoutStep::Payment, "expiry")?;
        self.payment.set_expiry(raw);
        self.validation.expiry = payment::expiry_error(&self.payment, self.clock.as_ref());
        Ok(())
    }

    pub fn edit_cvv(&mut self, raw: &str) -> Result<(), CommerceError> {
        self.ensure_editable(CheckoutStep::Payment, "cvv")?;
        self.payment.set_cvv(raw);
        self.validation.cvv = payment::cvv_error(&self.payment);
        Ok(())
    }

    /// Whether "Place Order" is enabled.
    pub fn can_place_order(&self) -> bool {
        self.step == CheckoutStep::Payment
            && !self.is_submitting
            && self.payment.is_filled()
            && self.validation.is_clear()
    }

    // Submission

    /// Re-validate everything and build the outbound request.
    ///
    /// Marks the session as submitting; the caller must hand the store's
    /// reply to [`finish_submission`](Self::finish_submission).
    pub fn begin_submission(&mut self) -> Result<CreateOrderRequest, CommerceError> {
        self.ensure_unlocked()?;
        if self.is_submitting {
            return Err(CommerceError::SubmissionInFlight);
        }
        if self.step != CheckoutStep::Payment {
            return Err(self.invalid_transition(CheckoutStep::Confirmation));
        }

        // Final gate: the clock may have rolled over since the last edit.
        self.validation = ValidationState::evaluate(&self.payment, self.clock.as_ref());
        let missing = self.missing_for_submission();
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(missing.join(", ")));
        }

        let request = CreateOrderRequest {
            user_id: self.user_id.clone(),
            items: self.handoff.cart_items.iter().map(CartItemInput::from).collect(),
            total_price: self.handoff.total_price,
            billing: self.billing.clone(),
            shipping: self.active_shipping_address().clone(),
            payment: PaymentInput::from(&self.payment),
        };
        self.is_submitting = true;
        self.last_error = None;
        tracing::debug!(user_id = %self.user_id, "order submission started");
        Ok(request)
    }

    /// Apply the store's reply to a submission started with
    /// [`begin_submission`](Self::begin_submission).
    ///
    /// Refused unless a submission is in flight on the Payment step, so
    /// Confirmation is only reachable through a request that was built and
    /// sent.
    pub fn finish_submission(
        &mut self,
        result: Result<CreateOrderPayload, RemoteError>,
    ) -> Result<SubmissionOutcome, CommerceError> {
        self.ensure_unlocked()?;
        if !self.is_submitting || self.step != CheckoutStep::Payment {
            tracing::warn!(step = self.step.as_str(), "reply received with no submission in flight");
            return Err(self.invalid_transition(CheckoutStep::Confirmation));
        }

        let outcome = SubmissionOutcome::interpret(result, &self.config.generic_failure_message);
        self.is_submitting = false;

        match &outcome {
            SubmissionOutcome::Placed(order) => {
                tracing::info!(order_id = %order.id, total = %order.total_price, "order placed");
                self.placed_order = Some(order.clone());
                self.payment = PaymentDraft::default();
                self.validation = ValidationState::default();
                self.transition(CheckoutStep::Confirmation);
            }
            SubmissionOutcome::Rejected(message) | SubmissionOutcome::Failed(message) => {
                self.last_error = Some(message.clone());
            }
        }
        Ok(outcome)
    }

    /// Submit the order once and apply the reply.
    ///
    /// Remote failures come back as a [`SubmissionOutcome`]; `Err` means the
    /// session was not in a state to submit and no call was made.
    ///
    /// Dropping the returned future before the store replies leaves the
    /// session on Payment with submission re-enabled. The store may still
    /// have created the order.
    #[instrument(skip(self, store), fields(user_id = %self.user_id))]
    pub async fn place_order<S>(&mut self, store: &S) -> Result<SubmissionOutcome, CommerceError>
    where
        S: RemoteStore + ?Sized,
    {
        let request = self.begin_submission()?;
        let in_flight = InFlight::arm(&mut self.is_submitting);
        let result = store.create_order(request).await;
        in_flight.disarm();
        self.finish_submission(result)
    }

    fn missing_for_submission(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if !self.active_shipping_address().is_complete() {
            missing.push("shipping address");
        }
        if self.payment.card_number().is_empty() || self.validation.card_number.is_some() {
            missing.push("card number");
        }
        if self.payment.expiry().is_empty() || self.validation.expiry.is_some() {
            missing.push("expiry");
        }
        if self.payment.cvv().is_empty() || self.validation.cvv.is_some() {
            missing.push("cvv");
        }
        missing
    }

    fn ensure_unlocked(&self) -> Result<(), CommerceError> {
        if self.placed_order.is_some() {
            Err(CommerceError::CheckoutLocked)
        } else {
            Ok(())
        }
    }

    fn ensure_editable(&self, step: CheckoutStep, field: &str) -> Result<(), CommerceError> {
        self.ensure_unlocked()?;
        if self.is_submitting {
            return Err(CommerceError::SubmissionInFlight);
        }
        if self.step != step {
            return Err(CommerceError::StepMismatch {
                field: field.to_string(),
                step: self.step.as_str().to_string(),
            });
        }
        Ok(())
    }

    fn invalid_transition(&self, to: CheckoutStep) -> CommerceError {
        CommerceError::InvalidCheckoutTransition {
            from: self.step.as_str().to_string(),
            to: to.as_str().to_string(),
        }
    }

    fn transition(&mut self, to: CheckoutStep) {
        tracing::debug!(from = self.step.as_str(), to = to.as_str(), "checkout step");
        self.step = to;
    }
}

/// Clears the submitting flag if a submission is abandoned mid-call.
struct InFlight<'a> {
    flag: &'a mut bool,
    armed: bool,
}

impl<'a> InFlight<'a> {
    fn arm(flag: &'a mut bool) -> Self {
        Self { flag, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.armed {
            *self.flag = false;
            tracing::warn!("order submission dropped before the store replied");
        }
    }
}

impl std::fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("user_id", &self.user_id)
            .field("step", &self.step)
            .field("use_same_address", &self.use_same_address)
            .field("payment", &self.payment)
            .field("is_submitting", &self.is_submitting)
            .field("placed_order", &self.placed_order.as_ref().map(|o| &o.id))
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::{CartItem, ItemType};
    use crate::checkout::ValidationError;
    use crate::clock::FixedClock;
    use crate::remote::{CatalogItem, MemoryStore, StoreOperation};
    use crate::session::Buyer;
    use chrono::{TimeZone, Utc};
    use serde_json::json;
    use std::time::Duration;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2026, 6, 15, 12, 0, 0).unwrap()))
    }

    fn home() -> SavedAddress {
        serde_json::from_value(json!({
            "type": "home", "street": "1 Main St", "city": "Springfield",
            "state": "IL", "zip": "62701", "country": "US", "__typename": "Address"
        }))
        .unwrap()
    }

    fn buyer() -> Buyer {
        Buyer::new("u1")
            .with_billing(home())
            .with_shipping(home())
            .with_shipping(Address::new("", "X", "Y", "1", "US"))
    }

    fn handoff() -> CheckoutHandoff {
        CheckoutHandoff::from_items(vec![CartItem::new(
            "b1",
            ItemType::Book,
            "Dune",
            2,
            Price::from_cents(1000),
        )])
    }

    fn session() -> CheckoutSession {
        CheckoutSession::begin(
            &Session::authenticated(buyer()),
            Some(handoff()),
            CheckoutConfig::default(),
            clock(),
        )
        .unwrap()
    }

    fn store() -> MemoryStore {
        MemoryStore::new().with_catalog_item(CatalogItem::new(
            "b1",
            ItemType::Book,
            "Dune",
            Price::from_cents(1000),
        ))
    }

    fn at_payment() -> CheckoutSession {
        let mut checkout = session();
        checkout.continue_to_payment().unwrap();
        checkout.edit_card_number("4111 1111 1111 1111").unwrap();
        checkout.edit_expiry("12/29").unwrap();
        checkout.edit_cvv("123").unwrap();
        checkout
    }

    #[test]
    fn test_begin_requires_buyer_and_items() {
        let config = CheckoutConfig::default;
        assert!(matches!(
            CheckoutSession::begin(&Session::anonymous(), Some(handoff()), config(), clock()),
            Err(CommerceError::NotAuthenticated)
        ));
        assert!(matches!(
            CheckoutSession::begin(&Session::authenticated(buyer()), None, config(), clock()),
            Err(CommerceError::EmptyCart)
        ));
    }

    #[test]
    fn test_initial_state() {
        let checkout = session();
        assert_eq!(checkout.step(), CheckoutStep::Shipping);
        assert!(checkout.use_same_address());
        assert_eq!(checkout.shipping().street, "1 Main St");
        assert_eq!(checkout.action_label(), Some("Next"));
        assert_eq!(checkout.total_price().cents(), 2000);
    }

    #[test]
    fn test_incomplete_shipping_blocks_then_unblocks() {
        let mut checkout = session();
        checkout.select_shipping_address(1).unwrap();
        assert!(!checkout.use_same_address());
        assert!(!checkout.can_continue());
        assert!(matches!(
            checkout.continue_to_payment(),
            Err(CommerceError::CheckoutIncomplete(ref m)) if m == "street"
        ));

        checkout.edit_shipping_field(AddressField::Street, "2 Elm St").unwrap();
        assert!(checkout.can_continue());
        assert_eq!(checkout.continue_to_payment().unwrap(), CheckoutStep::Payment);
    }

    #[test]
    fn test_same_address_uses_billing() {
        let mut checkout = session();
        checkout.select_shipping_address(1).unwrap();
        checkout.set_use_same_address(true).unwrap();
        assert!(checkout.can_continue());
        assert_eq!(checkout.active_shipping_address(), checkout.billing());
    }

    #[test]
    fn test_unknown_saved_address() {
        let mut checkout = session();
        assert!(matches!(
            checkout.select_shipping_address(7),
            Err(CommerceError::AddressNotFound(7))
        ));
    }

    #[test]
    fn test_edits_rejected_in_wrong_step() {
        let mut checkout = session();
        assert!(matches!(
            checkout.edit_cvv("123"),
            Err(CommerceError::StepMismatch { .. })
        ));
        checkout.continue_to_payment().unwrap();
        assert!(matches!(
            checkout.edit_shipping_field(AddressField::City, "Elsewhere"),
            Err(CommerceError::StepMismatch { .. })
        ));
        assert!(checkout.continue_to_payment().is_err());
    }

    #[test]
    fn test_expired_card_blocks_place_order() {
        let mut checkout = session();
        checkout.continue_to_payment().unwrap();
        checkout.edit_card_number("4111111111111111").unwrap();
        checkout.edit_expiry("01/20").unwrap();
        checkout.edit_cvv("123").unwrap();

        assert_eq!(checkout.validation().expiry, Some(ValidationError::Expired));
        assert_eq!(
            checkout.validation().expiry.unwrap().to_string(),
            "Card has expired"
        );
        assert!(!checkout.can_place_order());
        assert!(matches!(
            checkout.begin_submission(),
            Err(CommerceError::CheckoutIncomplete(ref m)) if m == "expiry"
        ));
        assert!(!checkout.is_submitting());
    }

    #[test]
    fn test_back_preserves_data() {
        let mut checkout = at_payment();
        assert_eq!(checkout.back().unwrap(), CheckoutStep::Shipping);
        assert_eq!(checkout.payment().card_number(), "4111 1111 1111 1111");
        assert!(checkout.back().is_err());

        checkout.continue_to_payment().unwrap();
        assert_eq!(checkout.payment().expiry(), "12/29");
        assert!(checkout.can_place_order());
    }

    #[test]
    fn test_request_is_allow_listed() {
        let mut checkout = at_payment();
        let request = checkout.begin_submission().unwrap();
        assert!(checkout.is_submitting());
        assert_eq!(checkout.action_label(), Some("Processing…"));
        assert!(matches!(
            checkout.begin_submission(),
            Err(CommerceError::SubmissionInFlight)
        ));

        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["payment"]["cardNumber"], "4111111111111111");
        assert_eq!(value["totalPrice"], 20.0);
        assert!(value["billing"].get("__typename").is_none());
        assert!(value["shipping"].get("type").is_none());
        assert_eq!(value["shipping"], value["billing"]);
    }

    #[tokio::test]
    async fn test_place_order_confirms_and_locks() {
        let store = store();
        let mut checkout = at_payment();

        let outcome = checkout.place_order(&store).await.unwrap();
        assert!(outcome.is_placed());
        assert_eq!(checkout.step(), CheckoutStep::Confirmation);
        assert_eq!(checkout.placed_order().unwrap().total_price.cents(), 2000);
        assert_eq!(checkout.payment(), &PaymentDraft::default());
        assert_eq!(checkout.action_label(), None);

        assert!(matches!(checkout.back(), Err(CommerceError::CheckoutLocked)));
        assert!(matches!(
            checkout.place_order(&store).await,
            Err(CommerceError::CheckoutLocked)
        ));
        assert!(matches!(
            checkout.edit_cvv("999"),
            Err(CommerceError::CheckoutLocked)
        ));
        assert_eq!(store.calls(StoreOperation::CreateOrder), 1);
    }

    #[tokio::test]
    async fn test_declined_card_stays_on_payment() {
        let store = store().decline_card("4111111111111111");
        let mut checkout = at_payment();

        let outcome = checkout.place_order(&store).await.unwrap();
        assert_eq!(outcome, SubmissionOutcome::Rejected("Card declined".to_string()));
        assert_eq!(checkout.step(), CheckoutStep::Payment);
        assert!(!checkout.is_submitting());
        assert_eq!(checkout.last_error(), Some("Card declined"));
        assert_eq!(checkout.payment().card_number(), "4111 1111 1111 1111");
        assert!(checkout.can_place_order());
    }

    #[tokio::test]
    async fn test_transport_failure_allows_retry() {
        let store = store();
        store.fail_next(StoreOperation::CreateOrder, RemoteError::Transport("reset".into()));
        let mut checkout = at_payment();

        let outcome = checkout.place_order(&store).await.unwrap();
        assert_eq!(outcome.error_message(), Some("Error placing order"));
        assert_eq!(checkout.step(), CheckoutStep::Payment);

        let retry = checkout.place_order(&store).await.unwrap();
        assert!(retry.is_placed());
        assert_eq!(checkout.last_error(), None);
        assert_eq!(store.calls(StoreOperation::CreateOrder), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_refused_while_submitting() {
        let store = store().with_latency(Duration::from_millis(500));
        let mut checkout = at_payment();
        let request = checkout.begin_submission().unwrap();

        assert!(matches!(
            checkout.edit_card_number("5555"),
            Err(CommerceError::SubmissionInFlight)
        ));
        assert!(matches!(checkout.back(), Err(CommerceError::SubmissionInFlight)));

        let result = store.create_order(request).await;
        assert!(checkout.finish_submission(result).unwrap().is_placed());
        assert_eq!(store.order_requests().len(), 1);
    }

    fn placed_reply() -> Result<CreateOrderPayload, RemoteError> {
        let order = Order {
            id: crate::ids::OrderId::new("o-forged"),
            total_price: Price::from_cents(2000),
            created_at: Utc::now(),
            items: Vec::new(),
        };
        Ok(CreateOrderPayload::placed(order, "ok"))
    }

    #[test]
    fn test_reply_refused_on_shipping() {
        let mut checkout = session();

        assert!(matches!(
            checkout.finish_submission(placed_reply()),
            Err(CommerceError::InvalidCheckoutTransition { .. })
        ));
        assert_eq!(checkout.step(), CheckoutStep::Shipping);
        assert!(checkout.placed_order().is_none());
        assert!(!checkout.is_confirmed());
    }

    #[test]
    fn test_reply_refused_without_begin_submission() {
        let mut checkout = at_payment();

        assert!(matches!(
            checkout.finish_submission(placed_reply()),
            Err(CommerceError::InvalidCheckoutTransition { .. })
        ));
        assert_eq!(checkout.step(), CheckoutStep::Payment);
        assert!(checkout.placed_order().is_none());
        assert_eq!(checkout.payment().card_number(), "4111 1111 1111 1111");
    }

    #[tokio::test]
    async fn test_second_reply_refused_after_confirmation() {
        let store = store();
        let mut checkout = at_payment();
        let placed = checkout.place_order(&store).await.unwrap();
        let order_id = placed.order().unwrap().id.clone();

        assert!(matches!(
            checkout.finish_submission(placed_reply()),
            Err(CommerceError::CheckoutLocked)
        ));
        assert_eq!(checkout.placed_order().unwrap().id, order_id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submission_can_be_retried() {
        let store = store().with_latency(Duration::from_millis(500));
        let mut checkout = at_payment();

        let abandoned =
            tokio::time::timeout(Duration::from_millis(100), checkout.place_order(&store)).await;
        assert!(abandoned.is_err());
        assert!(!checkout.is_submitting());
        assert_eq!(checkout.step(), CheckoutStep::Payment);
        assert!(checkout.can_place_order());

        let retry = checkout.place_order(&store).await.unwrap();
        assert!(retry.is_placed());
        assert_eq!(checkout.step(), CheckoutStep::Confirmation);
    }
}
