//! Cart screen to confirmed order against the in-memory store.

use bazaar_commerce::prelude::*;
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;

const FIXTURE: &str = r#"{
    "buyers": [{
        "id": "u1",
        "billing": [{"type": "home", "street": "1 Main St", "city": "Springfield",
                     "state": "IL", "zip": "62701", "country": "US", "__typename": "Address"}],
        "shipping": [
            {"type": "home", "street": "1 Main St", "city": "Springfield",
             "state": "IL", "zip": "62701", "country": "US", "__typename": "Address"},
            {"type": "work", "street": "", "city": "X", "state": "Y", "zip": "1", "country": "US"}
        ]
    }],
    "catalog": [
        {"itemId": "b1", "type": "book", "name": "Dune", "price": 10, "imageUrl": "/dune.png"},
        {"itemId": "h1", "type": "home", "name": "Lamp", "price": 25.5}
    ],
    "carts": {
        "u1": [{"itemId": "b1", "type": "book", "name": "Dune", "quantity": 2, "price": 10, "imageUrl": "/dune.png"}]
    }
}"#;

fn clock() -> Arc<dyn Clock> {
    Arc::new(FixedClock::new(Utc.with_ymd_and_hms(2026, 6, 15, 9, 30, 0).unwrap()))
}

fn setup() -> (Arc<MemoryStore>, Session) {
    let store = Arc::new(MemoryStore::from_json(FIXTURE).unwrap());
    let buyer = store.buyer(&UserId::new("u1")).unwrap();
    (store, Session::authenticated(buyer))
}

#[tokio::test(start_paused = true)]
async fn test_cart_to_confirmed_order() {
    let (store, session) = setup();
    let config = WorkflowConfig::default();

    let cart = CartCoordinator::new(store.clone(), &session, config.cart.clone()).unwrap();
    cart.refresh().await.unwrap();
    assert_eq!(cart.total_price().cents(), 2000);

    let b1 = ItemId::new("b1");
    let outcome = cart.add_one(&b1, ItemType::Book).await.unwrap();
    assert_eq!(outcome.message.text, "Item added to cart!");
    cart.add_one(&ItemId::new("h1"), ItemType::Home).await.unwrap();
    assert_eq!(cart.item_count(), 4);
    assert_eq!(cart.total_price().cents(), 5550);
    assert_eq!(cart.messages().len(), 2);

    tokio::time::sleep(Duration::from_millis(3001)).await;
    for _ in 0..4 {
        tokio::task::yield_now().await;
    }
    assert!(cart.messages().is_empty());

    let mut checkout = CheckoutSession::begin(
        &session,
        Some(cart.checkout_handoff()),
        config.checkout.clone(),
        clock(),
    )
    .unwrap();

    checkout.select_shipping_address(1).unwrap();
    assert!(!checkout.can_continue());
    checkout.edit_shipping_field(AddressField::Street, "9 Work Rd").unwrap();
    checkout.continue_to_payment().unwrap();

    checkout.edit_card_number("4111-1111-1111-1111").unwrap();
    checkout.edit_expiry("0127").unwrap();
    checkout.edit_cvv("4321").unwrap();
    assert_eq!(checkout.payment().expiry(), "01/27");
    assert!(checkout.can_place_order());

    let outcome = checkout.place_order(store.as_ref()).await.unwrap();
    assert!(outcome.is_placed());
    assert_eq!(checkout.step(), CheckoutStep::Confirmation);
    let order = checkout.placed_order().unwrap().clone();
    assert_eq!(order.total_price.cents(), 5550);
    assert_eq!(order.item_count(), 4);

    let requests = store.order_requests();
    assert_eq!(requests.len(), 1);
    let sent = serde_json::to_value(&requests[0]).unwrap();
    assert_eq!(sent["shipping"]["street"], "9 Work Rd");
    assert_eq!(sent["payment"]["cardNumber"], "4111111111111111");
    assert_eq!(
        sent["billing"].as_object().unwrap().len(),
        5,
        "billing carries only the address fields"
    );

    // The store cleared the cart; a fresh fetch sees it.
    cart.refresh().await.unwrap();
    assert!(cart.is_empty());
    assert_eq!(store.snapshot().orders.len(), 1);
}

#[tokio::test]
async fn test_declined_then_corrected_card() {
    let (store, session) = setup();
    let store = Arc::new(
        MemoryStore::from_snapshot(store.snapshot()).decline_card("4000000000000002"),
    );
    let cart = CartCoordinator::new(store.clone(), &session, CartConfig::default()).unwrap();
    cart.refresh().await.unwrap();

    let mut checkout = CheckoutSession::begin(
        &session,
        Some(cart.checkout_handoff()),
        CheckoutConfig::default(),
        clock(),
    )
    .unwrap();
    checkout.continue_to_payment().unwrap();
    checkout.edit_card_number("4000 0000 0000 0002").unwrap();
    checkout.edit_expiry("12/30").unwrap();
    checkout.edit_cvv("123").unwrap();

    let declined = checkout.place_order(store.as_ref()).await.unwrap();
    assert_eq!(declined.error_message(), Some("Card declined"));
    assert_eq!(checkout.step(), CheckoutStep::Payment);
    assert_eq!(checkout.payment().cvv(), "123");

    checkout.back().unwrap();
    checkout.continue_to_payment().unwrap();
    checkout.edit_card_number("4111111111111111").unwrap();
    let placed = checkout.place_order(store.as_ref()).await.unwrap();
    assert!(placed.is_placed());
    assert_eq!(store.calls(StoreOperation::CreateOrder), 2);
}

#[tokio::test]
async fn test_anonymous_and_empty_cart_are_gated() {
    let (store, session) = setup();
    assert!(matches!(
        CartCoordinator::new(store.clone(), &Session::anonymous(), CartConfig::default()),
        Err(CommerceError::NotAuthenticated)
    ));

    let empty = Arc::new(MemoryStore::new());
    let cart = CartCoordinator::new(empty, &session, CartConfig::default()).unwrap();
    cart.refresh().await.unwrap();
    assert!(matches!(
        CheckoutSession::begin(
            &session,
            Some(cart.checkout_handoff()),
            CheckoutConfig::default(),
            clock(),
        ),
        Err(CommerceError::EmptyCart)
    ));
}
