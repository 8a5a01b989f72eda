//! In-memory remote store.
//!
//! Behaves like the storefront backend for carts and orders, and adds the
//! knobs tests and the CLI need: simulated latency, one-shot failures,
//! declined cards and call counters. State can be loaded from and saved to
//! a JSON fixture.

use crate::cart::{CartItem, ItemType};
use crate::checkout::{Order, OrderLineItem};
use crate::error::{CommerceError, RemoteError};
use crate::ids::{ItemId, OrderId, UserId};
use crate::money::Price;
use crate::remote::{CreateOrderPayload, CreateOrderRequest, MutationResponse, RemoteStore};
use crate::session::Buyer;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

/// A sellable item the store knows about.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub item_id: ItemId,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
}

impl CatalogItem {
    pub fn new(
        item_id: impl Into<ItemId>,
        item_type: ItemType,
        name: impl Into<String>,
        price: Price,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            item_type,
            name: name.into(),
            price,
            image_url: String::new(),
        }
    }

    fn to_cart_item(&self, quantity: u32) -> CartItem {
        CartItem::new(self.item_id.clone(), self.item_type, self.name.clone(), quantity, self.price)
            .with_image_url(self.image_url.clone())
    }
}

/// Serializable store contents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreSnapshot {
    #[serde(default)]
    pub buyers: Vec<Buyer>,
    #[serde(default)]
    pub catalog: Vec<CatalogItem>,
    #[serde(default)]
    pub carts: BTreeMap<UserId, Vec<CartItem>>,
    #[serde(default)]
    pub orders: Vec<Order>,
    /// Card numbers (digits only) that `createOrder` declines.
    #[serde(default)]
    pub declined_cards: Vec<String>,
}

/// Remote operations, for failure injection and call counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOperation {
    CartItems,
    AddToCart,
    RemoveFromCart,
    CreateOrder,
}

#[derive(Default)]
struct StoreState {
    data: StoreSnapshot,
    failures: HashMap<StoreOperation, RemoteError>,
    calls: HashMap<StoreOperation, usize>,
    order_requests: Vec<CreateOrderRequest>,
}

/// Remote store backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
    latency: Option<Duration>,
    omit_messages: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let store = Self::new();
        store.state().data = snapshot;
        store
    }

    /// Load a store from fixture JSON.
    pub fn from_json(json: &str) -> Result<Self, CommerceError> {
        Ok(Self::from_snapshot(serde_json::from_str(json)?))
    }

    /// Delay every call by `latency`.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Reply to cart mutations without a message.
    pub fn without_messages(mut self) -> Self {
        self.omit_messages = true;
        self
    }

    pub fn with_catalog_item(self, item: CatalogItem) -> Self {
        self.state().data.catalog.push(item);
        self
    }

    pub fn with_buyer(self, buyer: Buyer) -> Self {
        self.state().data.buyers.push(buyer);
        self
    }

    /// Seed a buyer's cart directly.
    pub fn with_cart(self, user_id: impl Into<UserId>, items: Vec<CartItem>) -> Self {
        self.state().data.carts.insert(user_id.into(), items);
        self
    }

    pub fn decline_card(self, digits: impl Into<String>) -> Self {
        self.state().data.declined_cards.push(digits.into());
        self
    }

    /// Make the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: StoreOperation, error: RemoteError) {
        self.state().failures.insert(op, error);
    }

    pub fn calls(&self, op: StoreOperation) -> usize {
        self.state().calls.get(&op).copied().unwrap_or(0)
    }

    /// Every `createOrder` request received, oldest first.
    pub fn order_requests(&self) -> Vec<CreateOrderRequest> {
        self.state().order_requests.clone()
    }

    pub fn buyer(&self, user_id: &UserId) -> Option<Buyer> {
        self.state().data.buyers.iter().find(|b| &b.id == user_id).cloned()
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        self.state().data.clone()
    }

    pub fn to_json(&self) -> Result<String, CommerceError> {
        Ok(serde_json::to_string_pretty(&self.snapshot())?)
    }

    fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Count the call, wait out the latency, then consume any injected failure.
    async fn enter(&self, op: StoreOperation) -> Result<(), RemoteError> {
        *self.state().calls.entry(op).or_insert(0) += 1;
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        match self.state().failures.remove(&op) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn message(&self, text: &str) -> Option<String> {
        (!self.omit_messages).then(|| text.to_string())
    }
}

#[async_trait]
impl RemoteStore for MemoryStore {
    async fn cart_items(&self, user_id: &UserId) -> Result<Vec<CartItem>, RemoteError> {
        self.enter(StoreOperation::CartItems).await?;
        Ok(self.state().data.carts.get(user_id).cloned().unwrap_or_default())
    }

    async fn add_to_cart(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
        item_type: ItemType,
    ) -> Result<MutationResponse, RemoteError> {
        self.enter(StoreOperation::AddToCart).await?;
        let mut state = self.state();
        let Some(entry) = state
            .data
            .catalog
            .iter()
            .find(|c| &c.item_id == item_id && c.item_type == item_type)
            .cloned()
        else {
            return Ok(MutationResponse::rejected(format!("Item not found: {}", item_id)));
        };

        let cart = state.data.carts.entry(user_id.clone()).or_default();
        match cart.iter_mut().find(|i| &i.item_id == item_id) {
            Some(line) => line.quantity = line.quantity.saturating_add(1),
            None => cart.push(entry.to_cart_item(1)),
        }
        Ok(MutationResponse {
            success: true,
            message: self.message("Item added to cart!"),
        })
    }

    async fn remove_from_cart(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
        _item_type: ItemType,
    ) -> Result<MutationResponse, RemoteError> {
        self.enter(StoreOperation::RemoveFromCart).await?;
        let mut state = self.state();
        let cart = state.data.carts.entry(user_id.clone()).or_default();
        let Some(pos) = cart.iter().position(|i| &i.item_id == item_id) else {
            return Ok(MutationResponse {
                success: true,
                message: self.message("Item not in cart"),
            });
        };
        if cart[pos].quantity > 1 {
            cart[pos].quantity -= 1;
        } else {
            cart.remove(pos);
        }
        Ok(MutationResponse {
            success: true,
            message: self.message("Item removed from cart!"),
        })
    }

    async fn create_order(
        &self,
        request: CreateOrderRequest,
    ) -> Result<CreateOrderPayload, RemoteError> {
        self.enter(StoreOperation::CreateOrder).await?;
        let mut state = self.state();
        state.order_requests.push(request.clone());

        if state.data.declined_cards.contains(&request.payment.card_number) {
            return Ok(CreateOrderPayload::rejected("Card declined"));
        }

        let items: Vec<OrderLineItem> = request
            .items
            .iter()
            .filter(|line| state.data.catalog.iter().any(|c| c.item_id == line.item_id))
            .map(OrderLineItem::from)
            .collect();

        let order = Order {
            id: OrderId::generate(),
            total_price: request.total_price,
            created_at: Utc::now(),
            items,
        };
        state.data.orders.push(order.clone());
        state.data.carts.remove(&request.user_id);

        Ok(CreateOrderPayload::placed(order, "Order created successfully"))
    }
}
