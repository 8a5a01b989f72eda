//! Contract with the remote store that owns carts and orders.
//!
//! The workflow only sees these four operations. Request types list every
//! field that is sent; nothing else from local state reaches the wire.

mod memory;

pub use memory::{CatalogItem, MemoryStore, StoreOperation, StoreSnapshot};

use crate::cart::{CartItem, ItemType};
use crate::checkout::{Address, Order, OrderLineItem, PaymentDraft};
use crate::error::RemoteError;
use crate::ids::{ItemId, UserId};
use crate::money::Price;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Remote store operations consumed by the cart and checkout workflow.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Authoritative cart contents for a buyer.
    async fn cart_items(&self, user_id: &UserId) -> Result<Vec<CartItem>, RemoteError>;

    /// Increment an item's quantity by one.
    async fn add_to_cart(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
        item_type: ItemType,
    ) -> Result<MutationResponse, RemoteError>;

    /// Decrement an item's quantity by one.
    async fn remove_from_cart(
        &self,
        user_id: &UserId,
        item_id: &ItemId,
        item_type: ItemType,
    ) -> Result<MutationResponse, RemoteError>;

    /// Create an order from the checkout snapshot.
    async fn create_order(&self, request: CreateOrderRequest)
        -> Result<CreateOrderPayload, RemoteError>;
}

/// Reply to `addToCart` / `removeFromCart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationResponse {
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
}

impl MutationResponse {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

/// One order line as sent to `createOrder`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput {
    pub item_id: ItemId,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub quantity: u32,
    pub price: Price,
    pub image_url: String,
}

impl From<&CartItem> for CartItemInput {
    fn from(item: &CartItem) -> Self {
        Self {
            item_id: item.item_id.clone(),
            name: item.name.clone(),
            item_type: item.item_type,
            quantity: item.quantity,
            price: item.price,
            image_url: item.image_url.clone(),
        }
    }
}

impl From<&CartItemInput> for OrderLineItem {
    fn from(line: &CartItemInput) -> Self {
        Self {
            item_id: line.item_id.clone(),
            item_type: line.item_type.as_str().to_string(),
            name: line.name.clone(),
            quantity: u64::from(line.quantity),
            price: line.price,
            image_url: line.image_url.clone(),
        }
    }
}

/// Card details as sent to `createOrder`: separators stripped.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentInput {
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl From<&PaymentDraft> for PaymentInput {
    fn from(draft: &PaymentDraft) -> Self {
        Self {
            card_number: draft.card_digits(),
            expiry: draft.expiry().to_string(),
            cvv: draft.cvv().to_string(),
        }
    }
}

impl fmt::Debug for PaymentInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let skip = self.card_number.chars().count().saturating_sub(4);
        let tail: String = self.card_number.chars().skip(skip).collect();
        f.debug_struct("PaymentInput")
            .field("card_number", &format_args!("**** {}", tail))
            .field("expiry", &self.expiry)
            .field("cvv", &"***")
            .finish()
    }
}

/// Arguments of the `createOrder` mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: UserId,
    pub items: Vec<CartItemInput>,
    pub total_price: Price,
    pub billing: Address,
    pub shipping: Address,
    pub payment: PaymentInput,
}

/// Reply to `createOrder`. Every field is optional so that a response
/// with a missing piece can still be inspected rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateOrderPayload {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub order: Option<Order>,
}

impl CreateOrderPayload {
    pub fn placed(order: Order, message: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            message: Some(message.into()),
            order: Some(order),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            success: Some(false),
            message: Some(message.into()),
            order: None,
        }
    }

    /// Read a GraphQL response envelope: `{"data": {"createOrder": {...}}}`.
    pub fn from_graphql(response: Value) -> Result<Self, RemoteError> {
        if let Some(errors) = response.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let messages: Vec<&str> = errors
                    .iter()
                    .filter_map(|e| e.get("message").and_then(Value::as_str))
                    .collect();
                return Err(RemoteError::Server(if messages.is_empty() {
                    "unknown error".to_string()
                } else {
                    messages.join("; ")
                }));
            }
        }

        let payload = response
            .get("data")
            .and_then(|d| d.get("createOrder"))
            .filter(|p| p.is_object())
            .ok_or_else(|| RemoteError::Malformed("missing data.createOrder".to_string()))?;

        serde_json::from_value(payload.clone()).map_err(|e| RemoteError::Malformed(e.to_string()))
    }
}
