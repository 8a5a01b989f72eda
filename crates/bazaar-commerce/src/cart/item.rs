//! Cart items and the snapshot handed from cart to checkout.

use crate::ids::ItemId;
use crate::money::Price;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of catalog item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemType {
    Book,
    Home,
}

impl ItemType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemType::Book => "book",
            ItemType::Home => "home",
        }
    }

    /// Parse the wire name, case-insensitively.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "book" => Some(ItemType::Book),
            "home" => Some(ItemType::Home),
            _ => None,
        }
    }
}

impl fmt::Display for ItemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line in the buyer's cart, as the remote store reports it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub item_id: ItemId,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub name: String,
    /// Always at least 1 while the line exists.
    pub quantity: u32,
    /// Unit price.
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
}

impl CartItem {
    pub fn new(
        item_id: impl Into<ItemId>,
        item_type: ItemType,
        name: impl Into<String>,
        quantity: u32,
        price: Price,
    ) -> Self {
        Self {
            item_id: item_id.into(),
            item_type,
            name: name.into(),
            quantity,
            price,
            image_url: String::new(),
        }
    }

    pub fn with_image_url(mut self, url: impl Into<String>) -> Self {
        self.image_url = url.into();
        self
    }

    /// Price times quantity.
    pub fn subtotal(&self) -> Price {
        self.price * self.quantity
    }
}

/// Sum of price times quantity over all lines.
pub fn total_price(items: &[CartItem]) -> Price {
    items.iter().map(CartItem::subtotal).sum()
}

/// Total number of units across all lines.
pub fn item_count(items: &[CartItem]) -> u64 {
    items.iter().map(|i| u64::from(i.quantity)).sum()
}

/// Cart contents captured when the buyer leaves the cart for checkout.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutHandoff {
    pub cart_items: Vec<CartItem>,
    pub total_price: Price,
}

impl CheckoutHandoff {
    /// Snapshot a list of items, computing the total from it.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        let total_price = total_price(&items);
        Self {
            cart_items: items,
            total_price,
        }
    }

    /// An absent hand-off degrades to an empty snapshot.
    pub fn or_empty(handoff: Option<CheckoutHandoff>) -> Self {
        handoff.unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.cart_items.is_empty()
    }
}
