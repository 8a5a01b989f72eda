//! Orders created by the remote store.

use crate::cart::ItemType;
use crate::ids::{ItemId, OrderId};
use crate::money::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A line of a placed order, read as loosely as the store sends it.
///
/// The order already exists by the time a line is read, so unknown item
/// types and missing fields are carried rather than rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLineItem {
    pub item_id: ItemId,
    #[serde(rename = "type", default)]
    pub item_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub quantity: u64,
    #[serde(default)]
    pub price: Price,
    #[serde(default)]
    pub image_url: String,
}

impl OrderLineItem {
    /// The catalog kind, when the store sent one this workflow knows.
    pub fn kind(&self) -> Option<ItemType> {
        ItemType::parse(&self.item_type)
    }
}

/// A placed order. Owned by the remote store; only ever displayed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub total_price: Price,
    #[serde(with = "created_at")]
    pub created_at: DateTime<Utc>,
    #[serde(default, deserialize_with = "lenient_lines")]
    pub items: Vec<OrderLineItem>,
}

impl Order {
    /// Get total item count.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    /// Creation time formatted for the confirmation view.
    pub fn placed_on(&self) -> String {
        self.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string()
    }
}

/// Keep every line that parses; a bad line is logged and skipped.
fn lenient_lines<'de, D>(deserializer: D) -> Result<Vec<OrderLineItem>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?.unwrap_or_default();
    Ok(raw
        .into_iter()
        .filter_map(|value| match serde_json::from_value::<OrderLineItem>(value) {
            Ok(line) => Some(line),
            Err(err) => {
                tracing::warn!(error = %err, "skipping unreadable order line");
                None
            }
        })
        .collect())
}

/// `createdAt` arrives either as an RFC 3339 string or as epoch milliseconds.
mod created_at {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Millis(i64),
        Text(String),
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        match Raw::deserialize(deserializer)? {
            Raw::Millis(ms) => Utc
                .timestamp_millis_opt(ms)
                .single()
                .ok_or_else(|| de::Error::custom(format!("timestamp out of range: {}", ms))),
            Raw::Text(text) => DateTime::parse_from_rfc3339(&text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(de::Error::custom),
        }
    }
}
