//! Workflow configuration.
//!
//! Every field has a default so a partial `[workflow]` table in a config
//! file is enough.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the cart and checkout workflow.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Cart mutation settings.
    #[serde(default)]
    pub cart: CartConfig,

    /// Checkout settings.
    #[serde(default)]
    pub checkout: CheckoutConfig,
}

/// Cart mutation and message settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartConfig {
    /// How long a pending message stays visible, in milliseconds.
    #[serde(default = "default_message_ttl_ms")]
    pub message_ttl_ms: u64,

    /// Shown after a successful add when the server sends no message.
    #[serde(default = "default_added_message")]
    pub added_message: String,

    /// Shown after a successful remove when the server sends no message.
    #[serde(default = "default_removed_message")]
    pub removed_message: String,

    /// Shown when an add fails.
    #[serde(default = "default_add_failed_message")]
    pub add_failed_message: String,

    /// Shown when a remove fails.
    #[serde(default = "default_remove_failed_message")]
    pub remove_failed_message: String,
}

impl CartConfig {
    pub fn message_ttl(&self) -> Duration {
        Duration::from_millis(self.message_ttl_ms)
    }
}

fn default_message_ttl_ms() -> u64 {
    3000
}

fn default_added_message() -> String {
    "Item added to cart!".to_string()
}

fn default_removed_message() -> String {
    "Item removed from cart!".to_string()
}

fn default_add_failed_message() -> String {
    "Failed to add item.".to_string()
}

fn default_remove_failed_message() -> String {
    "Failed to remove item.".to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            message_ttl_ms: default_message_ttl_ms(),
            added_message: default_added_message(),
            removed_message: default_removed_message(),
            add_failed_message: default_add_failed_message(),
            remove_failed_message: default_remove_failed_message(),
        }
    }
}

/// Checkout settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutConfig {
    /// Surfaced when order creation fails without a usable server message.
    #[serde(default = "default_generic_failure_message")]
    pub generic_failure_message: String,
}

fn default_generic_failure_message() -> String {
    "Error placing order".to_string()
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            generic_failure_message: default_generic_failure_message(),
        }
    }
}
