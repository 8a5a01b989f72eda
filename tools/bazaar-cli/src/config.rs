//! CLI configuration.

use std::path::Path;

use anyhow::{Context, Result};
use bazaar_commerce::config::WorkflowConfig;
use serde::{Deserialize, Serialize};

/// File names searched for, in order, from the working directory upward.
pub const CONFIG_NAMES: [&str; 3] = ["bazaar.toml", ".bazaar.toml", "bazaar.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Cart and checkout settings.
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Where the store data lives and who is signed in.
    #[serde(default)]
    pub store: StoreConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        if is_json(path) {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display()))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
        }
    }

    /// Save config to a file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = if is_json(path) {
            serde_json::to_string_pretty(self)?
        } else {
            toml::to_string_pretty(self)?
        };

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))
    }
}

fn is_json(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "json")
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// JSON fixture holding buyers, catalog, carts and orders.
    #[serde(default = "default_fixture")]
    pub fixture: String,

    /// Signed-in buyer id. Unset means nobody is signed in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyer: Option<String>,
}

fn default_fixture() -> String {
    "bazaar-store.json".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            fixture: default_fixture(),
            buyer: None,
        }
    }
}

/// Generate a default bazaar.toml config file.
pub fn generate_default_config(buyer: &str) -> String {
    format!(
        r#"# Bazaar storefront configuration

[store]
fixture = "bazaar-store.json"
buyer = "{buyer}"

[workflow.cart]
message_ttl_ms = 3000
added_message = "Item added to cart!"
removed_message = "Item removed from cart!"
add_failed_message = "Failed to add item."
remove_failed_message = "Failed to remove item."

[workflow.checkout]
generic_failure_message = "Error placing order"
"#,
        buyer = buyer
    )
}
