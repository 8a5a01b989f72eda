//! CLI command implementations.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod validate;

use bazaar_commerce::cart::ItemType;
use clap::{Args, Subcommand};

/// Arguments for the cart command.
#[derive(Args)]
pub struct CartArgs {
    #[command(subcommand)]
    pub command: Option<CartCommand>,
}

#[derive(Subcommand)]
pub enum CartCommand {
    /// List cart items and the total.
    Show,
    /// Add one unit of an item.
    Add(MutationArgs),
    /// Remove one unit of an item.
    Remove(MutationArgs),
}

/// Arguments shared by add and remove.
#[derive(Args)]
pub struct MutationArgs {
    /// Item id.
    pub item_id: String,

    /// Item type (book or home). Looked up from the cart or catalog if omitted.
    #[arg(short = 't', long = "type", value_parser = parse_item_type)]
    pub item_type: Option<ItemType>,

    /// Write the store back to the fixture afterwards.
    #[arg(long)]
    pub save: bool,
}

/// Arguments for the checkout command.
#[derive(Args)]
pub struct CheckoutArgs {
    /// Card number; prompted for if omitted.
    #[arg(long)]
    pub card: Option<String>,

    /// Card expiry as MM/YY; prompted for if omitted.
    #[arg(long)]
    pub expiry: Option<String>,

    /// Card security code; prompted for if omitted.
    #[arg(long)]
    pub cvv: Option<String>,

    /// Ship to the saved shipping address at this index.
    #[arg(long, conflicts_with = "same_address")]
    pub ship_to: Option<usize>,

    /// Ship to the billing address.
    #[arg(long)]
    pub same_address: bool,

    /// Skip confirmation prompt.
    #[arg(short, long)]
    pub yes: bool,

    /// Write the store back to the fixture afterwards.
    #[arg(long)]
    pub save: bool,
}

/// Arguments for the validate command.
#[derive(Args)]
pub struct ValidateArgs {
    #[command(subcommand)]
    pub command: ValidateCommand,
}

#[derive(Subcommand)]
pub enum ValidateCommand {
    /// Check a card number.
    Card {
        /// Raw input, separators allowed.
        input: String,
    },
    /// Check an expiry date.
    Expiry {
        /// Raw input, e.g. 0129 or 01/29.
        input: String,
    },
    /// Check a security code.
    Cvv {
        /// Raw input.
        input: String,
    },
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Initialize a new config file.
    Init {
        /// Buyer id to sign in as.
        #[arg(short, long, default_value = "u1")]
        buyer: String,

        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_item_type(s: &str) -> Result<ItemType, String> {
    ItemType::parse(s).ok_or_else(|| format!("unknown item type '{}' (expected book or home)", s))
}
