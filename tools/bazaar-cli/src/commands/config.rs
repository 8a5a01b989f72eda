//! Configuration management commands.

use std::fs;

use anyhow::{bail, Result};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, CONFIG_NAMES};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx).await,
        ConfigCommand::Init { buyer, force } => init_config(&buyer, force, ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Current Configuration");

    if ctx.output.is_json() {
        ctx.output.json(&ctx.config);
        return Ok(());
    }

    match ctx.config_path {
        Some(ref path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(defaults)"),
    }

    // Store section
    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("fixture", &ctx.fixture_path().display().to_string());
    ctx.output.kv(
        "buyer",
        ctx.config.store.buyer.as_deref().unwrap_or("(not signed in)"),
    );

    // Cart section
    let cart = &ctx.config.workflow.cart;
    ctx.output.info("");
    ctx.output.info("[workflow.cart]");
    ctx.output.kv("message_ttl_ms", &cart.message_ttl_ms.to_string());
    ctx.output.kv("added_message", &cart.added_message);
    ctx.output.kv("removed_message", &cart.removed_message);
    ctx.output.kv("add_failed_message", &cart.add_failed_message);
    ctx.output.kv("remove_failed_message", &cart.remove_failed_message);

    // Checkout section
    ctx.output.info("");
    ctx.output.info("[workflow.checkout]");
    ctx.output.kv(
        "generic_failure_message",
        &ctx.config.workflow.checkout.generic_failure_message,
    );

    Ok(())
}

async fn init_config(buyer: &str, force: bool, ctx: &Context) -> Result<()> {
    let config_path = ctx.cwd.join(CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Config file already exists: {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    fs::write(&config_path, generate_default_config(buyer))?;

    ctx.output.success(&format!("Created: {}", config_path.display()));
    ctx.output.info("Next steps:");
    ctx.output.list_item("put buyers, catalog and carts in bazaar-store.json");
    ctx.output.list_item("bazaar cart show");
    ctx.output.list_item("bazaar checkout");

    Ok(())
}
