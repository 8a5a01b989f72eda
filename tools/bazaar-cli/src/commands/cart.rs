//! Cart commands.

use anyhow::{bail, Result};
use bazaar_commerce::cart::{CartCoordinator, ItemType, MutationKind};
use bazaar_commerce::remote::MemoryStore;
use bazaar_commerce::ItemId;
use serde_json::json;

use super::{CartArgs, CartCommand, MutationArgs};
use crate::context::Context;

/// Run the cart command.
pub async fn run(args: CartArgs, ctx: &Context) -> Result<()> {
    match args.command.unwrap_or(CartCommand::Show) {
        CartCommand::Show => show(ctx).await,
        CartCommand::Add(args) => mutate(MutationKind::Add, args, ctx).await,
        CartCommand::Remove(args) => mutate(MutationKind::Remove, args, ctx).await,
    }
}

async fn show(ctx: &Context) -> Result<()> {
    let store = ctx.load_store()?;
    let session = ctx.session(&store)?;
    let cart = CartCoordinator::new(store, &session, ctx.config.workflow.cart.clone())?;
    cart.refresh().await?;

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "cartItems": cart.items(),
            "itemCount": cart.item_count(),
            "totalPrice": cart.total_price(),
        }));
        return Ok(());
    }

    ctx.output.header(&format!("Cart for {}", cart.user_id()));
    if cart.is_empty() {
        ctx.output.info("Your cart is empty");
        return Ok(());
    }

    ctx.output.cart_table(&cart.items());
    ctx.output.info("");
    ctx.output.kv("Items", &cart.item_count().to_string());
    ctx.output.kv("Total", &cart.total_price().display());

    Ok(())
}

async fn mutate(kind: MutationKind, args: MutationArgs, ctx: &Context) -> Result<()> {
    let store = ctx.load_store()?;
    let session = ctx.session(&store)?;
    let cart = CartCoordinator::new(store.clone(), &session, ctx.config.workflow.cart.clone())?;
    cart.refresh().await?;

    let item_id = ItemId::new(args.item_id);
    let item_type = match args.item_type {
        Some(t) => t,
        None => lookup_type(&cart, &store, &item_id)?,
    };
    ctx.output
        .debug(&format!("{} {} ({})", kind.as_str(), item_id, item_type));

    let outcome = match kind {
        MutationKind::Add => cart.add_one(&item_id, item_type).await?,
        MutationKind::Remove => cart.remove_one(&item_id, item_type).await?,
    };

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "message": outcome.message,
            "refreshed": outcome.refreshed,
            "cartItems": cart.items(),
            "totalPrice": cart.total_price(),
        }));
    } else {
        ctx.output.pending(&outcome.message);
        let quantity = cart
            .items()
            .iter()
            .find(|i| i.item_id == item_id)
            .map_or(0, |i| i.quantity);
        ctx.output.kv("Quantity", &quantity.to_string());
        ctx.output.kv("Total", &cart.total_price().display());
    }

    if args.save && outcome.succeeded() {
        ctx.save_store(&store)?;
    }

    if !outcome.succeeded() {
        bail!("{}", outcome.message.text);
    }
    Ok(())
}

/// Find an item's type from the cart, then the catalog.
fn lookup_type<S>(cart: &CartCoordinator<S>, store: &MemoryStore, item_id: &ItemId) -> Result<ItemType>
where
    S: bazaar_commerce::remote::RemoteStore,
{
    if let Some(item) = cart.items().iter().find(|i| &i.item_id == item_id) {
        return Ok(item.item_type);
    }
    match store.snapshot().catalog.iter().find(|c| &c.item_id == item_id) {
        Some(entry) => Ok(entry.item_type),
        None => bail!("Unknown item '{}'. Pass --type to send it anyway.", item_id),
    }
}
