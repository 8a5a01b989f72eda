//! Checkout command: walks the step machine from the terminal.

use std::sync::Arc;

use anyhow::{bail, Result};
use bazaar_commerce::cart::CartCoordinator;
use bazaar_commerce::checkout::{CheckoutSession, SubmissionOutcome, ValidationError};
use bazaar_commerce::clock::SystemClock;
use bazaar_commerce::CommerceError;
use dialoguer::{Confirm, Input, Select};
use serde_json::json;

use super::CheckoutArgs;
use crate::context::Context;

const STEPS: u8 = 3;

/// Run the checkout command.
pub async fn run(args: CheckoutArgs, ctx: &Context) -> Result<()> {
    let store = ctx.load_store()?;
    let session = ctx.session(&store)?;

    let cart = CartCoordinator::new(store.clone(), &session, ctx.config.workflow.cart.clone())?;
    cart.refresh().await?;
    if cart.is_empty() {
        bail!("Your cart is empty");
    }

    let mut checkout = CheckoutSession::begin(
        &session,
        Some(cart.checkout_handoff()),
        ctx.config.workflow.checkout.clone(),
        Arc::new(SystemClock),
    )?;
    let interactive = !ctx.output.is_json();

    announce(&checkout, ctx);
    choose_shipping(&mut checkout, &args, interactive, ctx)?;
    checkout.continue_to_payment()?;

    announce(&checkout, ctx);
    capture_payment(&mut checkout, &args, interactive)?;

    if interactive && !args.yes {
        let confirmed = Confirm::new()
            .with_prompt(format!(
                "Place order for {} ({} items)?",
                checkout.total_price().display(),
                cart.item_count()
            ))
            .default(true)
            .interact()?;

        if !confirmed {
            ctx.output.warn("Checkout cancelled");
            return Ok(());
        }
    }

    let spinner = ctx.output.spinner("Processing…");
    let outcome = checkout.place_order(store.as_ref()).await?;
    spinner.finish_and_clear();

    match outcome {
        SubmissionOutcome::Placed(order) => {
            if args.save {
                ctx.save_store(&store)?;
            }
            if ctx.output.is_json() {
                ctx.output.json(&json!({ "success": true, "order": order }));
                return Ok(());
            }
            announce(&checkout, ctx);
            ctx.output
                .success(&format!("Your order #{} has been placed.", order.id));
            ctx.output.kv("Placed on", &order.placed_on());
            ctx.output.kv("Items", &order.item_count().to_string());
            ctx.output.kv("Total", &order.total_price.display());
            Ok(())
        }
        SubmissionOutcome::Rejected(message) | SubmissionOutcome::Failed(message) => {
            if ctx.output.is_json() {
                ctx.output.json(&json!({ "success": false, "message": message }));
            }
            bail!("{}", message)
        }
    }
}

fn announce(checkout: &CheckoutSession, ctx: &Context) {
    let step = checkout.step();
    ctx.output.step(step.number(), STEPS, step.display_name());
}

fn choose_shipping(
    checkout: &mut CheckoutSession,
    args: &CheckoutArgs,
    interactive: bool,
    ctx: &Context,
) -> Result<()> {
    if args.same_address {
        checkout.set_use_same_address(true)?;
    } else if let Some(index) = args.ship_to {
        checkout.select_shipping_address(index)?;
    } else if interactive {
        let mut items = vec![format!("Use billing address ({})", checkout.billing().one_line())];
        items.extend(checkout.saved_shipping_addresses().iter().map(|a| a.label()));

        let selection = Select::new()
            .with_prompt("Ship to")
            .items(&items)
            .default(0)
            .interact()?;
        if selection == 0 {
            checkout.set_use_same_address(true)?;
        } else {
            checkout.select_shipping_address(selection - 1)?;
        }
    }

    if checkout.can_continue() {
        ctx.output
            .kv("Shipping to", &checkout.active_shipping_address().one_line());
        return Ok(());
    }
    if !interactive || checkout.use_same_address() {
        // Billing is read-only; nothing to prompt for.
        return Ok(());
    }

    let missing = checkout.shipping().missing_fields();
    for field in missing {
        let value: String = Input::new()
            .with_prompt(format!("Shipping {}", field))
            .interact_text()?;
        checkout.edit_shipping_field(field, value)?;
    }
    Ok(())
}

fn capture_payment(
    checkout: &mut CheckoutSession,
    args: &CheckoutArgs,
    interactive: bool,
) -> Result<()> {
    capture(
        checkout,
        args.card.as_deref(),
        "Card number",
        interactive,
        |c, v| c.edit_card_number(v),
        |c| c.validation().card_number,
    )?;
    capture(
        checkout,
        args.expiry.as_deref(),
        "Expiry (MM/YY)",
        interactive,
        |c, v| c.edit_expiry(v),
        |c| c.validation().expiry,
    )?;
    capture(
        checkout,
        args.cvv.as_deref(),
        "CVV",
        interactive,
        |c, v| c.edit_cvv(v),
        |c| c.validation().cvv,
    )
}

/// Apply one payment field, prompting until it is valid when interactive.
fn capture(
    checkout: &mut CheckoutSession,
    given: Option<&str>,
    prompt: &str,
    interactive: bool,
    edit: impl Fn(&mut CheckoutSession, &str) -> Result<(), CommerceError>,
    error: impl Fn(&CheckoutSession) -> Option<ValidationError>,
) -> Result<()> {
    let mut value = match given {
        Some(v) => v.to_string(),
        None if interactive => Input::new().with_prompt(prompt).interact_text()?,
        None => bail!("{} is required", prompt),
    };

    loop {
        edit(checkout, &value)?;
        match error(checkout) {
            None => return Ok(()),
            Some(e) if !interactive => bail!("{}: {}", prompt, e),
            Some(e) => {
                eprintln!("{}", console::style(e).red());
                value = Input::new().with_prompt(prompt).interact_text()?;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_commerce::checkout::CheckoutStep;

    #[test]
    fn test_step_count_matches_machine() {
        assert_eq!(usize::from(STEPS), CheckoutStep::ALL.len());
        assert_eq!(CheckoutStep::Confirmation.number(), STEPS);
    }
}
