//! Field validation commands.

use anyhow::{bail, Result};
use bazaar_commerce::checkout::{
    card_digits, normalize_card_number, normalize_cvv, normalize_expiry, validate_card_number,
    validate_cvv, validate_expiry_text, ValidationError,
};
use bazaar_commerce::clock::SystemClock;
use serde_json::json;

use super::{ValidateArgs, ValidateCommand};
use crate::context::Context;

/// Run the validate command.
pub async fn run(args: ValidateArgs, ctx: &Context) -> Result<()> {
    let (field, input, normalized, result) = check(&args.command);

    if ctx.output.is_json() {
        ctx.output.json(&json!({
            "field": field,
            "input": input,
            "normalized": normalized,
            "valid": result.is_ok(),
            "error": result.err().map(|e| e.to_string()),
        }));
    } else {
        ctx.output.kv(field, &normalized);
    }

    match result {
        Ok(()) => {
            ctx.output.success("Valid");
            Ok(())
        }
        Err(e) => bail!("{}", e),
    }
}

/// Normalize the input the way the form does, then apply the field's rule.
fn check(command: &ValidateCommand) -> (&'static str, &str, String, Result<(), ValidationError>) {
    match command {
        ValidateCommand::Card { input } => {
            let normalized = normalize_card_number(input);
            let result = validate_card_number(&card_digits(&normalized));
            ("card", input, normalized, result)
        }
        ValidateCommand::Expiry { input } => {
            let normalized = normalize_expiry(input);
            let result = validate_expiry_text(&normalized, &SystemClock);
            ("expiry", input, normalized, result)
        }
        ValidateCommand::Cvv { input } => {
            let normalized = normalize_cvv(input);
            let result = validate_cvv(&normalized);
            ("cvv", input, normalized, result)
        }
    }
}
