//! Output formatting for the CLI.

use bazaar_commerce::cart::{CartItem, MessageKind, PendingMessage};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self { verbose, json }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print a checkout step marker.
    pub fn step(&self, num: u8, total: u8, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style(format!("[{}/{}]", num, total)).dim(), msg);
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print cart lines as a table with a header row.
    pub fn cart_table(&self, items: &[CartItem]) {
        if self.json {
            return;
        }
        const WIDTHS: [usize; 5] = [10, 6, 28, 4, 10];
        let row = |cols: [&str; 5]| {
            let cells: Vec<String> = cols
                .iter()
                .zip(WIDTHS)
                .map(|(col, width)| format!("{:width$}", col, width = width))
                .collect();
            cells.join("  ")
        };

        println!("  {}", style(row(["ITEM", "TYPE", "NAME", "QTY", "SUBTOTAL"])).dim());
        for item in items {
            println!(
                "  {}",
                row([
                    item.item_id.as_str(),
                    item.item_type.as_str(),
                    &item.name,
                    &item.quantity.to_string(),
                    &item.subtotal().display(),
                ])
            );
        }
    }

    /// Print a pending cart message in its kind's colour.
    pub fn pending(&self, message: &PendingMessage) {
        if self.json {
            return;
        }
        println!("  {} {}", style(&message.item_id).dim(), message_badge(message));
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Message text coloured by outcome.
pub fn message_badge(message: &PendingMessage) -> String {
    match message.kind {
        MessageKind::Success => style(&message.text).green().to_string(),
        MessageKind::Error => style(&message.text).red().to_string(),
    }
}
