//! Cart module.
//!
//! Contains cart lines, the checkout hand-off, per-item pending messages
//! and the mutation coordinator.

mod coordinator;
mod item;
mod messages;

pub use coordinator::{CartCoordinator, MutationKind, MutationOutcome};
pub use item::{item_count, total_price, CartItem, CheckoutHandoff, ItemType};
pub use messages::{MessageBoard, MessageKind, PendingMessage};
