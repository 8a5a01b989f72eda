//! Per-item status messages that expire on their own.
//!
//! Each message owns an expiry task. Posting a newer message for the same
//! item aborts the older task before scheduling a fresh one, and expiry
//! only removes the message generation it was scheduled for.

use crate::ids::ItemId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Whether the mutation behind a message succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    Success,
    Error,
}

/// A transient status line shown next to a cart item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMessage {
    pub item_id: ItemId,
    pub text: String,
    pub kind: MessageKind,
}

impl PendingMessage {
    pub fn success(item_id: ItemId, text: impl Into<String>) -> Self {
        Self {
            item_id,
            text: text.into(),
            kind: MessageKind::Success,
        }
    }

    pub fn error(item_id: ItemId, text: impl Into<String>) -> Self {
        Self {
            item_id,
            text: text.into(),
            kind: MessageKind::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == MessageKind::Error
    }
}

struct Slot {
    message: PendingMessage,
    generation: u64,
    expiry: JoinHandle<()>,
}

#[derive(Default)]
struct BoardState {
    slots: HashMap<ItemId, Slot>,
    next_generation: u64,
}

impl Drop for BoardState {
    fn drop(&mut self) {
        for slot in self.slots.values() {
            slot.expiry.abort();
        }
    }
}

/// At most one pending message per item, each cleared after a fixed window.
///
/// Posting must happen inside a Tokio runtime.
#[derive(Clone)]
pub struct MessageBoard {
    inner: Arc<Mutex<BoardState>>,
    ttl: Duration,
}

impl MessageBoard {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(BoardState::default())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Show `message`, replacing and cancelling any older one for the item.
    pub fn post(&self, message: PendingMessage) {
        let mut state = lock(&self.inner);
        state.next_generation += 1;
        let generation = state.next_generation;
        let item_id = message.item_id.clone();

        if let Some(previous) = state.slots.remove(&item_id) {
            previous.expiry.abort();
        }

        let expiry = tokio::spawn(expire(
            Arc::downgrade(&self.inner),
            item_id.clone(),
            generation,
            self.ttl,
        ));
        state.slots.insert(
            item_id,
            Slot {
                message,
                generation,
                expiry,
            },
        );
    }

    pub fn get(&self, item_id: &ItemId) -> Option<PendingMessage> {
        lock(&self.inner).slots.get(item_id).map(|s| s.message.clone())
    }

    /// All visible messages, ordered by item id.
    pub fn all(&self) -> Vec<PendingMessage> {
        let mut messages: Vec<PendingMessage> =
            lock(&self.inner).slots.values().map(|s| s.message.clone()).collect();
        messages.sort_by(|a, b| a.item_id.cmp(&b.item_id));
        messages
    }

    pub fn len(&self) -> usize {
        lock(&self.inner).slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn lock(inner: &Mutex<BoardState>) -> MutexGuard<'_, BoardState> {
    inner.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn expire(board: Weak<Mutex<BoardState>>, item_id: ItemId, generation: u64, ttl: Duration) {
    tokio::time::sleep(ttl).await;
    let Some(board) = board.upgrade() else {
        return;
    };
    let mut state = lock(&board);
    if state
        .slots
        .get(&item_id)
        .is_some_and(|slot| slot.generation == generation)
    {
        state.slots.remove(&item_id);
        tracing::trace!(item_id = %item_id, "pending message expired");
    }
}
