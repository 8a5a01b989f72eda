//! Quantity changes against the remote cart.
//!
//! One coordinator serves one buyer's cart screen. Only one mutation may be
//! in flight at a time for the whole cart; a second request while busy is
//! refused with [`CommerceError::CartBusy`]. The local item list is a
//! read-through cache: it only ever changes by re-fetching from the store.

use crate::cart::item::{self, CartItem, CheckoutHandoff, ItemType};
use crate::cart::messages::{MessageBoard, PendingMessage};
use crate::config::CartConfig;
use crate::error::{CommerceError, RemoteError};
use crate::ids::{ItemId, UserId};
use crate::money::Price;
use crate::remote::{MutationResponse, RemoteStore};
use crate::session::Session;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::instrument;

/// Direction of a quantity change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MutationKind {
    Add,
    Remove,
}

impl MutationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationKind::Add => "add",
            MutationKind::Remove => "remove",
        }
    }
}

/// What a single quantity change produced.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    pub kind: MutationKind,
    /// The message now shown for the item.
    pub message: PendingMessage,
    /// Whether the cache was re-fetched after the mutation.
    pub refreshed: bool,
}

impl MutationOutcome {
    pub fn succeeded(&self) -> bool {
        !self.message.is_error()
    }
}

/// Clears the in-flight flag when dropped.
struct ProcessingGuard<'a>(&'a AtomicBool);

impl<'a> ProcessingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, CommerceError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| Self(flag))
            .map_err(|_| CommerceError::CartBusy)
    }
}

impl Drop for ProcessingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Serializes add/remove calls for one buyer's cart.
pub struct CartCoordinator<S: RemoteStore> {
    store: Arc<S>,
    user_id: UserId,
    items: RwLock<Vec<CartItem>>,
    processing: AtomicBool,
    messages: MessageBoard,
    config: CartConfig,
}

impl<S: RemoteStore> CartCoordinator<S> {
    /// Bind a coordinator to the session's buyer.
    ///
    /// Fails with [`CommerceError::NotAuthenticated`] for an anonymous session.
    pub fn new(store: Arc<S>, session: &Session, config: CartConfig) -> Result<Self, CommerceError> {
        let buyer = session.require_buyer()?;
        Ok(Self {
            store,
            user_id: buyer.id.clone(),
            items: RwLock::new(Vec::new()),
            processing: AtomicBool::new(false),
            messages: MessageBoard::new(config.message_ttl()),
            config,
        })
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// True while a quantity change is in flight; every quantity control
    /// should be disabled.
    pub fn is_processing(&self) -> bool {
        self.processing.load(Ordering::Acquire)
    }

    /// Cached cart contents from the last successful fetch.
    pub fn items(&self) -> Vec<CartItem> {
        self.items.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn total_price(&self) -> Price {
        item::total_price(&self.items.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn item_count(&self) -> u64 {
        item::item_count(&self.items.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().unwrap_or_else(PoisonError::into_inner).is_empty()
    }

    pub fn message_for(&self, item_id: &ItemId) -> Option<PendingMessage> {
        self.messages.get(item_id)
    }

    pub fn messages(&self) -> Vec<PendingMessage> {
        self.messages.all()
    }

    /// Snapshot handed to checkout when the buyer proceeds.
    pub fn checkout_handoff(&self) -> CheckoutHandoff {
        CheckoutHandoff::from_items(self.items())
    }

    /// Replace the cache with the store's current cart.
    #[instrument(skip(self), fields(user_id = %self.user_id))]
    pub async fn refresh(&self) -> Result<Vec<CartItem>, RemoteError> {
        let fresh = self.store.cart_items(&self.user_id).await?;
        *self.items.write().unwrap_or_else(PoisonError::into_inner) = fresh.clone();
        tracing::debug!(lines = fresh.len(), "cart refreshed");
        Ok(fresh)
    }

    /// Increase an item's quantity by one.
    pub async fn add_one(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
    ) -> Result<MutationOutcome, CommerceError> {
        self.mutate(MutationKind::Add, item_id, item_type).await
    }

    /// Decrease an item's quantity by one.
    pub async fn remove_one(
        &self,
        item_id: &ItemId,
        item_type: ItemType,
    ) -> Result<MutationOutcome, CommerceError> {
        self.mutate(MutationKind::Remove, item_id, item_type).await
    }

    #[instrument(skip(self), fields(user_id = %self.user_id, item_id = %item_id, kind = kind.as_str()))]
    async fn mutate(
        &self,
        kind: MutationKind,
        item_id: &ItemId,
        item_type: ItemType,
    ) -> Result<MutationOutcome, CommerceError> {
        let _guard = ProcessingGuard::acquire(&self.processing)?;

        let response = match kind {
            MutationKind::Add => self.store.add_to_cart(&self.user_id, item_id, item_type).await,
            MutationKind::Remove => {
                self.store
                    .remove_from_cart(&self.user_id, item_id, item_type)
                    .await
            }
        };

        let outcome = match response {
            Ok(MutationResponse {
                success: true,
                message,
            }) => {
                let text = message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| self.default_message(kind).to_string());
                let message = PendingMessage::success(item_id.clone(), text);
                self.messages.post(message.clone());
                tracing::info!("cart updated");

                let refreshed = match self.refresh().await {
                    Ok(_) => true,
                    Err(e) => {
                        tracing::warn!(error = %e, "cart re-fetch failed after mutation");
                        false
                    }
                };
                MutationOutcome {
                    kind,
                    message,
                    refreshed,
                }
            }
            Ok(MutationResponse { message, .. }) => {
                tracing::warn!(server_message = ?message, "cart mutation rejected");
                self.fail(kind, item_id)
            }
            Err(e) => {
                tracing::warn!(error = %e, "cart mutation failed");
                self.fail(kind, item_id)
            }
        };

        Ok(outcome)
    }

    /// Failure leaves the cache alone: the remote cart is presumed unchanged.
    fn fail(&self, kind: MutationKind, item_id: &ItemId) -> MutationOutcome {
        let text = match kind {
            MutationKind::Add => &self.config.add_failed_message,
            MutationKind::Remove => &self.config.remove_failed_message,
        };
        let message = PendingMessage::error(item_id.clone(), text.clone());
        self.messages.post(message.clone());
        MutationOutcome {
            kind,
            message,
            refreshed: false,
        }
    }

    fn default_message(&self, kind: MutationKind) -> &str {
        match kind {
            MutationKind::Add => &self.config.added_message,
            MutationKind::Remove => &self.config.removed_message,
        }
    }
}
