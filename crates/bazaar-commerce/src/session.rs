//! Buyer session passed explicitly into the cart and checkout workflow.

use crate::checkout::{Address, SavedAddress};
use crate::error::CommerceError;
use crate::ids::UserId;
use serde::{Deserialize, Serialize};

/// The authenticated buyer and their saved addresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Buyer {
    pub id: UserId,
    #[serde(default)]
    pub billing: Vec<SavedAddress>,
    #[serde(default)]
    pub shipping: Vec<SavedAddress>,
}

impl Buyer {
    pub fn new(id: impl Into<UserId>) -> Self {
        Self {
            id: id.into(),
            billing: Vec::new(),
            shipping: Vec::new(),
        }
    }

    pub fn with_billing(mut self, address: impl Into<SavedAddress>) -> Self {
        self.billing.push(address.into());
        self
    }

    pub fn with_shipping(mut self, address: impl Into<SavedAddress>) -> Self {
        self.shipping.push(address.into());
        self
    }

    /// The read-only billing address: the first one on the profile, or blank.
    pub fn billing_address(&self) -> Address {
        self.billing.first().map(SavedAddress::address).unwrap_or_default()
    }

    /// The default shipping address: the first one on the profile, or blank.
    pub fn default_shipping_address(&self) -> Address {
        self.shipping.first().map(SavedAddress::address).unwrap_or_default()
    }
}

/// Who is using the storefront right now.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    buyer: Option<Buyer>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self { buyer: None }
    }

    pub fn authenticated(buyer: Buyer) -> Self {
        Self { buyer: Some(buyer) }
    }

    pub fn buyer(&self) -> Option<&Buyer> {
        self.buyer.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.buyer.is_some()
    }

    /// The buyer, or [`CommerceError::NotAuthenticated`].
    pub fn require_buyer(&self) -> Result<&Buyer, CommerceError> {
        self.buyer.as_ref().ok_or(CommerceError::NotAuthenticated)
    }
}
