//! Address types.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// A postal address as sent to the remote store.
///
/// These five fields are the complete outbound shape: whatever else the
/// server attached to a profile address stays on [`SavedAddress`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
}

impl Address {
    pub fn new(
        street: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            street: street.into(),
            city: city.into(),
            state: state.into(),
            zip: zip.into(),
            country: country.into(),
        }
    }

    /// True iff all five fields are non-empty.
    pub fn is_complete(&self) -> bool {
        AddressField::ALL.iter().all(|f| !self.get(*f).is_empty())
    }

    /// Fields that are still empty.
    pub fn missing_fields(&self) -> Vec<AddressField> {
        AddressField::ALL
            .into_iter()
            .filter(|f| self.get(*f).is_empty())
            .collect()
    }

    pub fn get(&self, field: AddressField) -> &str {
        match field {
            AddressField::Street => &self.street,
            AddressField::City => &self.city,
            AddressField::State => &self.state,
            AddressField::Zip => &self.zip,
            AddressField::Country => &self.country,
        }
    }

    pub fn set(&mut self, field: AddressField, value: impl Into<String>) {
        let slot = match field {
            AddressField::Street => &mut self.street,
            AddressField::City => &mut self.city,
            AddressField::State => &mut self.state,
            AddressField::Zip => &mut self.zip,
            AddressField::Country => &mut self.country,
        };
        *slot = value.into();
    }

    /// Format as single line.
    pub fn one_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}",
            self.street, self.city, self.state, self.zip, self.country
        )
    }
}

/// True iff street, city, state, zip and country are all non-empty.
pub fn is_address_complete(address: &Address) -> bool {
    address.is_complete()
}

/// One editable address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressField {
    Street,
    City,
    State,
    Zip,
    Country,
}

impl AddressField {
    pub const ALL: [AddressField; 5] = [
        AddressField::Street,
        AddressField::City,
        AddressField::State,
        AddressField::Zip,
        AddressField::Country,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AddressField::Street => "street",
            AddressField::City => "city",
            AddressField::State => "state",
            AddressField::Zip => "zip",
            AddressField::Country => "country",
        }
    }
}

impl fmt::Display for AddressField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An address from the buyer's profile, as the server returned it.
///
/// Carries an optional `type` label ("home", "work") and any fields the
/// transport layer injected, such as `__typename`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedAddress {
    /// Label shown in the address selector.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub zip: String,
    #[serde(default)]
    pub country: String,
    /// Everything else the server echoed back.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SavedAddress {
    /// The sendable part of this address.
    pub fn address(&self) -> Address {
        Address::new(
            self.street.clone(),
            self.city.clone(),
            self.state.clone(),
            self.zip.clone(),
            self.country.clone(),
        )
    }

    /// Selector label, e.g. `home: 1 Main St, Springfield, IL, 62701`.
    pub fn label(&self) -> String {
        let base = format!("{}, {}, {}, {}", self.street, self.city, self.state, self.zip);
        match &self.kind {
            Some(kind) => format!("{}: {}", kind, base),
            None => base,
        }
    }
}

impl From<Address> for SavedAddress {
    fn from(address: Address) -> Self {
        Self {
            kind: None,
            street: address.street,
            city: address.city,
            state: address.state,
            zip: address.zip,
            country: address.country,
            extra: Map::new(),
        }
    }
}
