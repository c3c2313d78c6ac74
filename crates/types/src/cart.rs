//! Wire payloads sent to the cart endpoints.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Width of the zero-padded order identifier returned to callers.
pub const ORDER_ID_WIDTH: usize = 9;

/// Identifier of the remote cart (quote) assembled during one placement run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct TransactionId(pub u64);

impl fmt::Display for TransactionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Body of the add-item call: `{"cartItem": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItemEnvelope {
    #[serde(rename = "cartItem")]
    pub cart_item: CartItem,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    pub sku: String,
    pub qty: u32,
    pub quote_id: TransactionId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_option: Option<ProductOption>,
}

/// Type-specific side-channel payload merged into a cart item.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProductOption {
    pub extension_attributes: ExtensionAttributes,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ExtensionAttributes {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configurable_item_options: Option<Vec<ConfigurableItemOption>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bundle_options: Option<Vec<BundleOptionPayload>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloadable_option: Option<DownloadableOption>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigurableItemOption {
    pub option_id: u64,
    pub option_value: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleOptionPayload {
    pub option_id: u64,
    pub option_selections: Vec<u64>,
    pub option_qty: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadableOption {
    pub downloadable_links: Vec<u64>,
}

/// Result handed back to the caller after the order is placed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlacedOrder {
    /// Order identifier, zero padded to [`ORDER_ID_WIDTH`] digits.
    pub id: String,
}

impl PlacedOrder {
    pub fn from_order_id(order_id: u64) -> Self {
        Self {
            id: format!("{:0width$}", order_id, width = ORDER_ID_WIDTH),
        }
    }
}
