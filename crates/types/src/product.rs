//! Product metadata consumed by the option translators.
//!
//! The shop assigns internal ids to configurable attributes, their options, and bundle
//! selections. Callers describe choices by display text; these tables map that text back to ids.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Metadata for every known product, keyed by sku.
pub type ProductCatalog = IndexMap<String, ProductMetadata>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ProductMetadata {
    /// Configurable attributes keyed by attribute display title.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub configurable_attributes: IndexMap<String, ConfigurableAttribute>,
    /// Bundle options in product-defined order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bundle_options: Vec<BundleOption>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigurableAttribute {
    pub attribute_id: u64,
    /// Attribute options keyed by display value.
    #[serde(default)]
    pub options: IndexMap<String, AttributeOption>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeOption {
    pub id: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleOption {
    pub title: String,
    #[serde(default)]
    pub assigned_products: Vec<BundleSelection>,
}

/// A sub-product assigned to a bundle option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleSelection {
    /// Display name of the assigned product.
    pub name: String,
    pub option_id: u64,
    pub selection_id: u64,
    #[serde(default = "default_selection_qty")]
    pub selection_qty: u32,
}

fn default_selection_qty() -> u32 {
    1
}
