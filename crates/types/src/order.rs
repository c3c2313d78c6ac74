//! Caller-facing order request model.
//!
//! An [`OrderRequest`] is the declarative description of one order: the line items to add, the
//! addresses, and the optional coupon and shipping method. Requests are authored as YAML or JSON
//! and are read-only for the duration of a placement run.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Quantity used when a line item does not specify one.
pub const DEFAULT_LINE_ITEM_QTY: u32 = 1;

/// Key/value address fields in authoring order.
///
/// Values are sent as-is apart from the value-mapping rule applied by the engine
/// (human readable region/country names become codes, `default_*` flags are stripped).
pub type AddressSpec = IndexMap<String, JsonValue>;

/// Declarative request for placing a single order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderRequest {
    /// Customer owning the cart. Guest carts are created when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<u64>,
    /// Products added to the cart, in order.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Coupon applied after the items are added.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    /// Billing address, also used for shipping when no shipping address is given.
    pub billing_address: AddressSpec,
    /// Explicit shipping address.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<AddressSpec>,
    /// Shipping method token in `carrier_method` form (for example `flatrate_flatrate`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shipping_method: Option<String>,
    /// Payment method selection.
    pub payment_method: PaymentMethod,
}

impl OrderRequest {
    /// Address used for the shipping-address step.
    pub fn effective_shipping_address(&self) -> &AddressSpec {
        self.shipping_address.as_ref().unwrap_or(&self.billing_address)
    }
}

/// A single product entry in the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    /// Product identity.
    pub sku: String,
    /// Requested quantity; [`DEFAULT_LINE_ITEM_QTY`] when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<u32>,
    /// Product type tag together with its type-specific option selection.
    #[serde(flatten)]
    pub selection: OptionSelection,
}

impl LineItem {
    pub fn quantity(&self) -> u32 {
        self.qty.unwrap_or(DEFAULT_LINE_ITEM_QTY)
    }

    pub fn product_type(&self) -> ProductType {
        self.selection.product_type()
    }
}

/// Closed set of product types understood by the option translators.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductType {
    #[default]
    Simple,
    Configurable,
    Bundle,
    Downloadable,
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProductType::Simple => "simple",
            ProductType::Configurable => "configurable",
            ProductType::Bundle => "bundle",
            ProductType::Downloadable => "downloadable",
        };
        f.write_str(label)
    }
}

/// Type-specific checkout choices, tagged by the line item's `type` field.
///
/// ```yaml
/// sku: tshirt
/// type: configurable
/// configurable_options:
///   - { title: Color, value: Red }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OptionSelection {
    /// Plain product without options.
    Simple,
    /// Attribute/value choices resolved against the product's configurable attributes.
    Configurable {
        #[serde(default)]
        configurable_options: Vec<ConfigurableChoice>,
    },
    /// Sub-product choices resolved against the product's bundle options.
    Bundle {
        #[serde(default)]
        bundle_options: Vec<BundleChoice>,
    },
    /// Downloadable link ids, sent verbatim.
    Downloadable {
        #[serde(default)]
        links: Vec<DownloadableLinkChoice>,
    },
}

impl OptionSelection {
    pub fn product_type(&self) -> ProductType {
        match self {
            OptionSelection::Simple => ProductType::Simple,
            OptionSelection::Configurable { .. } => ProductType::Configurable,
            OptionSelection::Bundle { .. } => ProductType::Bundle,
            OptionSelection::Downloadable { .. } => ProductType::Downloadable,
        }
    }

    /// True when the selection carries no choices at all.
    pub fn is_empty(&self) -> bool {
        match self {
            OptionSelection::Simple => true,
            OptionSelection::Configurable { configurable_options } => configurable_options.is_empty(),
            OptionSelection::Bundle { bundle_options } => bundle_options.is_empty(),
            OptionSelection::Downloadable { links } => links.is_empty(),
        }
    }
}

/// Chosen value for one configurable attribute, both by display text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConfigurableChoice {
    /// Attribute display title (for example `Color`).
    pub title: String,
    /// Option display value (for example `Red`).
    pub value: String,
}

/// Chosen sub-product for one bundle option.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleChoice {
    /// Fragment of the bundle option title.
    pub title: String,
    /// Fragment of the assigned product name.
    pub value: BundleChoiceValue,
    /// Overrides the product-defined selection quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BundleChoiceValue {
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DownloadableLinkChoice {
    pub id: u64,
}

/// Payment method code plus any method-specific fields, sent as one object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentMethod {
    /// Method code (for example `checkmo`).
    pub method: String,
    #[serde(flatten)]
    pub additional: IndexMap<String, JsonValue>,
}

impl PaymentMethod {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            additional: IndexMap::new(),
        }
    }
}
