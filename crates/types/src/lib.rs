//! Shared type definitions for Cartflow.
//!
//! - [`order`] holds the caller-authored order request and its line items
//! - [`product`] holds the product metadata tables the option translators resolve against
//! - [`cart`] holds the wire payloads sent to the cart endpoints and the final [`PlacedOrder`]

pub mod cart;
pub mod order;
pub mod product;

pub use cart::{
    BundleOptionPayload, CartItem, CartItemEnvelope, ConfigurableItemOption, DownloadableOption, ExtensionAttributes, ORDER_ID_WIDTH,
    PlacedOrder, ProductOption, TransactionId,
};
pub use order::{
    AddressSpec, BundleChoice, BundleChoiceValue, ConfigurableChoice, DEFAULT_LINE_ITEM_QTY, DownloadableLinkChoice, LineItem,
    OptionSelection, OrderRequest, PaymentMethod, ProductType,
};
pub use product::{AttributeOption, BundleOption, BundleSelection, ConfigurableAttribute, ProductCatalog, ProductMetadata};
