//! # Cartflow Engine
//!
//! The Cartflow Engine places orders through a shop's cart API by driving a fixed, multi-step
//! checkout workflow: create a cart, add line items, apply a coupon, set addresses, shipping
//! and payment, and finally place the order.
//!
//! ## Key Features
//!
//! - **Ordered workflow**: each step issues its calls in sequence and aborts on the first failure
//! - **Option translation**: configurable, bundle, and downloadable selections become cart payloads
//! - **Address mapping**: human readable region/country names are sent as codes
//! - **Diagnostics**: every failure reaches an injected [`EventSink`] with the raw response
//!
//! ## Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use cartflow_api::ScriptedTransport;
//! use cartflow_engine::{CheckoutConfig, CheckoutExecutor, NullEventSink, StaticMetadataProvider, parse_order_file};
//! use serde_json::json;
//!
//! let temp_dir = tempfile::tempdir()?;
//! let order_path = temp_dir.path().join("order.yaml");
//! std::fs::write(&order_path, r#"
//! items:
//!   - { sku: socks, type: simple }
//! billing_address: { firstname: Jane, region_id: California }
//! payment_method: { method: checkmo }
//! "#)?;
//!
//! let request = parse_order_file(&order_path)?;
//! let executor = CheckoutExecutor::new(
//!     &CheckoutConfig::new("https://shop.example.com/rest/V1"),
//!     Arc::new(StaticMetadataProvider::default()),
//!     Arc::new(NullEventSink),
//! )?;
//!
//! let mut transport = ScriptedTransport::with_bodies([json!(7), json!({}), json!(1), json!(true), json!(5)]);
//! let order = executor.place_order(&request, &mut transport)?;
//! assert_eq!(order.id, "000000005");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! - **`executor`**: step sequencing, endpoint construction, plan preview, and telemetry
//! - **`translate`**: per-product-type option translators
//! - **`provider`**: product metadata lookups used by the translators
//! - **`address`**: address value mapping and field stripping
//! - **`events`**: failure notification sinks
//! - **`config`**: configuration loading, interpolation, and validation

use std::{fs, path::Path};

use anyhow::{Context, Result};
use cartflow_types::OrderRequest;

pub mod address;
pub mod config;
pub mod error;
pub mod events;
pub mod executor;
pub mod provider;
pub mod translate;

pub use address::{AddressMapper, AddressMappings, STRIPPED_ADDRESS_FIELDS};
pub use config::{CheckoutConfig, ConfigError, ConfigFormat, default_config_path};
pub use error::{ExpectedShape, FailureReason, TranslateError, WorkflowError};
pub use events::{
    ChannelEventSink, EventContext, EventSink, NullEventSink, RecordedEvent, RecordingEventSink, TracingEventSink,
    WORKFLOW_FAILED_EVENT,
};
pub use executor::{
    CheckoutExecutor, Endpoints, PlannedStep, StepKind, StepRecord, StepStatus, WorkflowRun, plan, split_shipping_method,
};
pub use provider::{ProductMetadataProvider, StaticMetadataProvider};
pub use translate::{OptionTranslator, translate_line_item};

/// Loads an order request from the filesystem.
///
/// Files with a `.json` extension are parsed as JSON; everything else is parsed as YAML.
///
/// # Errors
///
/// Returns an error if the file cannot be read or does not describe an order request.
pub fn parse_order_file(file_path: impl AsRef<Path>) -> Result<OrderRequest> {
    let file_path = file_path.as_ref();
    let file_content = fs::read_to_string(file_path).with_context(|| format!("Failed to read order file: {}", file_path.display()))?;

    if provider::is_json_path(file_path) {
        return serde_json::from_str(&file_content).with_context(|| format!("Invalid JSON order request: {}", file_path.display()));
    }
    serde_yaml::from_str(&file_content).with_context(|| format!("Invalid YAML order request: {}", file_path.display()))
}
