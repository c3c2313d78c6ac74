//! Option translators: checkout selections to cart item `product_option` payloads.
//!
//! Each product type with options has one translator. Dispatch is a `match` over the line
//! item's [`OptionSelection`] variant; simple products carry no payload.

mod bundle;
mod configurable;
mod downloadable;

use cartflow_types::{ExtensionAttributes, LineItem, OptionSelection, ProductOption};

pub use bundle::BundleTranslator;
pub use configurable::ConfigurableTranslator;
pub use downloadable::DownloadableTranslator;

use crate::error::TranslateError;
use crate::provider::ProductMetadataProvider;

/// Turns one product type's selection into extension attributes.
pub trait OptionTranslator {
    type Selection: ?Sized;

    fn translate(
        &self,
        sku: &str,
        selection: &Self::Selection,
        metadata: &dyn ProductMetadataProvider,
    ) -> Result<ExtensionAttributes, TranslateError>;
}

/// Build the `product_option` payload for a line item.
///
/// Returns `None` for simple products and for items whose selection is empty.
pub fn translate_line_item(
    item: &LineItem,
    metadata: &dyn ProductMetadataProvider,
) -> Result<Option<ProductOption>, TranslateError> {
    if item.selection.is_empty() {
        return Ok(None);
    }

    let extension_attributes = match &item.selection {
        OptionSelection::Simple => return Ok(None),
        OptionSelection::Configurable { configurable_options } => {
            ConfigurableTranslator.translate(&item.sku, configurable_options.as_slice(), metadata)?
        }
        OptionSelection::Bundle { bundle_options } => {
            BundleTranslator.translate(&item.sku, bundle_options.as_slice(), metadata)?
        }
        OptionSelection::Downloadable { links } => {
            DownloadableTranslator.translate(&item.sku, links.as_slice(), metadata)?
        }
    };

    Ok(Some(ProductOption { extension_attributes }))
}

#[cfg(test)]
pub(crate) mod test_support {
    use cartflow_types::{
        AttributeOption, BundleOption, BundleSelection, ConfigurableAttribute, ProductMetadata,
    };
    use indexmap::IndexMap;

    use crate::provider::StaticMetadataProvider;

    pub fn configurable_product(attributes: &[(&str, u64, &[(&str, u64)])]) -> ProductMetadata {
        let mut configurable_attributes = IndexMap::new();
        for (title, attribute_id, options) in attributes {
            let options = options
                .iter()
                .map(|(value, id)| (value.to_string(), AttributeOption { id: *id }))
                .collect();
            configurable_attributes.insert(
                title.to_string(),
                ConfigurableAttribute {
                    attribute_id: *attribute_id,
                    options,
                },
            );
        }
        ProductMetadata {
            configurable_attributes,
            ..ProductMetadata::default()
        }
    }

    pub fn bundle_option(title: &str, products: &[(&str, u64, u64, u32)]) -> BundleOption {
        BundleOption {
            title: title.to_string(),
            assigned_products: products
                .iter()
                .map(|(name, option_id, selection_id, selection_qty)| BundleSelection {
                    name: name.to_string(),
                    option_id: *option_id,
                    selection_id: *selection_id,
                    selection_qty: *selection_qty,
                })
                .collect(),
        }
    }

    pub fn provider_with(sku: &str, metadata: ProductMetadata) -> StaticMetadataProvider {
        let mut provider = StaticMetadataProvider::default();
        provider.insert(sku, metadata);
        provider
    }
}
