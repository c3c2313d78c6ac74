use cartflow_types::{BundleChoice, BundleOptionPayload, ExtensionAttributes};
use tracing::warn;

use super::OptionTranslator;
use crate::error::TranslateError;
use crate::provider::ProductMetadataProvider;

/// Matches bundle choices to product bundle options by substring.
///
/// A choice visits every bundle option whose title contains the choice title, so overlapping
/// titles (`Drive` inside both `Drive Selection` and `Backup Drive`) yield one payload entry per
/// matching option. Inside an option every assigned product whose name contains the chosen
/// name adds its selection id; the last match sets `option_id` and `option_qty`.
/// An option whose title matches but whose products do not is left out of the payload
/// instead of being sent as an empty entry.
#[derive(Debug, Default, Clone, Copy)]
pub struct BundleTranslator;

impl OptionTranslator for BundleTranslator {
    type Selection = [BundleChoice];

    fn translate(
        &self,
        sku: &str,
        selection: &[BundleChoice],
        metadata: &dyn ProductMetadataProvider,
    ) -> Result<ExtensionAttributes, TranslateError> {
        let product = metadata
            .product_metadata(sku)
            .ok_or_else(|| TranslateError::UnknownProduct { sku: sku.to_string() })?;

        let mut payloads = Vec::new();
        for choice in selection {
            for option in product.bundle_options.iter().filter(|option| option.title.contains(&choice.title)) {
                let mut payload: Option<BundleOptionPayload> = None;
                for assigned in option
                    .assigned_products
                    .iter()
                    .filter(|assigned| assigned.name.contains(&choice.value.name))
                {
                    let option_qty = choice.qty.unwrap_or(assigned.selection_qty);
                    let entry = payload.get_or_insert_with(|| BundleOptionPayload {
                        option_id: assigned.option_id,
                        option_selections: Vec::new(),
                        option_qty,
                    });
                    entry.option_id = assigned.option_id;
                    entry.option_selections.push(assigned.selection_id);
                    entry.option_qty = option_qty;
                }

                match payload {
                    Some(payload) => payloads.push(payload),
                    None => warn!(
                        sku,
                        option = %option.title,
                        value = %choice.value.name,
                        "bundle option has no assigned product matching the selection"
                    ),
                }
            }
        }

        Ok(ExtensionAttributes {
            bundle_options: Some(payloads),
            ..ExtensionAttributes::default()
        })
    }
}
