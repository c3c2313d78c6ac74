use cartflow_types::{ConfigurableChoice, ConfigurableItemOption, ExtensionAttributes};

use super::OptionTranslator;
use crate::error::TranslateError;
use crate::provider::ProductMetadataProvider;

/// Resolves attribute titles and option values to their internal ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigurableTranslator;

impl OptionTranslator for ConfigurableTranslator {
    type Selection = [ConfigurableChoice];

    fn translate(
        &self,
        sku: &str,
        selection: &[ConfigurableChoice],
        metadata: &dyn ProductMetadataProvider,
    ) -> Result<ExtensionAttributes, TranslateError> {
        let product = metadata
            .product_metadata(sku)
            .ok_or_else(|| TranslateError::UnknownProduct { sku: sku.to_string() })?;

        let options = selection
            .iter()
            .map(|choice| {
                let attribute = product.configurable_attributes.get(&choice.title).ok_or_else(|| {
                    TranslateError::UnknownAttribute {
                        sku: sku.to_string(),
                        title: choice.title.clone(),
                    }
                })?;
                let option = attribute
                    .options
                    .get(&choice.value)
                    .ok_or_else(|| TranslateError::UnknownOptionValue {
                        sku: sku.to_string(),
                        title: choice.title.clone(),
                        value: choice.value.clone(),
                    })?;
                Ok(ConfigurableItemOption {
                    option_id: attribute.attribute_id,
                    option_value: option.id,
                })
            })
            .collect::<Result<Vec<_>, TranslateError>>()?;

        Ok(ExtensionAttributes {
            configurable_item_options: Some(options),
            ..ExtensionAttributes::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::translate::test_support::{configurable_product, provider_with};

    fn choice(title: &str, value: &str) -> ConfigurableChoice {
        ConfigurableChoice {
            title: title.into(),
            value: value.into(),
        }
    }

    #[test]
    fn resolves_each_choice_in_selection_order() {
        let provider = provider_with(
            "tshirt",
            configurable_product(&[("Color", 93, &[("Red", 12), ("Blue", 13)]), ("Size", 141, &[("M", 168)])]),
        );

        let attributes = ConfigurableTranslator
            .translate("tshirt", &[choice("Size", "M"), choice("Color", "Red")], &provider)
            .unwrap();

        assert_eq!(
            attributes.configurable_item_options,
            Some(vec![
                ConfigurableItemOption { option_id: 141, option_value: 168 },
                ConfigurableItemOption { option_id: 93, option_value: 12 },
            ])
        );
        assert!(attributes.bundle_options.is_none());
    }

    #[test]
    fn unknown_title_and_value_are_errors() {
        let provider = provider_with("tshirt", configurable_product(&[("Color", 93, &[("Red", 12)])]));

        let error = ConfigurableTranslator
            .translate("tshirt", &[choice("Material", "Cotton")], &provider)
            .unwrap_err();
        assert_eq!(
            error,
            TranslateError::UnknownAttribute {
                sku: "tshirt".into(),
                title: "Material".into()
            }
        );

        let error = ConfigurableTranslator
            .translate("tshirt", &[choice("Color", "Green")], &provider)
            .unwrap_err();
        assert_eq!(error.to_string(), "attribute 'Color' of product 'tshirt' has no option 'Green'");
    }

    #[test]
    fn lookups_are_exact() {
        let provider = provider_with("tshirt", configurable_product(&[("Color", 93, &[("Red", 12)])]));
        assert!(ConfigurableTranslator.translate("tshirt", &[choice("color", "Red")], &provider).is_err());
        assert!(ConfigurableTranslator.translate("tshirt", &[choice("Color", "Re")], &provider).is_err());
    }
}
