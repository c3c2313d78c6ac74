use cartflow_types::{DownloadableLinkChoice, DownloadableOption, ExtensionAttributes};

use super::OptionTranslator;
use crate::error::TranslateError;
use crate::provider::ProductMetadataProvider;

/// Sends the chosen link ids verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct DownloadableTranslator;

impl OptionTranslator for DownloadableTranslator {
    type Selection = [DownloadableLinkChoice];

    fn translate(
        &self,
        _sku: &str,
        selection: &[DownloadableLinkChoice],
        _metadata: &dyn ProductMetadataProvider,
    ) -> Result<ExtensionAttributes, TranslateError> {
        Ok(ExtensionAttributes {
            downloadable_option: Some(DownloadableOption {
                downloadable_links: selection.iter().map(|link| link.id).collect(),
            }),
            ..ExtensionAttributes::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::StaticMetadataProvider;

    #[test]
    fn keeps_link_order_and_duplicates() {
        let links = [
            DownloadableLinkChoice { id: 7 },
            DownloadableLinkChoice { id: 3 },
            DownloadableLinkChoice { id: 7 },
        ];
        let attributes = DownloadableTranslator
            .translate("ebook", &links, &StaticMetadataProvider::default())
            .unwrap();
        assert_eq!(
            attributes.downloadable_option,
            Some(DownloadableOption {
                downloadable_links: vec![7, 3, 7]
            })
        );
        assert!(attributes.configurable_item_options.is_none());
    }
}
