//! Product metadata providers.
//!
//! Option translators resolve display text to internal ids through a
//! [`ProductMetadataProvider`]. [`StaticMetadataProvider`] serves a catalog loaded from a YAML
//! or JSON file; other implementations can front a live catalog service.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use cartflow_types::{ProductCatalog, ProductMetadata};

/// Supplies per-product attribute and bundle tables.
pub trait ProductMetadataProvider: Send + Sync {
    /// Metadata for `sku`, or `None` when the product is unknown.
    fn product_metadata(&self, sku: &str) -> Option<&ProductMetadata>;
}

/// In-memory catalog keyed by sku.
#[derive(Debug, Clone, Default)]
pub struct StaticMetadataProvider {
    catalog: ProductCatalog,
}

impl StaticMetadataProvider {
    pub fn new(catalog: ProductCatalog) -> Self {
        Self { catalog }
    }

    pub fn insert(&mut self, sku: impl Into<String>, metadata: ProductMetadata) {
        self.catalog.insert(sku.into(), metadata);
    }

    pub fn len(&self) -> usize {
        self.catalog.len()
    }

    pub fn is_empty(&self) -> bool {
        self.catalog.is_empty()
    }

    /// Load a catalog file. `.json` files are parsed as JSON, anything else as YAML.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).with_context(|| format!("Failed to read product metadata: {}", path.display()))?;
        let catalog: ProductCatalog = if is_json_path(path) {
            serde_json::from_str(&content).with_context(|| format!("Invalid JSON product metadata: {}", path.display()))?
        } else {
            serde_yaml::from_str(&content).with_context(|| format!("Invalid YAML product metadata: {}", path.display()))?
        };
        Ok(Self::new(catalog))
    }
}

impl ProductMetadataProvider for StaticMetadataProvider {
    fn product_metadata(&self, sku: &str) -> Option<&ProductMetadata> {
        self.catalog.get(sku)
    }
}

pub(crate) fn is_json_path(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG_YAML: &str = r#"
tshirt:
  configurable_attributes:
    Color:
      attribute_id: 93
      options:
        Red: { id: 12 }
        Blue: { id: 13 }
kit:
  bundle_options:
    - title: Drive Selection
      assigned_products:
        - { name: SSD 512GB, option_id: 1, selection_id: 10, selection_qty: 2 }
"#;

    #[test]
    fn loads_yaml_catalog_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("products.yaml");
        fs::write(&path, CATALOG_YAML).unwrap();

        let provider = StaticMetadataProvider::from_path(&path).expect("load catalog");
        assert_eq!(provider.len(), 2);

        let tshirt = provider.product_metadata("tshirt").expect("tshirt metadata");
        assert_eq!(tshirt.configurable_attributes["Color"].attribute_id, 93);
        assert_eq!(tshirt.configurable_attributes["Color"].options["Blue"].id, 13);

        let kit = provider.product_metadata("kit").expect("kit metadata");
        assert_eq!(kit.bundle_options[0].assigned_products[0].selection_qty, 2);
        assert!(provider.product_metadata("missing").is_none());
    }

    #[test]
    fn loads_json_catalog_by_extension() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("products.JSON");
        fs::write(
            &path,
            r#"{"ebook": {"bundle_options": [{"title": "Format", "assigned_products": [{"name": "PDF", "option_id": 2, "selection_id": 20}]}]}}"#,
        )
        .unwrap();

        let provider = StaticMetadataProvider::from_path(&path).expect("load catalog");
        let ebook = provider.product_metadata("ebook").expect("ebook metadata");
        assert_eq!(ebook.bundle_options[0].assigned_products[0].selection_qty, 1);
    }

    #[test]
    fn reports_missing_and_malformed_files() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = StaticMetadataProvider::from_path(temp_dir.path().join("nope.yaml")).unwrap_err();
        assert!(missing.to_string().contains("Failed to read product metadata"));

        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        let malformed = StaticMetadataProvider::from_path(&path).unwrap_err();
        assert!(malformed.to_string().contains("Invalid JSON product metadata"));
    }
}
