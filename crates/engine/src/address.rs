//! Address preparation: value mapping and field stripping.
//!
//! Order requests describe addresses the way a person would (`region_id: California`), while
//! the cart API wants codes (`12`). [`AddressMapper`] translates the known fields through a
//! lookup table and removes the account-level `default_*` flags before transmission.

use cartflow_types::AddressSpec;
use indexmap::IndexMap;
use serde_json::{Map, Value};
use tracing::debug;

/// Fields that are never transmitted.
pub const STRIPPED_ADDRESS_FIELDS: &[&str] = &["default_billing", "default_shipping"];

/// Field name → (display value → code).
pub type AddressMappings = IndexMap<String, IndexMap<String, String>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressMapper {
    mappings: AddressMappings,
}

impl Default for AddressMapper {
    fn default() -> Self {
        let mut mappings = AddressMappings::new();
        mappings
            .entry("region_id".to_string())
            .or_default()
            .insert("California".to_string(), "12".to_string());
        mappings
            .entry("country_id".to_string())
            .or_default()
            .insert("United States".to_string(), "US".to_string());
        Self { mappings }
    }
}

impl AddressMapper {
    /// Built-in table extended (and overridden entry by entry) with `extra`.
    pub fn with_extra_mappings(extra: &AddressMappings) -> Self {
        let mut mapper = Self::default();
        for (field, values) in extra {
            let table = mapper.mappings.entry(field.clone()).or_default();
            for (display, code) in values {
                table.insert(display.clone(), code.clone());
            }
        }
        mapper
    }

    pub fn mappings(&self) -> &AddressMappings {
        &self.mappings
    }

    /// Produce the transmitted form of an address.
    ///
    /// String values of mapped fields are replaced by their code. Values missing from the
    /// table pass through unchanged, so already-coded addresses are left alone.
    pub fn prepare(&self, address: &AddressSpec) -> Map<String, Value> {
        let mut prepared = Map::new();
        for (field, value) in address {
            if STRIPPED_ADDRESS_FIELDS.contains(&field.as_str()) {
                continue;
            }
            prepared.insert(field.clone(), self.map_value(field, value));
        }
        prepared
    }

    fn map_value(&self, field: &str, value: &Value) -> Value {
        let Some(table) = self.mappings.get(field) else {
            return value.clone();
        };
        match value {
            Value::String(shown) => match table.get(shown) {
                Some(code) => Value::String(code.clone()),
                None => {
                    debug!(field, value = %shown, "address value has no mapping; sending as-is");
                    value.clone()
                }
            },
            other => other.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn address(fields: Value) -> AddressSpec {
        serde_json::from_value(fields).expect("address fields")
    }

    #[test]
    fn maps_region_and_country_names_to_codes() {
        let prepared = AddressMapper::default().prepare(&address(json!({
            "firstname": "Jane",
            "region_id": "California",
            "country_id": "United States",
        })));

        assert_eq!(prepared["region_id"], json!("12"));
        assert_eq!(prepared["country_id"], json!("US"));
        assert_eq!(prepared["firstname"], json!("Jane"));
    }

    #[test]
    fn strips_default_flags() {
        let prepared = AddressMapper::default().prepare(&address(json!({
            "city": "Culver City",
            "default_billing": true,
            "default_shipping": "Yes",
        })));

        assert!(!prepared.contains_key("default_billing"));
        assert!(!prepared.contains_key("default_shipping"));
        assert_eq!(prepared.len(), 1);
    }

    #[test]
    fn unmapped_and_non_string_values_pass_through() {
        let prepared = AddressMapper::default().prepare(&address(json!({
            "region_id": 12,
            "country_id": "US",
            "street": ["6161 W Centinela Ave"],
        })));

        assert_eq!(prepared["region_id"], json!(12));
        assert_eq!(prepared["country_id"], json!("US"));
        assert_eq!(prepared["street"], json!(["6161 W Centinela Ave"]));
    }

    #[test]
    fn extra_mappings_extend_and_override() {
        let mut extra = AddressMappings::new();
        extra.entry("region_id".into()).or_default().insert("Texas".into(), "57".into());
        extra.entry("region_id".into()).or_default().insert("California".into(), "CA".into());
        extra.entry("country_id".into()).or_default().insert("Germany".into(), "DE".into());

        let mapper = AddressMapper::with_extra_mappings(&extra);
        let prepared = mapper.prepare(&address(json!({
            "region_id": "Texas",
            "country_id": "Germany",
        })));
        assert_eq!(prepared["region_id"], json!("57"));
        assert_eq!(prepared["country_id"], json!("DE"));
        assert_eq!(mapper.mappings()["region_id"]["California"], "CA");
        assert_eq!(mapper.mappings()["country_id"]["United States"], "US");
    }
}
