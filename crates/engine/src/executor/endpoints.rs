//! Endpoint URLs derived from the configured base URL.

use cartflow_types::TransactionId;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};

/// Builds every cart endpoint by appending a fixed suffix to the base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Endpoints {
    /// Trailing slashes on `base_url` are dropped so suffixes never produce `//`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn carts(&self) -> String {
        format!("{}/carts", self.base_url)
    }

    pub fn customer_carts(&self, customer_id: u64) -> String {
        format!("{}/customers/{}/carts", self.base_url, customer_id)
    }

    pub fn cart_items(&self) -> String {
        format!("{}/carts/items", self.base_url)
    }

    pub fn coupon(&self, cart: TransactionId, coupon_code: &str) -> String {
        format!("{}/coupons/{}", self.cart(cart), utf8_percent_encode(coupon_code, NON_ALPHANUMERIC))
    }

    pub fn billing_address(&self, cart: TransactionId) -> String {
        format!("{}/billing-address", self.cart(cart))
    }

    pub fn shipping_address(&self, cart: TransactionId) -> String {
        format!("{}/shipping-address", self.cart(cart))
    }

    pub fn shipping_method(&self, cart: TransactionId) -> String {
        format!("{}/selected-shipping-method", self.cart(cart))
    }

    pub fn payment_method(&self, cart: TransactionId) -> String {
        format!("{}/selected-payment-method", self.cart(cart))
    }

    pub fn order(&self, cart: TransactionId) -> String {
        format!("{}/order", self.cart(cart))
    }

    fn cart(&self, cart: TransactionId) -> String {
        format!("{}/carts/{}", self.base_url, cart)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_append_fixed_suffixes() {
        let endpoints = Endpoints::new("https://shop.example.com/rest/V1");
        let cart = TransactionId(42);

        assert_eq!(endpoints.carts(), "https://shop.example.com/rest/V1/carts");
        assert_eq!(endpoints.customer_carts(7), "https://shop.example.com/rest/V1/customers/7/carts");
        assert_eq!(endpoints.cart_items(), "https://shop.example.com/rest/V1/carts/items");
        assert_eq!(endpoints.coupon(cart, "SAVE10"), "https://shop.example.com/rest/V1/carts/42/coupons/SAVE10");
        assert_eq!(endpoints.billing_address(cart), "https://shop.example.com/rest/V1/carts/42/billing-address");
        assert_eq!(endpoints.shipping_address(cart), "https://shop.example.com/rest/V1/carts/42/shipping-address");
        assert_eq!(
            endpoints.shipping_method(cart),
            "https://shop.example.com/rest/V1/carts/42/selected-shipping-method"
        );
        assert_eq!(
            endpoints.payment_method(cart),
            "https://shop.example.com/rest/V1/carts/42/selected-payment-method"
        );
        assert_eq!(endpoints.order(cart), "https://shop.example.com/rest/V1/carts/42/order");
    }

    #[test]
    fn trailing_slashes_do_not_double_up() {
        let endpoints = Endpoints::new("http://localhost/rest/V1//");
        assert_eq!(endpoints.base_url(), "http://localhost/rest/V1");
        assert_eq!(endpoints.carts(), "http://localhost/rest/V1/carts");
    }

    #[test]
    fn coupon_codes_are_encoded_as_one_segment() {
        let endpoints = Endpoints::new("http://localhost/rest/V1");
        assert_eq!(
            endpoints.coupon(TransactionId(1), "10% OFF/now"),
            "http://localhost/rest/V1/carts/1/coupons/10%25%20OFF%2Fnow"
        );
    }
}
