//! Order placement executor.
//!
//! [`CheckoutExecutor::run`] drives the fixed step sequence against a [`Transport`]:
//!
//! 1. create the cart and obtain its transaction id
//! 2. add every line item, with translated product options
//! 3. apply the coupon (when present)
//! 4. set the billing address
//! 5. set the shipping address and method (when a shipping method is present)
//! 6. set the payment method
//! 7. place the order
//!
//! The first failure aborts the run; nothing already committed remotely is rolled back.

use std::sync::Arc;

use cartflow_api::Transport;
use cartflow_types::{CartItem, CartItemEnvelope, OrderRequest, PlacedOrder, TransactionId};
use reqwest::Method;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::address::AddressMapper;
use crate::config::{CheckoutConfig, ConfigError};
use crate::error::{ExpectedShape, FailureReason, WorkflowError};
use crate::events::EventSink;
use crate::provider::ProductMetadataProvider;
use crate::translate::translate_line_item;

mod endpoints;
mod exchange;
mod planning;
mod runner;
mod types;

pub use endpoints::Endpoints;
pub use exchange::numeric_id;
pub use planning::{PlannedStep, plan, skip_reason};
pub use types::{StepKind, StepRecord, StepStatus};

use runner::StepRunner;

/// Outcome of one run together with per-step telemetry.
#[derive(Debug)]
pub struct WorkflowRun {
    pub outcome: Result<PlacedOrder, WorkflowError>,
    /// Records for every step that was skipped or started, in execution order.
    pub steps: Vec<StepRecord>,
}

impl WorkflowRun {
    pub fn into_result(self) -> Result<PlacedOrder, WorkflowError> {
        self.outcome
    }
}

/// Places orders through the cart API.
///
/// The executor holds only immutable configuration and shared collaborators; every run gets
/// its own transport and keeps its transaction id on the stack.
pub struct CheckoutExecutor {
    endpoints: Endpoints,
    address_mapper: AddressMapper,
    metadata: Arc<dyn ProductMetadataProvider>,
    events: Arc<dyn EventSink>,
}

impl CheckoutExecutor {
    pub fn new(
        config: &CheckoutConfig,
        metadata: Arc<dyn ProductMetadataProvider>,
        events: Arc<dyn EventSink>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            endpoints: Endpoints::new(&config.base_url),
            address_mapper: AddressMapper::with_extra_mappings(&config.address_mappings),
            metadata,
            events,
        })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Place the order and return the zero-padded order id.
    pub fn place_order(&self, request: &OrderRequest, transport: &mut dyn Transport) -> Result<PlacedOrder, WorkflowError> {
        self.run(request, transport).into_result()
    }

    /// Place the order, keeping the step records alongside the outcome.
    pub fn run(&self, request: &OrderRequest, transport: &mut dyn Transport) -> WorkflowRun {
        info!(
            items = request.items.len(),
            customer = request.customer_id.is_some(),
            coupon = request.coupon_code.is_some(),
            shipping = request.shipping_method.is_some(),
            "placing order"
        );
        let mut runner = StepRunner::new(transport, self.events.as_ref());
        let outcome = self.drive(request, &mut runner);
        match &outcome {
            Ok(order) => info!(order_id = %order.id, "order placed"),
            Err(error) => warn!(error = %error, "order placement failed"),
        }
        WorkflowRun {
            outcome,
            steps: runner.finish(),
        }
    }

    fn drive(&self, request: &OrderRequest, runner: &mut StepRunner<'_>) -> Result<PlacedOrder, WorkflowError> {
        if request.items.is_empty() {
            return Err(WorkflowError::InvalidRequest("the order has no line items".into()));
        }

        let cart = runner.step(StepKind::CreateTransaction, |runner| self.create_transaction(request, runner))?;
        runner.step(StepKind::AddLineItems, |runner| self.add_line_items(cart, request, runner))?;

        runner.step_if_requested(StepKind::ApplyCoupon, request, |runner| {
            let coupon_code = request.coupon_code.as_deref().unwrap_or_default();
            let payload = json!({ "cartId": cart, "couponCode": coupon_code });
            runner.call(
                StepKind::ApplyCoupon,
                ExpectedShape::ExactTrue,
                &self.endpoints.coupon(cart, coupon_code),
                &payload,
                Method::PUT,
            )
        })?;

        runner.step(StepKind::SetBillingAddress, |runner| {
            let payload = json!({ "address": self.address_mapper.prepare(&request.billing_address) });
            runner.call_for_id(StepKind::SetBillingAddress, &self.endpoints.billing_address(cart), &payload, Method::POST)
        })?;

        runner.step_if_requested(StepKind::SetShippingAddress, request, |runner| {
            let payload = json!({ "address": self.address_mapper.prepare(request.effective_shipping_address()) });
            runner.call_for_id(StepKind::SetShippingAddress, &self.endpoints.shipping_address(cart), &payload, Method::POST)
        })?;

        runner.step_if_requested(StepKind::SetShippingMethod, request, |runner| {
            let token = request.shipping_method.as_deref().unwrap_or_default();
            let (carrier_code, method_code) = split_shipping_method(token).ok_or_else(|| {
                runner.fail(
                    StepKind::SetShippingMethod,
                    FailureReason::InvalidShippingMethod(token.to_string()),
                    Value::Null,
                )
            })?;
            let payload = json!({ "carrierCode": carrier_code, "methodCode": method_code });
            runner.call(
                StepKind::SetShippingMethod,
                ExpectedShape::ExactTrue,
                &self.endpoints.shipping_method(cart),
                &payload,
                Method::PUT,
            )
        })?;

        runner.step(StepKind::SetPaymentMethod, |runner| {
            let payload = json!({ "cartId": cart, "method": &request.payment_method });
            runner.call(
                StepKind::SetPaymentMethod,
                ExpectedShape::ExactTrue,
                &self.endpoints.payment_method(cart),
                &payload,
                Method::PUT,
            )
        })?;

        let order_id = runner.step(StepKind::PlaceOrder, |runner| {
            runner.call_for_id(StepKind::PlaceOrder, &self.endpoints.order(cart), &json!({ "cartId": cart }), Method::PUT)
        })?;

        Ok(PlacedOrder::from_order_id(order_id))
    }

    fn create_transaction(&self, request: &OrderRequest, runner: &mut StepRunner<'_>) -> Result<TransactionId, WorkflowError> {
        let (url, payload) = match request.customer_id {
            Some(customer_id) => (
                self.endpoints.customer_carts(customer_id),
                json!({ "customerId": customer_id.to_string() }),
            ),
            None => (self.endpoints.carts(), json!({})),
        };
        runner
            .call_for_id(StepKind::CreateTransaction, &url, &payload, Method::POST)
            .map(TransactionId)
    }

    fn add_line_items(&self, cart: TransactionId, request: &OrderRequest, runner: &mut StepRunner<'_>) -> Result<(), WorkflowError> {
        let url = self.endpoints.cart_items();
        for item in &request.items {
            let product_option = translate_line_item(item, self.metadata.as_ref())
                .map_err(|error| runner.fail(StepKind::AddLineItems, FailureReason::Translation(error), Value::Null))?;
            let envelope = CartItemEnvelope {
                cart_item: CartItem {
                    sku: item.sku.clone(),
                    qty: item.quantity(),
                    quote_id: cart,
                    product_option,
                },
            };
            runner.call(StepKind::AddLineItems, ExpectedShape::NoErrorMessage, &url, &json!(envelope), Method::POST)?;
        }
        Ok(())
    }
}

/// Split a `carrier_method` token on its first underscore.
///
/// `ups_next_day` becomes `("ups", "next_day")`. Tokens without an underscore, or with an empty
/// carrier or method, are rejected.
pub fn split_shipping_method(token: &str) -> Option<(&str, &str)> {
    let (carrier_code, method_code) = token.split_once('_')?;
    if carrier_code.is_empty() || method_code.is_empty() {
        return None;
    }
    Some((carrier_code, method_code))
}
