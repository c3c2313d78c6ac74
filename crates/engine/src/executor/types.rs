//! Core executor data types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The fixed, ordered steps of an order placement run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum StepKind {
    CreateTransaction,
    AddLineItems,
    ApplyCoupon,
    SetBillingAddress,
    SetShippingAddress,
    SetShippingMethod,
    SetPaymentMethod,
    PlaceOrder,
}

impl StepKind {
    /// Every step in execution order.
    pub const ALL: [StepKind; 8] = [
        StepKind::CreateTransaction,
        StepKind::AddLineItems,
        StepKind::ApplyCoupon,
        StepKind::SetBillingAddress,
        StepKind::SetShippingAddress,
        StepKind::SetShippingMethod,
        StepKind::SetPaymentMethod,
        StepKind::PlaceOrder,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StepKind::CreateTransaction => "create-transaction",
            StepKind::AddLineItems => "add-line-items",
            StepKind::ApplyCoupon => "apply-coupon",
            StepKind::SetBillingAddress => "set-billing-address",
            StepKind::SetShippingAddress => "set-shipping-address",
            StepKind::SetShippingMethod => "set-shipping-method",
            StepKind::SetPaymentMethod => "set-payment-method",
            StepKind::PlaceOrder => "place-order",
        }
    }

    /// Human readable summary used in error messages.
    pub fn failure_summary(self) -> &'static str {
        match self {
            StepKind::CreateTransaction => "could not create the checkout cart",
            StepKind::AddLineItems => "could not add a product item to the cart",
            StepKind::ApplyCoupon => "could not apply the coupon code",
            StepKind::SetBillingAddress => "could not set the billing address",
            StepKind::SetShippingAddress => "could not set the shipping address",
            StepKind::SetShippingMethod => "could not set the shipping method",
            StepKind::SetPaymentMethod => "could not set the payment method",
            StepKind::PlaceOrder => "could not place the order",
        }
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of a step once the run is over.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Step did not run because its trigger field is absent.
    Skipped,
    /// Every call of the step returned the expected shape.
    Succeeded,
    /// A call failed; the run stopped here.
    Failed,
}

/// Telemetry for one step of a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StepRecord {
    pub step: StepKind,
    pub status: StepStatus,
    /// Remote calls issued by this step.
    pub calls: usize,
}
