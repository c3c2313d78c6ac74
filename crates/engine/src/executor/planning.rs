//! Run/skip decisions for each step of an order request.
//!
//! The executor consults the same decisions while running, so a preview produced by [`plan`]
//! lists exactly the calls a real run would issue up to its first failure.

use cartflow_types::OrderRequest;
use serde::Serialize;

use super::StepKind;

/// One entry of a placement plan.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PlannedStep {
    pub step: StepKind,
    /// Remote calls the step issues when it runs; zero when skipped.
    pub calls: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<&'static str>,
}

impl PlannedStep {
    pub fn will_run(&self) -> bool {
        self.skip_reason.is_none()
    }
}

/// Why a conditional step does not apply to the request, or `None` when it runs.
///
/// The shipping address is only sent when a shipping method is present; an order without one
/// is treated as virtual.
pub fn skip_reason(step: StepKind, request: &OrderRequest) -> Option<&'static str> {
    match step {
        StepKind::ApplyCoupon if request.coupon_code.is_none() => Some("no coupon_code in the order request"),
        StepKind::SetShippingAddress | StepKind::SetShippingMethod if request.shipping_method.is_none() => {
            Some("no shipping_method in the order request")
        }
        _ => None,
    }
}

/// Build the ordered plan for a request without touching the transport.
pub fn plan(request: &OrderRequest) -> Vec<PlannedStep> {
    StepKind::ALL
        .iter()
        .map(|&step| {
            let skip_reason = skip_reason(step, request);
            let calls = match (skip_reason, step) {
                (Some(_), _) => 0,
                (None, StepKind::AddLineItems) => request.items.len(),
                (None, _) => 1,
            };
            PlannedStep { step, calls, skip_reason }
        })
        .collect()
}
