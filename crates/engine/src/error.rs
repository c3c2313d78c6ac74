//! Error types surfaced by the checkout engine.

use serde_json::Value;
use thiserror::Error;

use crate::executor::StepKind;

/// Failure of an order placement run.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// A step's remote call failed or returned an unexpected shape.
    #[error("{step} failed ({}): {reason}", .step.failure_summary())]
    Step {
        step: StepKind,
        reason: FailureReason,
        /// Raw response of the failing call; `null` when no response was read.
        response: Value,
    },

    /// The order request was rejected before any remote call.
    #[error("invalid order request: {0}")]
    InvalidRequest(String),
}

impl WorkflowError {
    /// Step that failed, if the failure happened inside the workflow.
    pub fn step(&self) -> Option<StepKind> {
        match self {
            WorkflowError::Step { step, .. } => Some(*step),
            WorkflowError::InvalidRequest(_) => None,
        }
    }

    pub fn response(&self) -> Option<&Value> {
        match self {
            WorkflowError::Step { response, .. } => Some(response),
            WorkflowError::InvalidRequest(_) => None,
        }
    }
}

/// Shape a step requires from its response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpectedShape {
    /// A non-negative integer, as a JSON number or numeric string.
    NumericId,
    /// Exactly the JSON literal `true`.
    ExactTrue,
    /// Anything except an object carrying a `message` field.
    NoErrorMessage,
}

impl std::fmt::Display for ExpectedShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            ExpectedShape::NumericId => "a numeric id",
            ExpectedShape::ExactTrue => "literal true",
            ExpectedShape::NoErrorMessage => "a response without an error message",
        };
        f.write_str(label)
    }
}

/// Why a step failed.
#[derive(Debug, Error)]
pub enum FailureReason {
    #[error("expected {expected}, got {actual}")]
    UnexpectedShape { expected: ExpectedShape, actual: String },

    #[error("remote error: {0}")]
    ErrorMessage(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error(transparent)]
    Translation(#[from] TranslateError),

    #[error("shipping method '{0}' is not in carrier_method form")]
    InvalidShippingMethod(String),
}

/// Failure to turn a checkout selection into a product option payload.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TranslateError {
    #[error("no product metadata for '{sku}'")]
    UnknownProduct { sku: String },

    #[error("product '{sku}' has no configurable attribute titled '{title}'")]
    UnknownAttribute { sku: String, title: String },

    #[error("attribute '{title}' of product '{sku}' has no option '{value}'")]
    UnknownOptionValue { sku: String, title: String, value: String },
}
