//! Single remote exchange with guaranteed release, plus response shape checks.

use anyhow::Result;
use cartflow_api::Transport;
use reqwest::Method;
use serde_json::Value;

use crate::error::{ExpectedShape, FailureReason};

/// Holds the transport for one write/read pair and closes it when dropped.
struct ExchangeGuard<'a> {
    transport: &'a mut dyn Transport,
}

impl<'a> ExchangeGuard<'a> {
    fn open(transport: &'a mut dyn Transport) -> Self {
        Self { transport }
    }

    fn round_trip(&mut self, url: &str, payload: &Value, method: Method) -> Result<Value> {
        self.transport.write(url, payload, method)?;
        self.transport.read()
    }
}

impl Drop for ExchangeGuard<'_> {
    fn drop(&mut self) {
        self.transport.close();
    }
}

/// Write `payload`, read the response, and release the transport on every exit path.
pub(crate) fn exchange(transport: &mut dyn Transport, url: &str, payload: &Value, method: Method) -> Result<Value> {
    let mut guard = ExchangeGuard::open(transport);
    guard.round_trip(url, payload, method)
}

/// Interpret a value as a non-negative integer id.
///
/// JSON numbers and numeric strings are accepted; fractional, negative, and non-numeric
/// values are not.
pub fn numeric_id(value: &Value) -> Option<u64> {
    match value {
        Value::Number(number) => number.as_u64(),
        Value::String(text) => text.trim().parse::<u64>().ok(),
        _ => None,
    }
}

/// Check the shape a step expects of its response.
pub(crate) fn check_shape(expected: ExpectedShape, response: &Value) -> Result<(), FailureReason> {
    match expected {
        ExpectedShape::NumericId => check_id(response).map(|_| ()),
        ExpectedShape::ExactTrue => match response {
            Value::Bool(true) => Ok(()),
            _ => Err(unexpected(expected, response)),
        },
        ExpectedShape::NoErrorMessage => match response.get("message") {
            None | Some(Value::Null) => Ok(()),
            Some(Value::String(message)) => Err(FailureReason::ErrorMessage(message.clone())),
            Some(other) => Err(FailureReason::ErrorMessage(other.to_string())),
        },
    }
}

/// Parse the id out of a response that must be a [`ExpectedShape::NumericId`].
pub(crate) fn check_id(response: &Value) -> Result<u64, FailureReason> {
    numeric_id(response).ok_or_else(|| unexpected(ExpectedShape::NumericId, response))
}

fn unexpected(expected: ExpectedShape, response: &Value) -> FailureReason {
    FailureReason::UnexpectedShape {
        expected,
        actual: summarize(response),
    }
}

fn summarize(response: &Value) -> String {
    let rendered = response.to_string();
    if rendered.chars().count() <= 120 {
        return rendered;
    }
    let truncated: String = rendered.chars().take(117).collect();
    format!("{truncated}...")
}
