use std::time::Instant;

use cartflow_api::Transport;
use cartflow_types::OrderRequest;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};

use super::exchange::{check_id, check_shape, exchange};
use super::planning::skip_reason;
use super::types::{StepKind, StepRecord, StepStatus};
use crate::error::{ExpectedShape, FailureReason, WorkflowError};
use crate::events::{EventContext, EventSink, WORKFLOW_FAILED_EVENT};

/// Drives the steps of one run over a borrowed transport and records their telemetry.
///
/// Steps that never start because an earlier step failed have no record.
pub(crate) struct StepRunner<'a> {
    transport: &'a mut dyn Transport,
    events: &'a dyn EventSink,
    records: Vec<StepRecord>,
    step_calls: usize,
}

impl<'a> StepRunner<'a> {
    pub(crate) fn new(transport: &'a mut dyn Transport, events: &'a dyn EventSink) -> Self {
        Self {
            transport,
            events,
            records: Vec::with_capacity(StepKind::ALL.len()),
            step_calls: 0,
        }
    }

    /// Run `body` as `step`, recording whether it succeeded and how many calls it issued.
    pub(crate) fn step<T>(
        &mut self,
        step: StepKind,
        body: impl FnOnce(&mut Self) -> Result<T, WorkflowError>,
    ) -> Result<T, WorkflowError> {
        self.step_calls = 0;
        let outcome = body(self);
        let status = if outcome.is_ok() {
            StepStatus::Succeeded
        } else {
            StepStatus::Failed
        };
        self.records.push(StepRecord {
            step,
            status,
            calls: self.step_calls,
        });
        outcome
    }

    /// Run a conditional step, or record it as skipped when its trigger field is absent.
    pub(crate) fn step_if_requested<T>(
        &mut self,
        step: StepKind,
        request: &OrderRequest,
        body: impl FnOnce(&mut Self) -> Result<T, WorkflowError>,
    ) -> Result<Option<T>, WorkflowError> {
        match skip_reason(step, request) {
            Some(reason) => {
                debug!(step = %step, reason, "skipping step");
                self.records.push(StepRecord {
                    step,
                    status: StepStatus::Skipped,
                    calls: 0,
                });
                Ok(None)
            }
            None => self.step(step, body).map(Some),
        }
    }

    /// Issue one call for `step` and check the response against `expected`.
    pub(crate) fn call(
        &mut self,
        step: StepKind,
        expected: ExpectedShape,
        url: &str,
        payload: &Value,
        method: Method,
    ) -> Result<(), WorkflowError> {
        let response = self.send(step, url, payload, method)?;
        check_shape(expected, &response).map_err(|reason| self.fail(step, reason, response))
    }

    /// Issue one call for `step` whose response must be a numeric id, and return that id.
    pub(crate) fn call_for_id(
        &mut self,
        step: StepKind,
        url: &str,
        payload: &Value,
        method: Method,
    ) -> Result<u64, WorkflowError> {
        let response = self.send(step, url, payload, method)?;
        check_id(&response).map_err(|reason| self.fail(step, reason, response))
    }

    fn send(&mut self, step: StepKind, url: &str, payload: &Value, method: Method) -> Result<Value, WorkflowError> {
        self.step_calls += 1;
        let started = Instant::now();
        debug!(step = %step, %method, %url, "sending step request");

        let response = match exchange(&mut *self.transport, url, payload, method.clone()) {
            Ok(response) => response,
            Err(error) => return Err(self.fail(step, FailureReason::Transport(format!("{error:#}")), Value::Null)),
        };
        debug!(
            step = %step,
            %method,
            %url,
            duration_ms = started.elapsed().as_millis() as u64,
            "step response received"
        );
        Ok(response)
    }

    /// Report a step failure to the event sink and build the error returned to the caller.
    pub(crate) fn fail(&self, step: StepKind, reason: FailureReason, response: Value) -> WorkflowError {
        let context = EventContext {
            step,
            reason: reason.to_string(),
            response,
        };
        warn!(step = %step, reason = %context.reason, "step failed");
        self.events.dispatch(WORKFLOW_FAILED_EVENT, &context);
        WorkflowError::Step {
            step,
            reason,
            response: context.response,
        }
    }

    pub(crate) fn finish(self) -> Vec<StepRecord> {
        self.records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::RecordingEventSink;
    use cartflow_api::ScriptedTransport;
    use serde_json::json;

    #[test]
    fn records_calls_and_status_per_step() {
        let mut transport = ScriptedTransport::with_bodies([json!(3), json!({ "message": "no" })]);
        let events = RecordingEventSink::new();
        let mut runner = StepRunner::new(&mut transport, &events);

        let id = runner
            .step(StepKind::CreateTransaction, |runner| {
                runner.call_for_id(StepKind::CreateTransaction, "http://shop/carts", &json!({}), Method::POST)
            })
            .unwrap();
        assert_eq!(id, 3);

        let error = runner
            .step(StepKind::AddLineItems, |runner| {
                runner.call(
                    StepKind::AddLineItems,
                    ExpectedShape::NoErrorMessage,
                    "http://shop/carts/items",
                    &json!({}),
                    Method::POST,
                )
            })
            .unwrap_err();
        assert_eq!(error.step(), Some(StepKind::AddLineItems));

        let records = runner.finish();
        assert_eq!(
            records,
            vec![
                StepRecord { step: StepKind::CreateTransaction, status: StepStatus::Succeeded, calls: 1 },
                StepRecord { step: StepKind::AddLineItems, status: StepStatus::Failed, calls: 1 },
            ]
        );
        assert_eq!(events.events().len(), 1);
        assert_eq!(events.events()[0].context.response, json!({ "message": "no" }));
    }

    #[test]
    fn transport_errors_fail_with_null_response() {
        let mut transport = ScriptedTransport::new();
        transport.push_transport_error("connection refused");
        let events = RecordingEventSink::new();
        let mut runner = StepRunner::new(&mut transport, &events);

        let error = runner
            .call_for_id(StepKind::PlaceOrder, "http://shop/carts/1/order", &json!({}), Method::PUT)
            .unwrap_err();

        match error {
            WorkflowError::Step { reason: FailureReason::Transport(ref message), ref response, .. } => {
                assert!(message.contains("connection refused"));
                assert_eq!(response, &Value::Null);
            }
            other => panic!("unexpected error: {other:?}"),
        }
        drop(runner);
        assert_eq!(transport.close_count(), 1);
        assert_eq!(events.events()[0].name, WORKFLOW_FAILED_EVENT);
    }

    #[test]
    fn rejected_id_reports_a_single_failure() {
        let mut transport = ScriptedTransport::with_bodies([json!({ "cart": "x" })]);
        let events = RecordingEventSink::new();
        let mut runner = StepRunner::new(&mut transport, &events);

        let error = runner
            .call_for_id(StepKind::CreateTransaction, "http://shop/carts", &json!({}), Method::POST)
            .unwrap_err();

        assert!(matches!(
            error,
            WorkflowError::Step { reason: FailureReason::UnexpectedShape { expected: ExpectedShape::NumericId, .. }, .. }
        ));
        assert_eq!(events.events().len(), 1);
        assert_eq!(events.events()[0].context.response, json!({ "cart": "x" }));
    }
}
