//! Diagnostic notifications emitted when a step fails.
//!
//! The executor reports every step failure to an injected [`EventSink`] before returning the
//! error. Dispatch is fire-and-forget: sinks cannot fail the run and nothing waits on them.

use std::sync::Mutex;

use cartflow_util::redact_sensitive;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;
use tracing::warn;

use crate::executor::StepKind;

/// Event name dispatched for every step failure.
pub const WORKFLOW_FAILED_EVENT: &str = "workflow_failed";

/// Context attached to a dispatched event.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventContext {
    pub step: StepKind,
    /// Rendered failure reason.
    pub reason: String,
    /// Raw response of the failing call, or `null` when none was read.
    pub response: Value,
}

/// Observer for workflow diagnostics.
pub trait EventSink: Send + Sync {
    fn dispatch(&self, event_name: &str, context: &EventContext);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEventSink;

impl EventSink for NullEventSink {
    fn dispatch(&self, _event_name: &str, _context: &EventContext) {}
}

/// Logs events at warn level with secrets redacted from the raw response.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingEventSink;

impl EventSink for TracingEventSink {
    fn dispatch(&self, event_name: &str, context: &EventContext) {
        warn!(
            event = %event_name,
            step = %context.step,
            reason = %context.reason,
            response = %redact_sensitive(&context.response.to_string()),
            "workflow event"
        );
    }
}

/// An event captured by [`RecordingEventSink`] or forwarded by [`ChannelEventSink`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedEvent {
    pub name: String,
    pub context: EventContext,
}

/// Keeps every event in memory, in dispatch order.
#[derive(Debug, Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<RecordedEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<RecordedEvent> {
        self.events.lock().expect("event log lock").clone()
    }
}

impl EventSink for RecordingEventSink {
    fn dispatch(&self, event_name: &str, context: &EventContext) {
        self.events.lock().expect("event log lock").push(RecordedEvent {
            name: event_name.to_string(),
            context: context.clone(),
        });
    }
}

/// Forwards events over an unbounded Tokio channel; a dropped receiver is ignored.
#[derive(Debug, Clone)]
pub struct ChannelEventSink {
    sender: UnboundedSender<RecordedEvent>,
}

impl ChannelEventSink {
    pub fn new(sender: UnboundedSender<RecordedEvent>) -> Self {
        Self { sender }
    }
}

impl EventSink for ChannelEventSink {
    fn dispatch(&self, event_name: &str, context: &EventContext) {
        let _ = self.sender.send(RecordedEvent {
            name: event_name.to_string(),
            context: context.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tokio::sync::mpsc::unbounded_channel;

    fn context() -> EventContext {
        EventContext {
            step: StepKind::AddLineItems,
            reason: "remote error: out of stock".into(),
            response: json!({ "message": "out of stock" }),
        }
    }

    #[test]
    fn recording_sink_keeps_events_in_order() {
        let sink = RecordingEventSink::new();
        sink.dispatch(WORKFLOW_FAILED_EVENT, &context());
        sink.dispatch("custom", &context());

        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].name, WORKFLOW_FAILED_EVENT);
        assert_eq!(events[0].context.response, json!({ "message": "out of stock" }));
        assert_eq!(events[1].name, "custom");
    }

    #[tokio::test]
    async fn channel_sink_forwards_and_tolerates_closed_receiver() {
        let (sender, mut receiver) = unbounded_channel();
        let sink = ChannelEventSink::new(sender);

        sink.dispatch(WORKFLOW_FAILED_EVENT, &context());
        let event = receiver.recv().await.expect("forwarded event");
        assert_eq!(event.context.step, StepKind::AddLineItems);

        drop(receiver);
        sink.dispatch(WORKFLOW_FAILED_EVENT, &context());
    }

    #[test]
    fn event_context_serializes_step_in_kebab_case() {
        let value = serde_json::to_value(context()).expect("serialize context");
        assert_eq!(value["step"], "add-line-items");
    }
}
