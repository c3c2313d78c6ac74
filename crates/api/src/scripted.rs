//! In-memory transport that replays queued responses.
//!
//! Tests and offline previews use [`ScriptedTransport`] in place of the HTTP transport. Each
//! `write` consumes the next scripted response and appends a [`RecordedCall`], so assertions can
//! check which endpoints were hit, with which payloads, and that every call was closed.

use std::collections::VecDeque;

use anyhow::{Result, anyhow, bail};
use reqwest::Method;
use serde_json::Value;

use crate::Transport;

/// Scripted outcome of one exchange.
#[derive(Debug, Clone, PartialEq)]
pub enum ScriptedResponse {
    /// Decoded response body returned by `read`.
    Body(Value),
    /// Transport-level failure surfaced by `read`.
    TransportError(String),
}

/// A request captured by [`ScriptedTransport::write`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub url: String,
    pub method: Method,
    pub payload: Value,
}

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: VecDeque<ScriptedResponse>,
    pending: Option<ScriptedResponse>,
    calls: Vec<RecordedCall>,
    close_count: usize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a transport that answers with the given bodies in order.
    pub fn with_bodies(bodies: impl IntoIterator<Item = Value>) -> Self {
        let mut transport = Self::new();
        for body in bodies {
            transport.push_body(body);
        }
        transport
    }

    pub fn push_body(&mut self, body: Value) -> &mut Self {
        self.responses.push_back(ScriptedResponse::Body(body));
        self
    }

    pub fn push_transport_error(&mut self, message: impl Into<String>) -> &mut Self {
        self.responses.push_back(ScriptedResponse::TransportError(message.into()));
        self
    }

    pub fn calls(&self) -> &[RecordedCall] {
        &self.calls
    }

    /// Number of recorded calls whose url contains `fragment`.
    pub fn calls_to(&self, fragment: &str) -> usize {
        self.calls.iter().filter(|call| call.url.contains(fragment)).count()
    }

    pub fn close_count(&self) -> usize {
        self.close_count
    }

    /// Responses that were scripted but never consumed.
    pub fn remaining(&self) -> usize {
        self.responses.len()
    }
}

impl Transport for ScriptedTransport {
    fn write(&mut self, url: &str, payload: &Value, method: Method) -> Result<()> {
        self.calls.push(RecordedCall {
            url: url.to_string(),
            method,
            payload: payload.clone(),
        });
        let next = self
            .responses
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted response left for {url}"))?;
        self.pending = Some(next);
        Ok(())
    }

    fn read(&mut self) -> Result<Value> {
        match self.pending.take() {
            Some(ScriptedResponse::Body(body)) => Ok(body),
            Some(ScriptedResponse::TransportError(message)) => Err(anyhow!(message)),
            None => bail!("read called without a pending request"),
        }
    }

    fn close(&mut self) {
        self.pending = None;
        self.close_count += 1;
    }
}
