//! reqwest-backed [`Transport`] used against a live cart API.

use std::time::Instant;

use anyhow::{Context, Result, anyhow};
use cartflow_api::{CartflowClient, Transport};
use reqwest::{Method, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use crate::{block_on_future, http::parse_response_body, http::status_error_message, redact_sensitive};

/// Response buffered between `write` and `close`.
#[derive(Debug)]
struct PendingResponse {
    method: Method,
    url: String,
    status: StatusCode,
    body: String,
}

/// Blocking HTTP transport.
///
/// `write` sends the request and buffers the whole response; `read` decodes the buffered body;
/// `close` drops it. Non-2xx responses are still readable because the cart API reports
/// failures (for example `{"message": "..."}`) in the body, which the engine inspects.
#[derive(Debug)]
pub struct HttpTransport {
    client: CartflowClient,
    pending: Option<PendingResponse>,
}

impl HttpTransport {
    pub fn new(client: CartflowClient) -> Self {
        Self { client, pending: None }
    }
}

impl Transport for HttpTransport {
    fn write(&mut self, url: &str, payload: &Value, method: Method) -> Result<()> {
        self.close();

        let start = Instant::now();
        let request = self.client.request(method.clone(), url).json(payload);
        let exchange = async move {
            let response = request.send().await.map_err(|error| anyhow!("Network error: {error}"))?;
            let status = response.status();
            let body = response.text().await.context("read response body")?;
            Ok::<_, anyhow::Error>((status, body))
        };
        let (status, body) = block_on_future(exchange).inspect_err(|error| {
            warn!(
                method = %method,
                url = %url,
                error = %error,
                duration_ms = start.elapsed().as_millis(),
                "http request failed"
            );
        })?;

        if status.is_success() {
            debug!(
                method = %method,
                url = %url,
                status = %status,
                body_len = body.len(),
                duration_ms = start.elapsed().as_millis(),
                "http request completed"
            );
        } else {
            warn!(
                method = %method,
                url = %url,
                status = %status,
                hint = %status_error_message(status.as_u16()).unwrap_or_default(),
                body = %redact_sensitive(&body),
                duration_ms = start.elapsed().as_millis(),
                "http request returned error status"
            );
        }

        self.pending = Some(PendingResponse {
            method,
            url: url.to_string(),
            status,
            body,
        });
        Ok(())
    }

    fn read(&mut self) -> Result<Value> {
        let pending = self.pending.as_ref().ok_or_else(|| anyhow!("read called without a pending request"))?;
        parse_response_body(&pending.body, Some(pending.status)).map_err(|error| {
            warn!(
                method = %pending.method,
                url = %pending.url,
                status = %pending.status,
                error = %error,
                "http response JSON parse failed"
            );
            anyhow!(error)
        })
    }

    fn close(&mut self) {
        if let Some(pending) = self.pending.take() {
            debug!(method = %pending.method, url = %pending.url, "http exchange released");
        }
    }
}
