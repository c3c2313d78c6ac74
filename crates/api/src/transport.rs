//! Blocking request/response contract used for every cart call.

use anyhow::Result;
use reqwest::Method;
use serde_json::Value;

/// One connection-oriented exchange: write a request, read its response, then close.
///
/// Callers must call [`Transport::close`] after every exchange, including failed ones. The
/// engine guarantees this with a scoped guard, so implementations can hold per-call state
/// (a buffered response, an open connection) between `write` and `close`.
pub trait Transport {
    /// Send `payload` as JSON to the absolute `url` with the given method.
    fn write(&mut self, url: &str, payload: &Value, method: Method) -> Result<()>;

    /// Read the decoded response of the last `write`.
    fn read(&mut self) -> Result<Value>;

    /// Release whatever the last exchange holds. Must be safe to call repeatedly.
    fn close(&mut self);
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, url: &str, payload: &Value, method: Method) -> Result<()> {
        (**self).write(url, payload, method)
    }

    fn read(&mut self) -> Result<Value> {
        (**self).read()
    }

    fn close(&mut self) {
        (**self).close()
    }
}
