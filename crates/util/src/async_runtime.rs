//! Bridge from the blocking transport contract to the async HTTP client.
//!
//! The engine drives steps synchronously; the HTTP client is async. [`block_on_future`] runs a
//! client future to completion on the caller's Tokio runtime when one exists, otherwise on a
//! throwaway current-thread runtime.

use anyhow::anyhow;
use std::future::Future;
use tokio::{runtime::Handle, task};

/// Execute an async future from synchronous code.
///
/// Inside a multi-threaded Tokio runtime the current worker is handed to `block_in_place`, so
/// calling this from a `current_thread` runtime panics; the CLI always builds a multi-threaded one.
pub fn block_on_future<F, T>(future: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    match Handle::try_current() {
        Ok(handle) => task::block_in_place(|| handle.block_on(future)),
        Err(_) => tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|error| anyhow!("could not start a runtime for the HTTP call: {error}"))?
            .block_on(future),
    }
}
