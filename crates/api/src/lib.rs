//! Cartflow API client utilities.
//!
//! This crate provides the seams between the checkout engine and the remote shop API:
//!
//! - [`Transport`], the blocking write/read/close contract every cart call goes through
//! - [`CartflowClient`], a configured `reqwest::Client` with auth and default headers
//! - [`validate_base_url`], a guard for the configured API base URL
//! - [`ScriptedTransport`], a transport double with queued responses and a call log
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use cartflow_api::CartflowClient;
//!
//! let client = CartflowClient::new(Some("token"), Duration::from_secs(30))?;
//! let request = client.request(reqwest::Method::POST, "https://shop.example.com/rest/V1/carts");
//! ```

use std::env;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, RequestBuilder, header};
use tracing::{debug, warn};
use url::Url;

pub mod scripted;
pub mod transport;

pub use scripted::{RecordedCall, ScriptedResponse, ScriptedTransport};
pub use transport::Transport;

/// Hostnames allowed to use plain HTTP without a warning.
const LOCALHOST_DOMAINS: &[&str] = &["localhost", "127.0.0.1"];

/// Thin wrapper around a configured `reqwest::Client` for cart API access.
///
/// Every request carries the JSON accept header and, when a token is supplied, bearer
/// authentication. Requests are built against absolute URLs; endpoint construction belongs to
/// the engine.
#[derive(Debug, Clone)]
pub struct CartflowClient {
    pub http: Client,
    pub user_agent: String,
    headers: header::HeaderMap,
}

impl CartflowClient {
    /// Construct a client with an optional bearer token and a per-request timeout.
    pub fn new(api_token: Option<&str>, timeout: Duration) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        if let Some(api_token) = api_token.filter(|token| !token.trim().is_empty()) {
            let authorization_header_value = format!("Bearer {}", api_token.trim());
            let mut authorization =
                header::HeaderValue::from_str(&authorization_header_value).context("invalid API token header value")?;
            authorization.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, authorization);
        }
        headers.insert(header::ACCEPT, header::HeaderValue::from_static("application/json"));

        let http = Client::builder().timeout(timeout).build().context("build http client")?;

        Ok(Self {
            http,
            user_agent: format!("cartflow/{}; {}", env!("CARGO_PKG_VERSION"), env::consts::OS),
            headers,
        })
    }

    /// Build a `reqwest::RequestBuilder` for a method and absolute URL.
    pub fn request(&self, method: reqwest::Method, url: &str) -> RequestBuilder {
        debug!(%url, %method, "building request");

        self.http
            .request(method, url)
            .headers(self.headers.clone())
            .header(header::USER_AGENT, &self.user_agent)
    }
}

/// Validate that a base URL is acceptable for use by the client.
///
/// Rules:
/// - the URL must parse and carry a host
/// - the scheme must be `http` or `https`
/// - plain `http` is accepted but logged for anything other than `localhost`/`127.0.0.1`
pub fn validate_base_url(base: &str) -> Result<Url> {
    let parsed_base_url = Url::parse(base).map_err(|e| anyhow!("Invalid base URL '{}': {}", base, e))?;

    let host_name = parsed_base_url
        .host_str()
        .ok_or_else(|| anyhow!("base URL '{}' must include a host", base))?
        .to_string();

    match parsed_base_url.scheme() {
        "https" => {}
        "http" => {
            let is_local = LOCALHOST_DOMAINS
                .iter()
                .any(|&allowed| host_name.eq_ignore_ascii_case(allowed));
            if !is_local {
                warn!(host = %host_name, "base URL uses plain http for a non-local host");
            }
        }
        other => {
            return Err(anyhow!("base URL must use http or https; got '{}://'", other));
        }
    }

    Ok(parsed_base_url)
}
