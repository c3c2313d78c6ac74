//! Shared helpers for the Cartflow engine and CLI.
//!
//! - [`http`] provides the reqwest-backed [`http::HttpTransport`] and response parsing
//! - [`async_runtime`] bridges async client calls into the blocking transport contract
//! - [`redact_sensitive`] scrubs secrets before raw payloads reach the logs

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

pub mod async_runtime;
pub mod http;
pub mod path_processing;

pub use async_runtime::block_on_future;
pub use path_processing::expand_tilde;

static SENSITIVE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)(authorization: )([\w\-\.=:/+]+)",
        r"(?i)([A-Z0-9_]*?(KEY|TOKEN|SECRET|PASSWORD)=)([^\s]+)",
        r#"(?i)("[a-z0-9_]*(token|password|secret|cc_number|cc_cid)"\s*:\s*)"[^"]*""#,
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Redacts values that look like secrets in a string.
///
/// Covers `Authorization:` headers, `NAME_TOKEN=value` pairs, and JSON string fields whose key
/// names a token, password, secret, or card number.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for pattern in SENSITIVE_PATTERNS.iter() {
        redacted = pattern
            .replace_all(&redacted, |caps: &Captures| {
                let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("");
                if prefix.trim_end().ends_with(':') && prefix.starts_with('"') {
                    format!("{}\"<redacted>\"", prefix)
                } else {
                    format!("{}<redacted>", prefix)
                }
            })
            .to_string();
    }
    redacted
}

#[cfg(test)]
mod tests {
    use super::redact_sensitive;

    #[test]
    fn redacts_headers_and_env_pairs() {
        let line = redact_sensitive("authorization: Bearer-abc CARTFLOW_API_TOKEN=s3cr3t");
        assert!(!line.contains("Bearer-abc"));
        assert!(!line.contains("s3cr3t"));
        assert!(line.contains("CARTFLOW_API_TOKEN=<redacted>"));
    }

    #[test]
    fn redacts_json_secret_fields_and_keeps_the_rest() {
        let payload = r#"{"method":"ccsave","cc_number":"4111111111111111","customer_token": "xyz","message":"declined"}"#;
        let redacted = redact_sensitive(payload);

        assert!(!redacted.contains("4111111111111111"));
        assert!(!redacted.contains("xyz"));
        assert!(redacted.contains(r#""cc_number":"<redacted>""#));
        assert!(redacted.contains(r#""message":"declined""#));
    }
}
