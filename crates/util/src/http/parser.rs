//! # HTTP response parsing
//!
//! Helpers that turn raw cart API response bodies into JSON values with useful errors.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Maximum number of characters kept in a body preview.
const BODY_PREVIEW_LIMIT: usize = 200;

/// Return a user-friendly hint for common HTTP status codes.
///
/// # Example
/// ```rust
/// use cartflow_util::http::status_error_message;
///
/// assert!(status_error_message(401).unwrap().contains("CARTFLOW_API_TOKEN"));
/// assert!(status_error_message(404).is_none());
/// ```
pub fn status_error_message(status_code: u16) -> Option<String> {
    match status_code {
        401 => Some("Unauthorized (401). Hint: set CARTFLOW_API_TOKEN or api_token in the config".into()),
        403 => Some("Forbidden (403). Hint: check the integration token's resource access".into()),
        _ => None,
    }
}

/// Parse a response body into JSON.
///
/// Empty (or whitespace-only) bodies become `Value::Null`; anything else must be valid JSON.
pub fn parse_response_body(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    parse_response_json_strict(text, status)
}

/// Parse HTTP response text into JSON, providing detailed errors on failure.
///
/// The error carries the originating status code and a whitespace-collapsed preview of
/// up to 200 characters of the body.
pub fn parse_response_json_strict(text: &str, status: Option<StatusCode>) -> Result<Value, JsonParseError> {
    serde_json::from_str::<Value>(text).map_err(|error| {
        let status_note = status
            .map(|code| format!("status {code}"))
            .unwrap_or_else(|| "unknown status".to_string());
        let preview = truncate_response_preview(text, BODY_PREVIEW_LIMIT);

        JsonParseError::new(status_note, error, preview)
    })
}

fn truncate_response_preview(text: &str, limit: usize) -> String {
    if text.trim().is_empty() {
        return "<empty>".to_string();
    }

    let mut preview = String::new();
    for ch in text.chars() {
        if preview.chars().count() >= limit {
            preview.push_str("...");
            break;
        }
        match ch {
            '\n' | '\r' | '\t' => {
                if !preview.ends_with(' ') {
                    preview.push(' ');
                }
            }
            _ => preview.push(ch),
        }
    }

    preview.trim().to_string()
}

/// Error returned when strict JSON parsing of an HTTP response fails.
#[derive(Debug, Error)]
#[error("failed to parse JSON response ({status_note}): {source}. body preview: {body_preview}")]
pub struct JsonParseError {
    status_note: String,
    #[source]
    source: serde_json::Error,
    body_preview: String,
}

impl JsonParseError {
    pub fn new(status_note: String, source: serde_json::Error, body_preview: String) -> Self {
        Self {
            status_note,
            source,
            body_preview,
        }
    }

    /// Truncated response preview captured during parsing.
    pub fn body_preview(&self) -> &str {
        &self.body_preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_body_is_null() {
        assert_eq!(parse_response_body("", Some(StatusCode::OK)).unwrap(), Value::Null);
        assert_eq!(parse_response_body("  \n", None).unwrap(), Value::Null);
    }

    #[test]
    fn scalar_and_object_bodies_parse() {
        assert_eq!(parse_response_body("17", Some(StatusCode::OK)).unwrap(), json!(17));
        assert_eq!(parse_response_body("true", Some(StatusCode::OK)).unwrap(), json!(true));
        assert_eq!(
            parse_response_body(r#"{"message":"out of stock"}"#, Some(StatusCode::BAD_REQUEST)).unwrap(),
            json!({ "message": "out of stock" })
        );
    }

    #[test]
    fn invalid_json_reports_status_and_preview() {
        let error = parse_response_body("<html>\n<body>oops</body>", Some(StatusCode::BAD_GATEWAY)).unwrap_err();
        let message = error.to_string();
        assert!(message.contains("status 502"));
        assert_eq!(error.body_preview(), "<html> <body>oops</body>");
    }

    #[test]
    fn preview_is_truncated() {
        let long_body = "x".repeat(500);
        let error = parse_response_json_strict(&long_body, None).unwrap_err();
        assert!(error.body_preview().ends_with("..."));
        assert_eq!(error.body_preview().chars().count(), BODY_PREVIEW_LIMIT + 3);
        assert!(error.to_string().contains("unknown status"));
    }
}
