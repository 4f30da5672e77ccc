//! API errors and response-status mapping.

#[cfg(test)]
#[path = "error_test.rs"]
mod error_test;

use serde::de::DeserializeOwned;

/// Errors produced by the hospital REST client.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The request context lacks a value the call needs. Raised before any I/O.
    #[error("missing request context: {0} not set")]
    MissingContext(&'static str),

    /// The submitted form failed validation. Raised before any I/O.
    #[error(transparent)]
    Form(#[from] forms::ValidationErrors),

    /// A request body could not be built.
    #[error("request body encode failed: {0}")]
    Encode(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),

    /// No response: connect, timeout, or body read failure.
    #[error("no response from server: {0}")]
    Request(String),

    /// The backend rejected the request with HTTP 400.
    #[error("validation error: {0}")]
    Validation(String),

    /// Any other non-success status.
    #[error("server error: {status}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),
}

impl ApiError {
    /// Stable machine-readable code for logs and CLI output.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConfigParse(_) => "E_CONFIG_PARSE",
            Self::MissingContext(_) => "E_MISSING_CONTEXT",
            Self::Form(_) => "E_FORM",
            Self::Encode(_) => "E_ENCODE",
            Self::HttpClientBuild(_) => "E_HTTP_CLIENT_BUILD",
            Self::Request(_) => "E_REQUEST",
            Self::Validation(_) => "E_VALIDATION",
            Self::Status { .. } => "E_STATUS",
            Self::Parse(_) => "E_PARSE",
        }
    }

    /// Whether repeating the same call could succeed.
    #[must_use]
    pub fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

/// Map an HTTP status and body to the body on success or an [`ApiError`].
///
/// # Errors
///
/// [`ApiError::Validation`] for 400, [`ApiError::Status`] for anything else
/// outside `200..=299`.
pub fn check_status(status: u16, body: String) -> Result<String, ApiError> {
    match status {
        200..=299 => Ok(body),
        400 => Err(ApiError::Validation(validation_message(&body))),
        _ => Err(ApiError::Status { status, body }),
    }
}

/// Human-readable text of a 400 body.
///
/// A JSON object yields its values joined with `", "` (so `{"message": m}`
/// yields `m`), a JSON string yields the string, anything else the trimmed
/// raw body.
#[must_use]
pub fn validation_message(body: &str) -> String {
    let text = match serde_json::from_str::<serde_json::Value>(body) {
        Ok(serde_json::Value::Object(map)) => {
            let parts: Vec<String> = map.values().map(scalar_text).collect();
            parts.join(", ")
        }
        Ok(serde_json::Value::String(s)) => s,
        _ => body.trim().to_owned(),
    };
    if text.is_empty() { "bad request".to_owned() } else { text }
}

/// Decode a success body. An empty body decodes as JSON `null`.
///
/// # Errors
///
/// Returns [`ApiError::Parse`] when the body does not match `T`.
pub fn parse_json<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    let body = if body.trim().is_empty() { "null" } else { body };
    serde_json::from_str(body).map_err(|e| ApiError::Parse(e.to_string()))
}

fn scalar_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
