use std::fmt;

use bytes::Bytes;
use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error type for the `infinity-api` crate.
///
/// Covers every failure mode of a call: client construction, request
/// encoding, transport, caller cancellation, Controller-reported errors,
/// and response decoding.
#[derive(Debug, Error)]
pub enum Error {
    // ── Construction ────────────────────────────────────────────────
    /// Invalid client or authenticator configuration.
    #[error("invalid configuration: {message}")]
    Configuration { message: String },

    /// Base URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ── Request ─────────────────────────────────────────────────────
    /// The request body could not be encoded as JSON.
    #[error("failed to serialize request body: {0}")]
    Serialization(#[source] serde_json::Error),

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    // ── Caller context ──────────────────────────────────────────────
    /// The caller's cancellation token fired.
    #[error("request cancelled")]
    Cancelled,

    /// The caller's deadline passed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,

    // ── Controller ──────────────────────────────────────────────────
    /// The Controller answered with a 4xx or 5xx status.
    #[error(transparent)]
    Api(#[from] ApiError),

    // ── Data ────────────────────────────────────────────────────────
    /// Response body could not be decoded, with the raw body for debugging.
    #[error("failed to decode response: {message}")]
    Decode { message: String, body: String },

    /// A `Location` URI did not end in the expected identifier.
    #[error("resource URI {uri:?} does not end in a {expected}")]
    InvalidResourceUri { uri: String, expected: &'static str },

    // ── Retry ───────────────────────────────────────────────────────
    #[error("failed to perform HTTP request after {attempts} attempts: {source}")]
    RetriesExhausted {
        attempts: u32,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub(crate) fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// The innermost error, looking through [`RetriesExhausted`](Self::RetriesExhausted).
    pub fn root(&self) -> &Error {
        match self {
            Self::RetriesExhausted { source, .. } => source.root(),
            other => other,
        }
    }

    /// The Controller error, if this failure carries one.
    pub fn api_error(&self) -> Option<&ApiError> {
        match self.root() {
            Self::Api(err) => Some(err),
            _ => None,
        }
    }

    /// HTTP status reported by the Controller, if any.
    pub fn status(&self) -> Option<StatusCode> {
        self.api_error().map(|e| e.status)
    }

    /// Returns `true` if the caller cancelled or timed out the call.
    pub fn is_context_error(&self) -> bool {
        matches!(self.root(), Self::Cancelled | Self::DeadlineExceeded)
    }

    /// Returns `true` for a Controller 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Returns `true` if this is a transient error worth retrying at a
    /// higher level (the engine's own retries already gave up).
    pub fn is_transient(&self) -> bool {
        match self.root() {
            Self::Transport(_) => true,
            Self::Api(e) => crate::retry::is_retriable_status(e.status),
            _ => false,
        }
    }
}

// ── ApiError ─────────────────────────────────────────────────────────

/// Error envelope shapes the Controller uses.
///
/// `error` wins over `message`; `details` wins over `detail`. Empty strings
/// and `null` count as absent.
#[derive(serde::Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<serde_json::Value>,
    #[serde(default)]
    details: Option<serde_json::Value>,
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// A 4xx/5xx answer from the Controller.
///
/// Keeps the raw body so callers can inspect payloads the envelope
/// parser does not understand.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: String,
    pub body: Bytes,
}

impl ApiError {
    /// Build from a status and raw body.
    ///
    /// The message defaults to the status reason phrase and is overlaid
    /// from the body when it decodes as a JSON object.
    pub fn from_response(status: StatusCode, body: Bytes) -> Self {
        let mut message = status.canonical_reason().unwrap_or_default().to_owned();
        let mut details = String::new();

        if let Ok(envelope) = serde_json::from_slice::<ErrorEnvelope>(&body) {
            if let Some(msg) = first_text([envelope.error.as_ref(), envelope.message.as_ref()]) {
                message = msg;
            }
            if let Some(extra) = first_text([envelope.details.as_ref(), envelope.detail.as_ref()]) {
                details = extra;
            }
        }

        Self {
            status,
            message,
            details,
            body,
        }
    }

    /// The raw body as lossy UTF-8.
    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Render a JSON value as display text: strings unquoted, anything else
/// in its compact JSON form.
fn value_text(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// First candidate that renders to non-empty text.
fn first_text(candidates: [Option<&serde_json::Value>; 2]) -> Option<String> {
    candidates
        .into_iter()
        .flatten()
        .filter(|value| !value.is_null())
        .map(value_text)
        .find(|text| !text.is_empty())
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = self.status.as_u16();
        if self.details.is_empty() {
            write!(f, "API error {code}: {}", self.message)
        } else {
            write!(f, "API error {code}: {} ({})", self.message, self.details)
        }
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(status: u16, body: &'static str) -> ApiError {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        ApiError::from_response(status, Bytes::from_static(body.as_bytes()))
    }

    #[test]
    fn error_key_sets_message() {
        let err = api(400, r#"{"error":"X"}"#);
        assert_eq!(err.message, "X");
        assert!(err.details.is_empty());
        assert_eq!(err.to_string(), "API error 400: X");
    }

    #[test]
    fn message_and_detail_keys() {
        let err = api(404, r#"{"message":"Y","detail":"Z"}"#);
        assert_eq!(err.message, "Y");
        assert_eq!(err.details, "Z");
        assert_eq!(err.to_string(), "API error 404: Y (Z)");
    }

    #[test]
    fn error_beats_message_and_details_beats_detail() {
        let err = api(
            409,
            r#"{"message":"m","error":"e","detail":"d1","details":"d2"}"#,
        );
        assert_eq!(err.message, "e");
        assert_eq!(err.details, "d2");
    }

    #[test]
    fn empty_error_falls_through_to_message() {
        let err = api(400, r#"{"error":"","message":"Y"}"#);
        assert_eq!(err.message, "Y");
    }

    #[test]
    fn empty_details_falls_through_to_detail() {
        let err = api(422, r#"{"details":"","detail":"D"}"#);
        assert_eq!(err.details, "D");
        assert_eq!(err.to_string(), "API error 422: Unprocessable Entity (D)");
    }

    #[test]
    fn blank_envelope_keeps_reason_phrase() {
        let err = api(403, r#"{"error":"","message":null,"details":""}"#);
        assert_eq!(err.message, "Forbidden");
        assert!(err.details.is_empty());
        assert_eq!(err.to_string(), "API error 403: Forbidden");
    }

    #[test]
    fn details_alone_keeps_reason_phrase() {
        let err = api(500, r#"{"details":"disk full"}"#);
        assert_eq!(err.message, "Internal Server Error");
        assert_eq!(err.details, "disk full");
    }

    #[test]
    fn non_json_body_falls_back_to_reason_phrase() {
        let err = api(502, "<html>bad gateway</html>");
        assert_eq!(err.message, "Bad Gateway");
        assert_eq!(err.body_text(), "<html>bad gateway</html>");
    }

    #[test]
    fn structured_error_values_render_as_json() {
        let err = api(400, r#"{"error":{"name":["required"]}}"#);
        assert_eq!(err.message, r#"{"name":["required"]}"#);
    }

    #[test]
    fn classification_looks_through_retry_wrapper() {
        let wrapped = Error::RetriesExhausted {
            attempts: 4,
            source: Box::new(Error::Api(api(503, "{}"))),
        };
        assert_eq!(wrapped.status(), Some(StatusCode::SERVICE_UNAVAILABLE));
        assert!(wrapped.is_transient());
        assert!(!wrapped.is_context_error());
        assert_eq!(
            wrapped.to_string(),
            "failed to perform HTTP request after 4 attempts: API error 503: Service Unavailable"
        );
    }

    #[test]
    fn not_found_detection() {
        assert!(Error::Api(api(404, "")).is_not_found());
        assert!(!Error::Cancelled.is_not_found());
        assert!(Error::DeadlineExceeded.is_context_error());
    }
}
