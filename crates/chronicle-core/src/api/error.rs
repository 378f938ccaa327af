use reqwest::StatusCode;
use thiserror::Error;

use crate::models::{Envelope, ErrorPayload};

#[derive(Error, Debug)]
pub enum ApiError {
    /// The transport could not complete the exchange; no response was obtained.
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}: {}", .body.display())]
    HttpStatusError { status: StatusCode, body: ErrorBody },

    /// The server answered with success but the body did not match the expected schema.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Token cannot be used as an Authorization header value")]
    InvalidToken,

    #[error("Invalid path segment {0:?}")]
    InvalidPathSegment(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

/// Body of a non-success response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorBody {
    /// `data.error` from the failure envelope, when the server sent one.
    pub error: Option<String>,
    /// Raw response body, truncated to `MAX_ERROR_BODY_LENGTH`.
    pub raw: String,
}

impl ErrorBody {
    pub fn parse(body: &str) -> Self {
        let error = serde_json::from_str::<Envelope<ErrorPayload>>(body)
            .ok()
            .and_then(|envelope| envelope.data)
            .and_then(|payload| payload.error);

        Self {
            error,
            raw: truncate_body(body),
        }
    }

    fn display(&self) -> &str {
        self.error.as_deref().unwrap_or(&self.raw)
    }
}

/// Truncate a response body to avoid logging excessive data
fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_LENGTH {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_LENGTH;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
}

impl ApiError {
    pub fn from_status(status: StatusCode, body: &str) -> Self {
        ApiError::HttpStatusError {
            status,
            body: ErrorBody::parse(body),
        }
    }

    /// The status code, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::HttpStatusError { status, .. } => Some(*status),
            ApiError::NetworkError(e) => e.status(),
            _ => None,
        }
    }

    /// The server-provided `data.error` message, if any.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::HttpStatusError { body, .. } => body.error.as_deref(),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(StatusCode::UNAUTHORIZED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_extracts_envelope_error() {
        let body = ErrorBody::parse(r#"{"data":{"error":"invalid credentials"},"status":400}"#);
        assert_eq!(body.error.as_deref(), Some("invalid credentials"));
    }

    #[test]
    fn test_error_body_tolerates_non_json() {
        let body = ErrorBody::parse("<html>Bad Gateway</html>");
        assert_eq!(body.error, None);
        assert_eq!(body.raw, "<html>Bad Gateway</html>");
    }

    #[test]
    fn test_error_body_without_error_field() {
        let body = ErrorBody::parse(r#"{"data":null,"status":500}"#);
        assert_eq!(body.error, None);
    }

    #[test]
    fn test_truncate_body() {
        let long = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        let truncated = truncate_body(&long);
        assert!(truncated.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
        assert!(truncated.ends_with(&format!("(truncated, {} total bytes)", long.len())));

        // Multi-byte characters straddling the cut point must not panic
        let wide = "é".repeat(MAX_ERROR_BODY_LENGTH);
        assert!(truncate_body(&wide).contains("truncated"));
    }

    #[test]
    fn test_server_message_and_display() {
        let err = ApiError::from_status(
            StatusCode::UNAUTHORIZED,
            r#"{"data":{"error":"Invalid credentials"},"status":401}"#,
        );
        assert_eq!(err.server_message(), Some("Invalid credentials"));
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "HTTP 401 Unauthorized: Invalid credentials");

        let err = ApiError::from_status(StatusCode::BAD_GATEWAY, "upstream down");
        assert_eq!(err.server_message(), None);
        assert_eq!(err.to_string(), "HTTP 502 Bad Gateway: upstream down");
    }

    #[test]
    fn test_non_status_errors_have_no_server_message() {
        let err = ApiError::InvalidResponse("missing data".to_string());
        assert_eq!(err.server_message(), None);
        assert_eq!(err.status(), None);
    }
}
