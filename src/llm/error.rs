//! Error types for remote generation calls.

use thiserror::Error;

/// Errors produced while talking to a remote text-generation service.
#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP request failed (connect, timeout, body read).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("HTTP status {status}: {body}")]
    HttpStatus {
        /// Status code returned by the service.
        status: u16,
        /// Leading part of the response body.
        body: String,
    },

    /// No API key was configured for the service.
    #[error("API key required for {0}")]
    ApiKeyRequired(String),

    /// Response body was not the expected JSON shape.
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Endpoint URL could not be built.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl LlmError {
    /// Check if this error is worth another attempt.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::HttpRequest(_) | Self::JsonParse(_) => true,
            Self::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            Self::ApiKeyRequired(_) | Self::InvalidUrl(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_retryable() {
        let throttled = LlmError::HttpStatus {
            status: 429,
            body: String::new(),
        };
        let unavailable = LlmError::HttpStatus {
            status: 503,
            body: String::new(),
        };
        let forbidden = LlmError::HttpStatus {
            status: 403,
            body: "denied".to_string(),
        };

        assert!(throttled.is_retryable());
        assert!(unavailable.is_retryable());
        assert!(!forbidden.is_retryable());
        assert!(!LlmError::ApiKeyRequired("gemini".to_string()).is_retryable());
    }

    #[test]
    fn test_display() {
        let err = LlmError::HttpStatus {
            status: 400,
            body: "bad request".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP status 400: bad request");
    }
}
