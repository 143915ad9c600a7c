//! Error types for the Bedrock Converse SDK
//!
//! Errors fall into three families:
//! - **Policy violations** raised before any network call when a prompt resource
//!   request carries a runtime override ([`Error::UnsupportedPromptArnParameter`]).
//! - **Local failures** while turning a request into a wire payload
//!   ([`Error::Rendering`], [`Error::InvalidRequest`], [`Error::Serialization`]).
//! - **Remote and transport failures** mapped from HTTP responses and the network layer.

use std::time::Duration;
use thiserror::Error;

use crate::providers::bedrock::parse_error_message;

/// Result type alias for operations that can fail with a Bedrock SDK error.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Bedrock SDK.
#[derive(Debug, Error)]
pub enum Error {
    /// A prompt resource request carried a runtime override the API does not allow.
    ///
    /// The message names the rejected override and how to fix it. Never retryable.
    #[error("{0}")]
    UnsupportedPromptArnParameter(String),

    /// The request could not be rendered into a wire payload.
    #[error("Rendering error: {0}")]
    Rendering(String),

    /// Invalid request parameters.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// API returned a bad request error (400).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Authentication failed (401).
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// Permission denied (403).
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Model or resource not found (404).
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Request throttled (429).
    #[error("Rate limit exceeded: {message}")]
    RateLimit {
        /// Error message from the API
        message: String,
        /// Time to wait before retrying, if provided by the API
        retry_after: Option<Duration>,
    },

    /// Service unavailable (503).
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Internal server error (500+).
    #[error("Internal server error: {0}")]
    InternalServerError(String),

    /// Generic API error for status codes not covered above.
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Error message
        message: String,
    },

    /// Failed to deserialize API response.
    #[error("Failed to parse API response: {0}")]
    ResponseValidation(String),

    /// Network or connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timeout.
    #[error("Request timeout after {0:?}")]
    Timeout(Duration),

    /// Invalid URL provided.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Streaming error.
    #[error("Streaming error: {0}")]
    Streaming(String),

    /// HTTP client configuration or initialization error.
    #[error("HTTP client error: {0}")]
    HttpClient(String),

    /// Missing required configuration.
    #[error("Missing required configuration: {0}")]
    MissingConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Other errors not covered by specific variants.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create an API error from an HTTP status and the raw response body.
    ///
    /// The message is extracted with [`parse_error_message`]; when the body yields
    /// nothing usable the canonical reason phrase for the status is used instead.
    pub fn from_response(status: u16, body: &str, headers: &http::HeaderMap) -> Self {
        let message = parse_error_message(body).unwrap_or_else(|| fallback_message(status));

        match status {
            400 => Error::BadRequest(message),
            401 => Error::Authentication(message),
            403 => Error::PermissionDenied(message),
            404 => Error::NotFound(message),
            429 => Error::RateLimit {
                message,
                retry_after: headers
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .map(Duration::from_secs),
            },
            503 => Error::ServiceUnavailable(message),
            s if s >= 500 => Error::InternalServerError(message),
            _ => Error::ApiError { status, message },
        }
    }

    /// Check if this error is retryable.
    ///
    /// Policy and rendering failures are deterministic for a given request.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::RateLimit { .. } => true,
            Error::ServiceUnavailable(_) => true,
            Error::InternalServerError(_) => true,
            Error::Connection(_) => true,
            Error::Timeout(_) => true,
            Error::ApiError { status, .. } => *status >= 500 || *status == 408,
            _ => false,
        }
    }

    /// True if this is a prompt resource policy rejection.
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, Error::UnsupportedPromptArnParameter(_))
    }

    /// Get retry delay if this is a rate limit error with retry-after.
    pub fn retry_after(&self) -> Option<Duration> {
        if let Error::RateLimit { retry_after, .. } = self {
            *retry_after
        } else {
            None
        }
    }
}

fn fallback_message(status: u16) -> String {
    http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(String::from)
        .unwrap_or_else(|| format!("HTTP {}", status))
}
