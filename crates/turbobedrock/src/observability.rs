//! Structured logging for Bedrock HTTP calls
//!
//! Every request the transport sends is classified by [`Operation`] and logged
//! once on dispatch and once on completion, with the same field names on both
//! records so they can be joined on `operation` and `path`.

use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::Error;

/// Bedrock API operation, derived from the request path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `POST /model/{id}/converse`
    Converse,
    /// `POST /model/{id}/converse-stream`
    ConverseStream,
    /// `GET /foundation-models` on the control plane
    ListFoundationModels,
    /// Anything else
    Other,
}

impl Operation {
    /// Classify a request path.
    pub fn from_path(path: &str) -> Self {
        if path.starts_with("/model/") && path.ends_with("/converse-stream") {
            Operation::ConverseStream
        } else if path.starts_with("/model/") && path.ends_with("/converse") {
            Operation::Converse
        } else if path.trim_end_matches('/') == "/foundation-models" {
            Operation::ListFoundationModels
        } else {
            Operation::Other
        }
    }

    /// True for the event-stream endpoint.
    pub fn is_streaming(self) -> bool {
        self == Operation::ConverseStream
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Operation::Converse => "Converse",
            Operation::ConverseStream => "ConverseStream",
            Operation::ListFoundationModels => "ListFoundationModels",
            Operation::Other => "Other",
        })
    }
}

/// What was sent.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// HTTP method
    pub method: String,
    /// Path as sent; the model identifier appears percent-encoded
    pub path: String,
    /// Operation the path maps to
    pub operation: Operation,
    /// Serialized payload size, if there is a body
    pub body_size: Option<usize>,
}

impl RequestMetadata {
    /// Describe a request about to be sent.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            method: method.into(),
            operation: Operation::from_path(&path),
            path,
            body_size: None,
        }
    }

    /// Record the payload size.
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log dispatch at debug level.
    pub fn log_request(&self) {
        debug!(
            operation = %self.operation,
            method = %self.method,
            path = %self.path,
            body_size = self.body_size,
            "Sending Bedrock request"
        );
    }
}

/// What came back.
///
/// For `ConverseStream` the status and timing describe the response head only;
/// the body is still streaming when this is logged.
#[derive(Debug, Clone)]
pub struct ResponseMetadata {
    /// HTTP status code
    pub status: u16,
    /// Body size in bytes, when the body was read
    pub body_size: Option<usize>,
    /// Time from dispatch to response
    pub elapsed: Duration,
}

impl ResponseMetadata {
    /// Describe a response.
    pub fn new(status: u16, elapsed: Duration) -> Self {
        Self {
            status,
            body_size: None,
            elapsed,
        }
    }

    /// Record the body size.
    pub fn with_body_size(mut self, size: usize) -> Self {
        self.body_size = Some(size);
        self
    }

    /// Log a 2xx response at info level.
    pub fn log_success(&self, request: &RequestMetadata) {
        info!(
            operation = %request.operation,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            body_size = self.body_size,
            streaming = request.operation.is_streaming(),
            "Bedrock request succeeded"
        );
    }

    /// Log a failed response at warn level, flagging whether a caller may retry it.
    pub fn log_error(&self, request: &RequestMetadata, error: &Error) {
        warn!(
            operation = %request.operation,
            path = %request.path,
            status = self.status,
            elapsed_ms = self.elapsed.as_millis(),
            retryable = error.is_retryable(),
            retry_after_ms = error.retry_after().map(|d| d.as_millis()),
            error = %error,
            "Bedrock request failed"
        );
    }
}

/// Wall-clock timer started at dispatch.
pub struct RequestTimer {
    start: Instant,
}

impl RequestTimer {
    /// Start timing.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Time since [`start`](Self::start).
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

/// Install a formatting subscriber filtered by `RUST_LOG`, falling back to `info`.
///
/// Does nothing if a global subscriber is already set.
#[cfg(feature = "trace")]
#[cfg_attr(docsrs, doc(cfg(feature = "trace")))]
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
