//! Converse request paths
//!
//! Model identifiers may be full ARNs, so they are encoded as one opaque path
//! segment: `:` and `/` included. Always pass the raw identifier; encoding an
//! already-encoded string would double-encode it.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};

/// Everything except RFC 3986 unreserved characters.
const MODEL_ID_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a model identifier for use as a single path segment.
///
/// Only `A-Z a-z 0-9 - . _ ~` pass through. Spaces become `%20`, never `+`.
pub fn encode_model_id(model: &str) -> String {
    utf8_percent_encode(model, MODEL_ID_SEGMENT).to_string()
}

/// Path of the synchronous Converse endpoint for `model`.
pub fn completion_path(model: &str) -> String {
    format!("/model/{}/converse", encode_model_id(model))
}

/// Path of the streaming Converse endpoint for `model`.
pub fn stream_path(model: &str) -> String {
    format!("/model/{}/converse-stream", encode_model_id(model))
}

/// Path of the foundation model listing endpoint (control-plane host).
pub fn models_path() -> &'static str {
    "/foundation-models"
}
