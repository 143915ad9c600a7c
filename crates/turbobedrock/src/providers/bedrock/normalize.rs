//! Parameter canonicalization and vendor field promotion
//!
//! Caller parameters arrive as an arbitrary nested bag. Before validation and
//! rendering they are rebuilt into a fresh string-keyed map, and `top_k` (never a
//! valid `inferenceConfig` field on Converse) is either promoted into
//! `additionalModelRequestFields` or dropped, depending on the model.

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::models::ModelCatalog;
use crate::error::{Error, Result};
use crate::types::Params;

/// Passthrough bucket for vendor-specific fields.
pub const ADDITIONAL_FIELDS_KEY: &str = "additionalModelRequestFields";

/// Sampling parameter only reasoning-embedded models accept.
pub const TOP_K_KEY: &str = "top_k";

/// Canonicalize any serializable parameter source into a [`Params`] map.
///
/// Structs, maps with enum keys, and `serde_json::Value`s all end up with plain
/// string keys at every level. `null` becomes an empty map.
///
/// # Errors
///
/// Returns `Error::InvalidRequest` if the source does not serialize to an object.
pub fn canonicalize_params<T: Serialize + ?Sized>(raw: &T) -> Result<Params> {
    match serde_json::to_value(raw)? {
        Value::Null => Ok(Map::new()),
        Value::Object(map) => Ok(canonical_map(&map)),
        other => Err(Error::InvalidRequest(format!(
            "params must be a mapping, got {}",
            json_kind(&other)
        ))),
    }
}

/// Normalize a parameter bag for `model`.
///
/// The input is never mutated; a deep copy is returned. A caller-supplied
/// `additionalModelRequestFields.top_k` wins over a promoted top-level `top_k`.
pub fn normalize_params(params: &Params, model: &str, catalog: &dyn ModelCatalog) -> Params {
    let mut normalized = canonical_map(params);

    let mut additional = match normalized.remove(ADDITIONAL_FIELDS_KEY) {
        Some(Value::Object(fields)) => fields,
        Some(Value::Null) | None => Map::new(),
        Some(other) => {
            // Not ours to reinterpret; the API rejects it with a precise message.
            warn!(
                model,
                kind = json_kind(&other),
                "additionalModelRequestFields is not a mapping; passing through unchanged"
            );
            normalized.remove(TOP_K_KEY);
            normalized.insert(ADDITIONAL_FIELDS_KEY.to_string(), other);
            return normalized;
        }
    };

    if let Some(top_k) = normalized.remove(TOP_K_KEY).filter(|v| !v.is_null()) {
        if catalog.supports_reasoning_embedded(model) {
            let mut promoted = Map::new();
            promoted.insert(TOP_K_KEY.to_string(), top_k);
            additional = deep_merge(promoted, additional);
        } else {
            debug!(model, "Dropping top_k: model is not reasoning-embedded");
        }
    }

    if !additional.is_empty() {
        normalized.insert(ADDITIONAL_FIELDS_KEY.to_string(), Value::Object(additional));
    }

    normalized
}

/// Deep-merge `overlay` into `base`.
///
/// Nested objects merge key by key; any other value in `overlay` replaces the
/// value in `base`.
pub fn deep_merge(mut base: Map<String, Value>, overlay: Map<String, Value>) -> Map<String, Value> {
    for (key, value) in overlay {
        match (base.remove(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => {
                base.insert(key, Value::Object(deep_merge(existing, incoming)));
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
    base
}

fn canonical_map(map: &Map<String, Value>) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), canonical_value(value)))
        .collect()
}

fn canonical_value(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(canonical_map(map)),
        Value::Array(items) => Value::Array(items.iter().map(canonical_value).collect()),
        other => other.clone(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
