//! Prompt resource classification and runtime override policy
//!
//! A prompt resource (`arn:aws:bedrock:<region>:<account>:prompt/<id>`) carries its
//! own system instructions, tool configuration, and inference settings. Converse
//! would either override them or ignore the request's values, so requests that
//! try to supply them at runtime are rejected before anything is sent.

use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::types::{Message, Params, Role, ToolSet};

const ARN_PREFIX: &str = "arn:aws:bedrock:";
const PROMPT_SEGMENT: &str = ":prompt/";

/// Key under which callers pass explicit inference settings.
pub const INFERENCE_CONFIG_KEY: &str = "inferenceConfig";

/// True if `model` designates a stored prompt resource rather than an invocable model.
pub fn is_prompt_resource(model: &str) -> bool {
    model.starts_with(ARN_PREFIX) && model.contains(PROMPT_SEGMENT)
}

/// True if `params` carries a non-empty `inferenceConfig`.
///
/// An empty mapping counts as absent; any other non-null value counts as set.
pub fn has_explicit_inference_config(params: &Params) -> bool {
    match params.get(INFERENCE_CONFIG_KEY) {
        Some(Value::Object(config)) => !config.is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

/// Reject runtime overrides that a prompt resource does not allow.
///
/// No-op for direct model identifiers. Rules are checked in order and the first
/// violation is returned:
/// 1. no `system` role messages
/// 2. no tools (a structured-output `schema` renders as a tool, so it counts)
/// 3. no `temperature` and no non-empty `inferenceConfig`
///
/// # Errors
///
/// Returns `Error::UnsupportedPromptArnParameter` naming the rejected override.
pub fn validate_prompt_arn_runtime_overrides(
    model: &str,
    messages: &[Message],
    tools: &ToolSet,
    temperature: Option<f64>,
    params: &Params,
    schema: Option<&Value>,
) -> Result<()> {
    if !is_prompt_resource(model) {
        return Ok(());
    }

    let violation = if messages.iter().any(|m| m.role == Role::System) {
        Some(
            "Bedrock prompt ARN does not allow runtime system instructions. \
             Move instructions into the AWS prompt definition.",
        )
    } else if !tools.is_empty() || schema.is_some() {
        Some(
            "Bedrock prompt ARN does not allow runtime toolConfig. \
             Define tools in the AWS prompt resource.",
        )
    } else if temperature.is_some() || has_explicit_inference_config(params) {
        Some(
            "Bedrock prompt ARN does not allow runtime inferenceConfig overrides. \
             Configure inference behavior in the AWS prompt resource.",
        )
    } else {
        None
    };

    match violation {
        Some(message) => {
            warn!(model, reason = message, "Rejected prompt resource request");
            Err(Error::UnsupportedPromptArnParameter(message.to_string()))
        }
        None => Ok(()),
    }
}
