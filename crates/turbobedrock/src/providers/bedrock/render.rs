//! Converse payload rendering
//!
//! Turns a validated [`ChatRequest`] plus its normalized parameters into the JSON
//! body sent to `/converse` or `/converse-stream`. Optional blocks are omitted
//! entirely when they would be empty; absence, not an empty value, means "not
//! applicable".

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Serialize;
use serde_json::{Map, Value, json};
use tracing::debug;

use super::normalize::{ADDITIONAL_FIELDS_KEY, deep_merge};
use super::prompt::{INFERENCE_CONFIG_KEY, has_explicit_inference_config};
use crate::error::{Error, Result};
use crate::types::{ChatRequest, Content, ContentPart, Message, Params, Role, ToolDefinition};

/// Name of the synthetic tool used to request structured output.
pub const STRUCTURED_OUTPUT_TOOL: &str = "json_response";

const MESSAGES_KEY: &str = "messages";
const SYSTEM_KEY: &str = "system";
const TOOL_CONFIG_KEY: &str = "toolConfig";

/// Keys dropped from the payload when they end up empty.
///
/// `inferenceConfig` is decided separately, by the same rule the prompt
/// resource policy uses.
const OPTIONAL_KEYS: [&str; 3] = [SYSTEM_KEY, TOOL_CONFIG_KEY, ADDITIONAL_FIELDS_KEY];

/// A rendered Converse request body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct RenderedPayload(Map<String, Value>);

impl RenderedPayload {
    /// Look up a top-level key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check whether a top-level key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Convert into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.0)
    }
}

/// Render the wire payload for `request`.
///
/// `params` must already be normalized. Params are deep-merged over the rendered
/// blocks, so explicit params win. Validation is not repeated here.
///
/// # Errors
///
/// Returns `Error::Rendering` when part of the request cannot be expressed on the
/// wire (non-finite temperature, non-object tool schema, non-text system content,
/// or a non-mapping `inferenceConfig` param alongside a temperature).
pub fn render_payload(request: &ChatRequest, params: &Params, stream: bool) -> Result<RenderedPayload> {
    let mut payload = Map::new();

    payload.insert(
        MESSAGES_KEY.to_string(),
        Value::Array(render_messages(&request.messages)?),
    );
    payload.insert(
        SYSTEM_KEY.to_string(),
        Value::Array(render_system(&request.messages)?),
    );
    payload.insert(
        TOOL_CONFIG_KEY.to_string(),
        render_tool_config(request.tools.values(), request.schema.as_ref())?,
    );
    payload.insert(
        INFERENCE_CONFIG_KEY.to_string(),
        render_inference_config(request.temperature, params)?,
    );

    let mut additional = Map::new();
    if let Some(thinking) = &request.thinking {
        thinking
            .validate()
            .map_err(|e| Error::Rendering(format!("Invalid thinking configuration: {}", e)))?;
        additional.insert("thinking".to_string(), serde_json::to_value(thinking)?);
    }
    payload.insert(ADDITIONAL_FIELDS_KEY.to_string(), Value::Object(additional));

    let mut overlay = params.clone();
    if overlay.get(INFERENCE_CONFIG_KEY).is_some_and(Value::is_null) {
        overlay.remove(INFERENCE_CONFIG_KEY);
    }
    let mut payload = deep_merge(payload, overlay);
    payload.remove("tools");

    if request.temperature.is_none() && !has_explicit_inference_config(params) {
        payload.remove(INFERENCE_CONFIG_KEY);
    }

    for key in OPTIONAL_KEYS {
        if payload.get(key).is_some_and(is_blank) {
            payload.remove(key);
        }
    }

    debug!(
        stream,
        message_count = request.messages.len(),
        has_system = payload.contains_key(SYSTEM_KEY),
        has_tool_config = payload.contains_key(TOOL_CONFIG_KEY),
        has_inference_config = payload.contains_key(INFERENCE_CONFIG_KEY),
        has_additional_fields = payload.contains_key(ADDITIONAL_FIELDS_KEY),
        "Rendered Converse payload"
    );

    Ok(RenderedPayload(payload))
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Render conversation turns.
///
/// Tool results travel as `user` turns. Consecutive messages with the same wire
/// role collapse into one turn since Converse requires alternating roles.
fn render_messages(messages: &[Message]) -> Result<Vec<Value>> {
    let mut turns: Vec<(&'static str, Vec<Value>)> = Vec::new();

    for message in messages {
        let role = match message.role {
            Role::System => continue,
            Role::User | Role::Tool => "user",
            Role::Assistant => "assistant",
        };
        let blocks = render_content(&message.content)?;

        match turns.last_mut() {
            Some((last_role, content)) if *last_role == role => content.extend(blocks),
            _ => turns.push((role, blocks)),
        }
    }

    Ok(turns
        .into_iter()
        .map(|(role, content)| json!({ "role": role, "content": content }))
        .collect())
}

fn render_content(content: &Content) -> Result<Vec<Value>> {
    match content {
        Content::Text(text) => Ok(vec![json!({ "text": text })]),
        Content::Parts(parts) => parts.iter().map(render_part).collect(),
    }
}

fn render_part(part: &ContentPart) -> Result<Value> {
    Ok(match part {
        ContentPart::Text { text } => json!({ "text": text }),
        ContentPart::Image { format, data } => json!({
            "image": {
                "format": format,
                "source": { "bytes": BASE64.encode(data) }
            }
        }),
        ContentPart::Document { format, name, data } => json!({
            "document": {
                "format": format,
                "name": name,
                "source": { "bytes": BASE64.encode(data) }
            }
        }),
        ContentPart::ToolUse { id, name, input } => json!({
            "toolUse": {
                "toolUseId": id,
                "name": name,
                "input": input
            }
        }),
        ContentPart::ToolResult {
            tool_use_id,
            content,
            is_error,
        } => {
            let mut result = json!({
                "toolUseId": tool_use_id,
                "content": [{ "text": content }]
            });
            if *is_error {
                result["status"] = json!("error");
            }
            json!({ "toolResult": result })
        }
    })
}

/// Collect system message text, in order.
fn render_system(messages: &[Message]) -> Result<Vec<Value>> {
    let mut blocks = Vec::new();

    for message in messages.iter().filter(|m| m.role == Role::System) {
        match &message.content {
            Content::Text(text) => blocks.push(json!({ "text": text })),
            Content::Parts(parts) => {
                for part in parts {
                    match part {
                        ContentPart::Text { text } => blocks.push(json!({ "text": text })),
                        _ => {
                            return Err(Error::Rendering(
                                "system messages may only contain text".to_string(),
                            ));
                        }
                    }
                }
            }
        }
    }

    blocks.retain(|b| b["text"].as_str().is_some_and(|t| !t.is_empty()));
    Ok(blocks)
}

fn render_tool_config<'a>(
    tools: impl Iterator<Item = &'a ToolDefinition>,
    schema: Option<&Value>,
) -> Result<Value> {
    let mut specs = tools.map(render_tool).collect::<Result<Vec<_>>>()?;

    if specs.is_empty() && schema.is_none() {
        return Ok(Value::Object(Map::new()));
    }

    let mut config = Map::new();
    if let Some(schema) = schema {
        if !schema.is_object() {
            return Err(Error::Rendering(
                "structured output schema must be a JSON object".to_string(),
            ));
        }
        specs.push(json!({
            "toolSpec": {
                "name": STRUCTURED_OUTPUT_TOOL,
                "description": "Respond with a JSON object matching the provided schema.",
                "inputSchema": { "json": schema }
            }
        }));
        config.insert(
            "toolChoice".to_string(),
            json!({ "tool": { "name": STRUCTURED_OUTPUT_TOOL } }),
        );
    }
    config.insert("tools".to_string(), Value::Array(specs));

    Ok(Value::Object(config))
}

fn render_tool(tool: &ToolDefinition) -> Result<Value> {
    let schema = match &tool.parameter_schema {
        Some(schema) if schema.is_object() => schema.clone(),
        Some(_) => {
            return Err(Error::Rendering(format!(
                "parameter schema for tool '{}' must be a JSON object",
                tool.name
            )));
        }
        None => json!({ "type": "object", "properties": {} }),
    };

    let mut entry = Map::new();
    entry.insert(
        "toolSpec".to_string(),
        json!({
            "name": tool.name,
            "description": tool.description,
            "inputSchema": { "json": schema }
        }),
    );

    Ok(Value::Object(deep_merge(entry, tool.provider_params.clone())))
}

fn render_inference_config(temperature: Option<f64>, params: &Params) -> Result<Value> {
    if temperature.is_some()
        && let Some(explicit) = params.get(INFERENCE_CONFIG_KEY)
        && !explicit.is_object()
        && !explicit.is_null()
    {
        return Err(Error::Rendering(
            "inferenceConfig param must be a mapping to combine with temperature".to_string(),
        ));
    }

    let mut config = Map::new();
    if let Some(temperature) = temperature {
        let number = serde_json::Number::from_f64(temperature).ok_or_else(|| {
            Error::Rendering(format!("temperature must be finite, got {}", temperature))
        })?;
        config.insert("temperature".to_string(), Value::Number(number));
    }
    Ok(Value::Object(config))
}
