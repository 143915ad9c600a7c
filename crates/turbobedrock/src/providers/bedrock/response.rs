//! Converse response parsing

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::{Completion, StopReason, ToolCall, Usage};

/// Parse a synchronous Converse response body.
///
/// # Errors
///
/// Returns `Error::ResponseValidation` if `output.message.content` is missing.
pub fn parse_completion(body: &Value) -> Result<Completion> {
    let content = body
        .pointer("/output/message/content")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            Error::ResponseValidation("missing output.message.content".to_string())
        })?;

    let mut text = String::new();
    let mut thinking: Option<String> = None;
    let mut tool_calls = Vec::new();

    for block in content {
        if let Some(chunk) = block.get("text").and_then(Value::as_str) {
            text.push_str(chunk);
        } else if let Some(tool_use) = block.get("toolUse") {
            tool_calls.push(ToolCall {
                id: string_field(tool_use, "toolUseId"),
                name: string_field(tool_use, "name"),
                input: tool_use.get("input").cloned().unwrap_or(Value::Null),
            });
        } else if let Some(reasoning) = block
            .pointer("/reasoningContent/reasoningText/text")
            .and_then(Value::as_str)
        {
            thinking.get_or_insert_with(String::new).push_str(reasoning);
        }
    }

    let usage = body
        .get("usage")
        .map(|u| Usage {
            input_tokens: u.get("inputTokens").and_then(Value::as_u64).unwrap_or(0),
            output_tokens: u.get("outputTokens").and_then(Value::as_u64).unwrap_or(0),
        })
        .unwrap_or_default();

    Ok(Completion {
        text,
        thinking,
        tool_calls,
        stop_reason: body
            .get("stopReason")
            .and_then(Value::as_str)
            .map(StopReason::from_wire),
        usage,
    })
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_text_completion() {
        let body = json!({
            "output": {"message": {"role": "assistant", "content": [{"text": "Hello"}, {"text": " there"}]}},
            "stopReason": "end_turn",
            "usage": {"inputTokens": 12, "outputTokens": 3, "totalTokens": 15}
        });
        let completion = parse_completion(&body).unwrap();
        assert_eq!(completion.text, "Hello there");
        assert_eq!(completion.stop_reason, Some(StopReason::EndTurn));
        assert_eq!(completion.usage, Usage { input_tokens: 12, output_tokens: 3 });
        assert!(completion.tool_calls.is_empty());
        assert!(completion.thinking.is_none());
    }

    #[test]
    fn test_parse_tool_use_and_reasoning() {
        let body = json!({
            "output": {"message": {"role": "assistant", "content": [
                {"reasoningContent": {"reasoningText": {"text": "Need weather.", "signature": "sig"}}},
                {"toolUse": {"toolUseId": "tooluse_1", "name": "weather", "input": {"city": "Paris"}}}
            ]}},
            "stopReason": "tool_use"
        });
        let completion = parse_completion(&body).unwrap();
        assert_eq!(completion.thinking.as_deref(), Some("Need weather."));
        assert_eq!(completion.tool_calls.len(), 1);
        assert_eq!(completion.tool_calls[0].id, "tooluse_1");
        assert_eq!(completion.tool_calls[0].input, json!({"city": "Paris"}));
        assert_eq!(completion.stop_reason, Some(StopReason::ToolUse));
        assert_eq!(completion.usage, Usage::default());
    }

    #[test]
    fn test_parse_missing_output() {
        assert!(parse_completion(&json!({"stopReason": "end_turn"})).is_err());
    }

    #[test]
    fn test_unknown_stop_reason() {
        assert_eq!(
            StopReason::from_wire("model_context_window_exceeded"),
            StopReason::Other("model_context_window_exceeded".to_string())
        );
    }
}
