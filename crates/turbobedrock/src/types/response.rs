//! Completion response types

use serde::{Deserialize, Serialize};

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// Natural end of turn
    EndTurn,
    /// The model wants to call a tool
    ToolUse,
    /// Token limit reached
    MaxTokens,
    /// A stop sequence matched
    StopSequence,
    /// Guardrail intervened
    GuardrailIntervened,
    /// Content was filtered
    ContentFiltered,
    /// Any reason this SDK does not know yet
    Other(String),
}

impl StopReason {
    /// Map a Converse `stopReason` string.
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "end_turn" => Self::EndTurn,
            "tool_use" => Self::ToolUse,
            "max_tokens" => Self::MaxTokens,
            "stop_sequence" => Self::StopSequence,
            "guardrail_intervened" => Self::GuardrailIntervened,
            "content_filtered" => Self::ContentFiltered,
            other => Self::Other(other.to_string()),
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool use identifier, echoed back in the tool result
    pub id: String,
    /// Tool name
    pub name: String,
    /// Tool input arguments
    pub input: serde_json::Value,
}

/// Token usage statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    /// Input tokens
    pub input_tokens: u64,
    /// Output tokens
    pub output_tokens: u64,
}

/// A parsed, non-streaming completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    /// Concatenated text output
    pub text: String,
    /// Reasoning text, when the model returned any
    pub thinking: Option<String>,
    /// Tool calls in the order the model emitted them
    pub tool_calls: Vec<ToolCall>,
    /// Why generation stopped
    pub stop_reason: Option<StopReason>,
    /// Token usage
    pub usage: Usage,
}
