//! Chat request types

use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

use super::{Message, ToolSet};

/// Caller-supplied parameter bag, canonicalized to string keys.
pub type Params = Map<String, Value>;

/// Configuration for enabling extended thinking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkingConfig {
    /// Token budget allocated for reasoning (must be at least 1024)
    pub budget_tokens: u32,

    /// Config type (always "enabled")
    #[serde(rename = "type")]
    pub config_type: String,
}

impl ThinkingConfig {
    /// Enable thinking with the given budget.
    pub fn new(budget_tokens: u32) -> Self {
        Self {
            budget_tokens,
            config_type: "enabled".to_string(),
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.budget_tokens < 1024 {
            return Err(format!(
                "budget_tokens must be at least 1024, got {}",
                self.budget_tokens
            ));
        }
        Ok(())
    }
}

/// A provider-agnostic chat completion request.
///
/// # Example
///
/// ```rust
/// use turbobedrock::types::{ChatRequest, Message};
///
/// let request = ChatRequest::builder()
///     .model("anthropic.claude-3-5-sonnet-20241022-v2:0")
///     .messages(vec![Message::user("Hello!")])
///     .temperature(0.2)
///     .build()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into, strip_option), build_fn(error = "crate::error::Error"))]
pub struct ChatRequest {
    /// Model identifier: a model ID, inference profile, or prompt resource ARN
    pub model: String,

    /// Messages in the conversation
    pub messages: Vec<Message>,

    /// Tools available to the model
    #[serde(default)]
    #[builder(default)]
    pub tools: ToolSet,

    /// Sampling temperature
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub temperature: Option<f64>,

    /// Provider-specific parameters merged into the payload
    #[serde(default)]
    #[builder(default)]
    pub params: Params,

    /// Extra headers for this request
    #[serde(default)]
    #[builder(default)]
    pub headers: BTreeMap<String, String>,

    /// JSON schema for structured output
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub schema: Option<Value>,

    /// Extended thinking configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    pub thinking: Option<ThinkingConfig>,
}

impl ChatRequest {
    /// Create a new builder.
    pub fn builder() -> ChatRequestBuilder {
        ChatRequestBuilder::default()
    }
}

impl From<derive_builder::UninitializedFieldError> for crate::error::Error {
    fn from(err: derive_builder::UninitializedFieldError) -> Self {
        crate::error::Error::InvalidRequest(err.to_string())
    }
}
