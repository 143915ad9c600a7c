//! Tool-related types

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// A tool that can be offered to the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Name of the tool
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// JSON Schema for the tool's input parameters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_schema: Option<Value>,

    /// Provider-specific fields merged into the rendered tool entry
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub provider_params: Map<String, Value>,
}

impl ToolDefinition {
    /// Create a new tool without a parameter schema.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameter_schema: None,
            provider_params: Map::new(),
        }
    }

    /// Attach a parameter schema.
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.parameter_schema = Some(schema);
        self
    }

    /// Attach provider-specific fields.
    pub fn with_provider_params(mut self, params: Map<String, Value>) -> Self {
        self.provider_params = params;
        self
    }
}

/// Set of tools keyed by name.
///
/// Only membership matters to prompt resource validation; the ordered map keeps
/// rendering deterministic.
pub type ToolSet = BTreeMap<String, ToolDefinition>;

/// Build a [`ToolSet`] from an iterator of tools.
pub fn tool_set(tools: impl IntoIterator<Item = ToolDefinition>) -> ToolSet {
    tools.into_iter().map(|t| (t.name.clone(), t)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tool_set_is_keyed_by_name() {
        let tools = tool_set([
            ToolDefinition::new("weather", "Get weather"),
            ToolDefinition::new("lookup", "Lookup"),
            ToolDefinition::new("lookup", "Lookup again"),
        ]);
        assert_eq!(tools.len(), 2);
        assert_eq!(tools.keys().collect::<Vec<_>>(), vec!["lookup", "weather"]);
        assert_eq!(tools["lookup"].description, "Lookup again");
    }

    #[test]
    fn test_with_schema() {
        let tool = ToolDefinition::new("lookup", "Lookup")
            .with_schema(json!({"type": "object", "properties": {"q": {"type": "string"}}}));
        assert!(tool.parameter_schema.is_some());
    }
}
