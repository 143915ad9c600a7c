//! Model metadata types

use serde::{Deserialize, Serialize};

/// Capabilities a model may advertise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Streaming responses (converse-stream)
    Streaming,
    /// Image inputs
    Vision,
    /// Tool use
    FunctionCalling,
    /// Extended step-wise reasoning; the only class that accepts `top_k`
    ReasoningEmbedded,
}

/// Information about a model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Model identifier
    pub id: String,

    /// Display name
    pub name: String,

    /// Provider that publishes the model
    #[serde(default)]
    pub provider: String,

    /// Advertised capabilities
    #[serde(default)]
    pub capabilities: Vec<Capability>,
}

impl ModelInfo {
    /// Create model info with no capabilities.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            provider: String::new(),
            capabilities: Vec::new(),
        }
    }

    /// Add a capability.
    pub fn with_capability(mut self, capability: Capability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    /// Check a capability.
    pub fn supports(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Whether this model accepts `top_k` via additional model request fields.
    pub fn reasoning_embedded(&self) -> bool {
        self.supports(Capability::ReasoningEmbedded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capabilities_deduplicate() {
        let model = ModelInfo::new("deepseek.r1-v1:0")
            .with_capability(Capability::ReasoningEmbedded)
            .with_capability(Capability::ReasoningEmbedded);
        assert_eq!(model.capabilities.len(), 1);
        assert!(model.reasoning_embedded());
        assert!(!model.supports(Capability::Vision));
    }
}
