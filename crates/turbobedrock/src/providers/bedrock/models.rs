//! Model catalog and capability lookup
//!
//! The model registry lives outside this crate. The provider only needs to ask
//! whether a model is reasoning-embedded (to decide where `top_k` goes) and to
//! list what is available.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::error::Result;
use crate::types::{Capability, ModelInfo};

/// Read-only view of the model registry.
pub trait ModelCatalog: Send + Sync + fmt::Debug {
    /// All known models.
    fn list_models(&self) -> Vec<ModelInfo>;

    /// Look up a single model.
    fn model(&self, id: &str) -> Option<ModelInfo> {
        self.list_models().into_iter().find(|m| m.id == id)
    }

    /// Whether `model` accepts `top_k` through additional model request fields.
    ///
    /// Unknown models are treated as not reasoning-embedded.
    fn supports_reasoning_embedded(&self, model: &str) -> bool {
        self.model(model).is_some_and(|m| m.reasoning_embedded())
    }
}

/// In-memory catalog.
#[derive(Debug, Clone, Default)]
pub struct StaticModelCatalog {
    models: BTreeMap<String, ModelInfo>,
}

impl StaticModelCatalog {
    /// Create a catalog from a list of models.
    pub fn new(models: impl IntoIterator<Item = ModelInfo>) -> Self {
        Self {
            models: models.into_iter().map(|m| (m.id.clone(), m)).collect(),
        }
    }

    /// Create a catalog from a `ListFoundationModels` response body.
    ///
    /// Only the first page is read.
    pub fn from_foundation_models(body: &str) -> Result<Self> {
        Ok(Self::new(parse_list_models_response(body)?))
    }

    /// Add or replace a model.
    pub fn insert(&mut self, model: ModelInfo) {
        self.models.insert(model.id.clone(), model);
    }
}

impl ModelCatalog for StaticModelCatalog {
    fn list_models(&self) -> Vec<ModelInfo> {
        self.models.values().cloned().collect()
    }

    fn model(&self, id: &str) -> Option<ModelInfo> {
        self.models.get(id).cloned()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListFoundationModelsResponse {
    #[serde(default)]
    model_summaries: Vec<FoundationModelSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FoundationModelSummary {
    model_id: String,
    #[serde(default)]
    model_name: Option<String>,
    #[serde(default)]
    provider_name: Option<String>,
    #[serde(default)]
    input_modalities: Vec<String>,
    #[serde(default)]
    output_modalities: Vec<String>,
    #[serde(default)]
    response_streaming_supported: Option<bool>,
}

/// Parse a `ListFoundationModels` body into model info.
///
/// Models that cannot produce text are skipped; Converse only serves text output.
pub fn parse_list_models_response(body: &str) -> Result<Vec<ModelInfo>> {
    let response: ListFoundationModelsResponse = serde_json::from_str(body)?;

    Ok(response
        .model_summaries
        .into_iter()
        .filter(|s| s.output_modalities.iter().any(|m| m == "TEXT"))
        .map(|summary| {
            let mut model = ModelInfo::new(summary.model_id);
            if let Some(name) = summary.model_name {
                model.name = name;
            }
            model.provider = summary.provider_name.unwrap_or_default();
            if summary.response_streaming_supported.unwrap_or(false) {
                model = model.with_capability(Capability::Streaming);
            }
            if summary.input_modalities.iter().any(|m| m == "IMAGE") {
                model = model.with_capability(Capability::Vision);
            }
            model
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_BODY: &str = r#"{
        "modelSummaries": [
            {
                "modelArn": "arn:aws:bedrock:us-east-1::foundation-model/anthropic.claude-3-5-sonnet-20241022-v2:0",
                "modelId": "anthropic.claude-3-5-sonnet-20241022-v2:0",
                "modelName": "Claude 3.5 Sonnet v2",
                "providerName": "Anthropic",
                "inputModalities": ["TEXT", "IMAGE"],
                "outputModalities": ["TEXT"],
                "responseStreamingSupported": true
            },
            {
                "modelId": "amazon.titan-image-generator-v2:0",
                "modelName": "Titan Image Generator G1 v2",
                "providerName": "Amazon",
                "inputModalities": ["TEXT", "IMAGE"],
                "outputModalities": ["IMAGE"]
            },
            {
                "modelId": "deepseek.r1-v1:0",
                "providerName": "DeepSeek",
                "inputModalities": ["TEXT"],
                "outputModalities": ["TEXT"],
                "responseStreamingSupported": false
            }
        ]
    }"#;

    #[test]
    fn test_parse_list_models_response() {
        let models = parse_list_models_response(LIST_BODY).unwrap();
        assert_eq!(models.len(), 2);

        let claude = &models[0];
        assert_eq!(claude.name, "Claude 3.5 Sonnet v2");
        assert_eq!(claude.provider, "Anthropic");
        assert!(claude.supports(Capability::Streaming));
        assert!(claude.supports(Capability::Vision));

        let r1 = &models[1];
        assert_eq!(r1.name, "deepseek.r1-v1:0");
        assert!(r1.capabilities.is_empty());
    }

    #[test]
    fn test_parse_empty_listing() {
        assert!(parse_list_models_response("{}").unwrap().is_empty());
        assert!(parse_list_models_response("not json").is_err());
    }

    #[test]
    fn test_catalog_reasoning_lookup() {
        let mut catalog = StaticModelCatalog::from_foundation_models(LIST_BODY).unwrap();
        assert!(!catalog.supports_reasoning_embedded("deepseek.r1-v1:0"));

        catalog.insert(
            ModelInfo::new("deepseek.r1-v1:0").with_capability(Capability::ReasoningEmbedded),
        );
        assert!(catalog.supports_reasoning_embedded("deepseek.r1-v1:0"));
        assert!(!catalog.supports_reasoning_embedded("unknown.model-v1:0"));
        assert_eq!(catalog.list_models().len(), 2);
    }
}
