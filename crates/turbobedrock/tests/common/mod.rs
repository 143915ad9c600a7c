//! Common test utilities and helpers

use std::path::Path;

use turbobedrock::{BedrockConfig, BedrockProvider, Capability, ModelInfo};
use turbobedrock::providers::bedrock::StaticModelCatalog;

/// Model that accepts `top_k` through additional fields
#[allow(dead_code)]
pub const REASONING_MODEL: &str = "deepseek.r1-v1:0";

/// A stored prompt resource
#[allow(dead_code)]
pub const PROMPT_ARN: &str = "arn:aws:bedrock:us-east-1:123456789012:prompt/PROMPT12345";

/// Load a response fixture
#[allow(dead_code)]
pub fn load_response_fixture(name: &str) -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    let path = Path::new(manifest_dir)
        .join("tests")
        .join("fixtures")
        .join("responses")
        .join(format!("{}.json", name));

    std::fs::read_to_string(&path).unwrap_or_else(|e| {
        panic!(
            "Failed to load response fixture '{}' from {:?}: {}",
            name, path, e
        )
    })
}

/// Create a test Bedrock API key
#[allow(dead_code)]
pub fn test_api_key() -> String {
    "bedrock-api-key-test-0123456789abcdef".to_string()
}

/// Install a test log subscriber (honours `RUST_LOG`)
#[allow(dead_code)]
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Provider pointed at `endpoint` with a bearer key and a reasoning model in its catalog
#[allow(dead_code)]
pub fn provider_for(endpoint: &str) -> BedrockProvider {
    init_tracing();

    let config = BedrockConfig::builder()
        .region("us-east-1")
        .endpoint_url(endpoint)
        .api_key(test_api_key())
        .build();

    BedrockProvider::builder()
        .config(config)
        .catalog(StaticModelCatalog::new([
            ModelInfo::new(REASONING_MODEL).with_capability(Capability::ReasoningEmbedded),
        ]))
        .build()
        .expect("Failed to build provider")
}
