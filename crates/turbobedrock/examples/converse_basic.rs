//! Basic Bedrock Converse example
//!
//! ## Prerequisites
//!
//! - `AWS_REGION` (or `AWS_DEFAULT_REGION`)
//! - `AWS_BEARER_TOKEN_BEDROCK` holding a Bedrock API key
//!
//! ## Usage
//!
//! ```bash
//! AWS_REGION=us-east-1 cargo run --example converse_basic
//!
//! # Invoke a stored prompt resource instead of a model
//! BEDROCK_MODEL=arn:aws:bedrock:us-east-1:123456789012:prompt/PROMPT12345 \
//!     cargo run --example converse_basic
//! ```

use turbobedrock::prelude::*;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let provider = BedrockProvider::builder()
        .config(BedrockConfig::from_env()?)
        .build()?;

    let model = std::env::var("BEDROCK_MODEL")
        .unwrap_or_else(|_| "anthropic.claude-3-5-sonnet-20241022-v2:0".to_string());

    let mut builder = ChatRequest::builder();
    builder
        .model(model.as_str())
        .messages(vec![Message::user("In one sentence, what is Amazon Bedrock?")]);
    if !turbobedrock::providers::bedrock::is_prompt_resource(&model) {
        // Prompt resources carry their own inference settings
        builder.temperature(0.2);
    }

    match provider.complete(&builder.build()?).await {
        Ok(completion) => {
            println!("{}", completion.text);
            println!(
                "tokens: {} in / {} out",
                completion.usage.input_tokens, completion.usage.output_tokens
            );
        }
        Err(e) if e.is_policy_violation() => eprintln!("Rejected locally: {}", e),
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
