//! # TurboBedrock
//!
//! Request construction for the AWS Bedrock Converse API:
//! - Parameter normalization, including `top_k` routing for reasoning models
//! - Prompt resource (`arn:aws:bedrock:...:prompt/...`) runtime override policy
//! - Converse payload rendering (messages, system, tools, structured output, thinking)
//! - Encoded endpoint paths for `converse` and `converse-stream`
//!
//! Signing beyond Bedrock API keys, retries, and event-stream decoding are left
//! to the injected [`Signer`](http::Signer) and [`Transport`](http::Transport).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use turbobedrock::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let provider = BedrockProvider::builder()
//!         .config(BedrockConfig::from_env()?)
//!         .build()?;
//!
//!     let completion = provider
//!         .complete(
//!             &ChatRequest::builder()
//!                 .model("anthropic.claude-3-5-sonnet-20241022-v2:0")
//!                 .messages(vec![Message::user("Hello, Claude!")])
//!                 .build()?,
//!         )
//!         .await?;
//!
//!     println!("{}", completion.text);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![deny(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub use config::{BedrockConfig, BedrockConfigBuilder};
pub use error::{Error, Result};
pub use providers::bedrock::{BedrockProvider, BedrockProviderBuilder};
pub use types::*;

pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod providers;
pub mod types;

/// Prelude module for common imports
///
/// # Examples
///
/// ```rust
/// use turbobedrock::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        BedrockConfig, BedrockProvider, Error, Result,
        http::{ByteStream, Transport},
        providers::bedrock::{ModelCatalog, StaticModelCatalog},
        types::{
            ChatRequest, Completion, Content, ContentPart, Message, Role, ThinkingConfig,
            ToolDefinition, tool_set,
        },
    };
}

/// SDK version, automatically updated from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod property_tests;
