//! AWS Bedrock Converse provider
//!
//! Request construction runs in four pure stages before anything is sent:
//!
//! 1. [`normalize_params`] canonicalizes caller params and relocates `top_k`
//! 2. [`validate_prompt_arn_runtime_overrides`] rejects overrides a prompt resource forbids
//! 3. [`render_payload`] builds the Converse body
//! 4. [`completion_path`] / [`stream_path`] build the encoded endpoint path
//!
//! [`BedrockProvider`] wires the stages to the injected [`Transport`](crate::http::Transport).

pub mod error;
pub mod models;
pub mod normalize;
pub mod path;
pub mod prompt;
pub mod provider;
pub mod render;
pub mod response;

pub use error::parse_error_message;
pub use models::{ModelCatalog, StaticModelCatalog, parse_list_models_response};
pub use normalize::{canonicalize_params, deep_merge, normalize_params};
pub use path::{completion_path, encode_model_id, models_path, stream_path};
pub use prompt::{
    has_explicit_inference_config, is_prompt_resource, validate_prompt_arn_runtime_overrides,
};
pub use provider::{BedrockProvider, BedrockProviderBuilder};
pub use render::{RenderedPayload, STRUCTURED_OUTPUT_TOOL, render_payload};
pub use response::parse_completion;
