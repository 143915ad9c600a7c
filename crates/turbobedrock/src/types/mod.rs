//! Type definitions for requests, responses, and model metadata

mod message;
mod model;
mod request;
mod response;
mod tool;

pub use message::{Content, ContentPart, Message, Role};
pub use model::{Capability, ModelInfo};
pub use request::{ChatRequest, ChatRequestBuilder, Params, ThinkingConfig};
pub use response::{Completion, StopReason, ToolCall, Usage};
pub use tool::{ToolDefinition, ToolSet, tool_set};
