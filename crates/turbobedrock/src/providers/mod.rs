//! Provider implementations

pub mod bedrock;
