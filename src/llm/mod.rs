//! Upstream inference client
//!
//! This module wraps the text-generation server the relay streams from. The
//! server speaks the llama.cpp `/completion` protocol; the relay only ever sees
//! the `CompletionProvider` trait.

pub mod core;
pub mod llama;

// Re-export commonly used types
pub use core::{
    config::{UpstreamConfig, DEFAULT_SYSTEM_PROMPT},
    error::LlmError,
    provider::{create_provider, ByteStream, CompletionProvider},
};

pub use llama::LlamaClient;
