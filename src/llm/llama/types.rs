//! Request and response bodies of the `/completion` endpoint

use serde::{Deserialize, Serialize};

/// Body sent to `/completion`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CompletionRequest {
    /// Full prompt, system instruction included
    pub prompt: String,
    /// Maximum number of tokens to generate
    pub n_predict: u32,
    /// Ask the server for incremental output
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub stream: bool,
}

impl CompletionRequest {
    /// Build a single-shot request
    pub fn new(prompt: impl Into<String>, n_predict: u32) -> Self {
        Self {
            prompt: prompt.into(),
            n_predict,
            stream: false,
        }
    }

    /// Turn the request into a streaming one
    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

/// The part of a single-shot answer the service cares about
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CompletionResponse {
    #[serde(default)]
    pub content: Option<String>,
}
