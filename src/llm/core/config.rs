//! Upstream connection and generation parameters

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Instruction prepended to every prompt so the model answers instead of
/// continuing the conversation on the user's behalf
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant. Answer the user's message directly and concisely. \
Do not ask clarifying or follow-up questions unless explicitly requested. \
Provide a single, self-contained response.";

/// Parameters for talking to the inference server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the inference server (e.g. "http://localhost:5001")
    pub base_url: String,
    /// System instruction placed ahead of the user message
    pub system_prompt: String,
    /// Token budget for streaming completions
    pub stream_n_predict: u32,
    /// Token budget for single-shot completions
    pub n_predict: u32,
    /// TCP connect timeout
    #[serde(with = "duration_secs")]
    pub connect_timeout: Duration,
    /// Whole-request timeout for single-shot completions
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
    /// Longest silence tolerated between body reads
    #[serde(with = "duration_secs")]
    pub stream_read_timeout: Duration,
}

impl UpstreamConfig {
    /// Create a configuration pointing at the given server
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the system prompt
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = prompt.into();
        self
    }

    /// Set the streaming token budget
    pub fn with_stream_n_predict(mut self, n_predict: u32) -> Self {
        self.stream_n_predict = n_predict;
        self
    }

    /// Set the single-shot token budget
    pub fn with_n_predict(mut self, n_predict: u32) -> Self {
        self.n_predict = n_predict;
        self
    }

    /// Set the single-shot request timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Set the per-read timeout on response bodies
    pub fn with_stream_read_timeout(mut self, timeout: Duration) -> Self {
        self.stream_read_timeout = timeout;
        self
    }

    /// URL of the completion endpoint
    pub fn completion_url(&self) -> String {
        format!("{}/completion", self.base_url.trim_end_matches('/'))
    }

    /// Build the prompt sent upstream for a user message
    pub fn build_prompt(&self, user_message: &str) -> String {
        format!("{}\n\nUser: {}", self.system_prompt, user_message)
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5001".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            stream_n_predict: 512,
            n_predict: 128,
            connect_timeout: Duration::from_secs(5),
            request_timeout: Duration::from_secs(60),
            stream_read_timeout: Duration::from_secs(120),
        }
    }
}

mod duration_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
