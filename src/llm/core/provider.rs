//! Provider trait for upstream inference servers

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::Stream;
use std::pin::Pin;

use super::{config::UpstreamConfig, error::LlmError};
use crate::llm::llama::LlamaClient;

/// Raw response body of a streaming completion, chunk by chunk
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, LlmError>> + Send>>;

/// Interface the relay and the handlers need from the inference server
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Open a streaming completion for a user message
    ///
    /// Resolves once the upstream has answered with a success status; the
    /// returned stream yields the response body as it arrives. Dropping the
    /// stream closes the connection.
    ///
    /// # Errors
    /// * `LlmError::Unreachable` - the connection could not be established
    /// * `LlmError::HttpError` - the upstream answered with a non-success status
    async fn stream_completion(&self, user_message: &str) -> Result<ByteStream, LlmError>;

    /// Run a blocking single-shot completion and return the generated text
    async fn complete(&self, user_message: &str) -> Result<String, LlmError>;
}

/// Create the provider described by the configuration
///
/// # Example
///
/// ```rust,no_run
/// use llama_relay::llm::{create_provider, UpstreamConfig};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let provider = create_provider(UpstreamConfig::new("http://localhost:5001"))?;
/// # Ok(())
/// # }
/// ```
pub fn create_provider(config: UpstreamConfig) -> Result<Box<dyn CompletionProvider>, LlmError> {
    let client = LlamaClient::new(config)?;
    Ok(Box::new(client))
}
