//! llama.cpp client implementation

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use tracing::{debug, error};

use crate::llm::core::{
    config::UpstreamConfig,
    error::LlmError,
    provider::{ByteStream, CompletionProvider},
};

use super::types::{CompletionRequest, CompletionResponse};

/// Client for a llama.cpp-compatible `/completion` endpoint
pub struct LlamaClient {
    /// HTTP client for making requests
    http_client: Client,
    /// Server location and generation parameters
    config: UpstreamConfig,
}

impl LlamaClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: UpstreamConfig) -> Result<Self, LlmError> {
        let http_client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.stream_read_timeout)
            .build()
            .map_err(|e| LlmError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            config,
        })
    }

    fn streaming_request(&self, user_message: &str) -> CompletionRequest {
        CompletionRequest::new(
            self.config.build_prompt(user_message),
            self.config.stream_n_predict,
        )
        .streaming()
    }

    fn single_shot_request(&self, user_message: &str) -> CompletionRequest {
        CompletionRequest::new(self.config.build_prompt(user_message), self.config.n_predict)
    }

    /// Turn a non-success response into an error, logging what the server said
    async fn reject_status(response: reqwest::Response) -> LlmError {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), body = %body, "Model server returned an error");
        LlmError::HttpError {
            status: status.as_u16(),
            body,
        }
    }
}

/// Pull the generated text out of a single-shot response body
///
/// JSON bodies contribute their `content` field (empty when missing); anything
/// that is not JSON is taken verbatim.
pub fn completion_text(body: &str) -> String {
    match serde_json::from_str::<CompletionResponse>(body) {
        Ok(parsed) => parsed.content.unwrap_or_default(),
        Err(_) => body.to_string(),
    }
}

#[async_trait]
impl CompletionProvider for LlamaClient {
    async fn stream_completion(&self, user_message: &str) -> Result<ByteStream, LlmError> {
        let request = self.streaming_request(user_message);
        let url = self.config.completion_url();
        debug!(url = %url, n_predict = request.n_predict, "Opening streaming completion");

        let response = self
            .http_client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject_status(response).await);
        }

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|e| LlmError::StreamError(e.to_string())));

        Ok(Box::pin(body))
    }

    async fn complete(&self, user_message: &str) -> Result<String, LlmError> {
        let request = self.single_shot_request(user_message);
        let url = self.config.completion_url();

        let response = self
            .http_client
            .post(&url)
            .timeout(self.config.request_timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| LlmError::Unreachable(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Self::reject_status(response).await);
        }

        let body = response.text().await?;
        Ok(completion_text(&body))
    }
}
