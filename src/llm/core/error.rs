//! Error types for the upstream client

use thiserror::Error;

/// Errors that can occur when talking to the inference server
#[derive(Debug, Error)]
pub enum LlmError {
    /// Connection could not be established (refused, DNS, timeout)
    #[error("Upstream unreachable: {0}")]
    Unreachable(String),

    /// Upstream answered with a non-success status
    #[error("HTTP error (status {status}): {body}")]
    HttpError { status: u16, body: String },

    /// Transport failure while reading a response body
    #[error("Stream error: {0}")]
    StreamError(String),

    /// JSON encoding/decoding issues
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Invalid request parameters
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        LlmError::SerializationError(err.to_string())
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            LlmError::HttpError {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else if err.is_connect() || err.is_timeout() || err.is_request() {
            LlmError::Unreachable(err.to_string())
        } else if err.is_body() || err.is_decode() {
            LlmError::StreamError(err.to_string())
        } else {
            LlmError::Unreachable(err.to_string())
        }
    }
}
