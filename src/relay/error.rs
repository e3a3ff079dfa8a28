use thiserror::Error;

use crate::chat_db;
use crate::llm::LlmError;

/// Failures before the first byte of the event stream is sent
///
/// Each maps to an HTTP status and a short detail string.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Empty message")]
    EmptyMessage,

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Model server unreachable: {0}")]
    UpstreamUnreachable(String),

    #[error("Model server error (status {status}): {body}")]
    UpstreamBadStatus { status: u16, body: String },

    #[error("User lookup failed: {0}")]
    Lookup(#[from] chat_db::Error),
}

impl RelayError {
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::EmptyMessage => 400,
            RelayError::UserNotFound(_) => 404,
            RelayError::UpstreamUnreachable(_) | RelayError::UpstreamBadStatus { .. } => 502,
            RelayError::Lookup(_) => 500,
        }
    }

    /// Client-facing detail; never includes upstream bodies or database errors
    pub fn detail(&self) -> &'static str {
        match self {
            RelayError::EmptyMessage => "Empty message",
            RelayError::UserNotFound(_) => "User not found",
            RelayError::UpstreamUnreachable(_) => "Model server unreachable",
            RelayError::UpstreamBadStatus { .. } => "Model server error",
            RelayError::Lookup(_) => "Internal server error",
        }
    }
}

impl From<LlmError> for RelayError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::HttpError { status, body } => RelayError::UpstreamBadStatus { status, body },
            other => RelayError::UpstreamUnreachable(other.to_string()),
        }
    }
}

/// A failed attempt to read the next upstream line
#[derive(Error, Debug)]
pub enum ReadError {
    #[error("Upstream transport error: {0}")]
    Transport(String),

    #[error("Upstream sent invalid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),
}
