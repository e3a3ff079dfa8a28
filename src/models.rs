// Request and response bodies of the chat API

use serde::{Deserialize, Serialize};

use crate::chat_db::StoredMessage;

// Request Types
#[derive(Debug, Clone, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

// Non-streaming chat reply
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatReply {
    pub response: String,
    pub id: i64,
}

// Error body shared by every endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorBody {
    pub detail: String,
}

impl ErrorBody {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

// History endpoint returns stored rows as they are
pub type HistoryResponse = Vec<StoredMessage>;
