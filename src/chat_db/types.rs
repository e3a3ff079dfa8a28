use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

use crate::chat_db::error::{Error, Result};

/// Primary key of a registered user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Identity of a stored exchange, returned once the write is committed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersistedExchange {
    pub id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

/// One user message and the model's reply, as kept in history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredMessage {
    pub id: i64,
    pub content: String,
    pub response: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl StoredMessage {
    /// Parse a `messages` row selected as `id, content, response, created_at`
    pub(crate) fn from_row(row: &Row) -> Result<Self> {
        Ok(Self {
            id: row
                .try_get("id")
                .map_err(|e| Error::DatabaseError(format!("Failed to read id: {}", e)))?,
            content: row
                .try_get::<_, Option<String>>("content")
                .map_err(|e| Error::DatabaseError(format!("Failed to read content: {}", e)))?
                .unwrap_or_default(),
            response: row
                .try_get::<_, Option<String>>("response")
                .map_err(|e| Error::DatabaseError(format!("Failed to read response: {}", e)))?
                .unwrap_or_default(),
            created_at: row
                .try_get("created_at")
                .map_err(|e| Error::DatabaseError(format!("Failed to read created_at: {}", e)))?,
        })
    }
}
