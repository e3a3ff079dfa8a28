//! Interfaces the relay and the HTTP handlers need from storage
//!
//! `ChatDbClient` implements all of them; tests substitute in-memory fakes.

use async_trait::async_trait;

use crate::chat_db::{
    client::ChatDbClient,
    error::Result,
    types::{PersistedExchange, StoredMessage, UserId},
};

/// Resolves a user name to a registered user
#[async_trait]
pub trait IdentityLookup: Send + Sync {
    /// `Ok(None)` when no such user exists
    async fn find_user(&self, username: &str) -> Result<Option<UserId>>;
}

/// Durably stores a finished exchange
#[async_trait]
pub trait ExchangePersister: Send + Sync {
    /// Store the user message and the full response as one record.
    ///
    /// On failure nothing must remain written.
    async fn persist_exchange(
        &self,
        user: UserId,
        message: &str,
        response: &str,
    ) -> Result<PersistedExchange>;
}

/// Reads back a user's stored exchanges
#[async_trait]
pub trait HistoryReader: Send + Sync {
    async fn history(&self, user: UserId) -> Result<Vec<StoredMessage>>;
}

/// Everything the HTTP layer needs from storage
pub trait ChatStore: IdentityLookup + ExchangePersister + HistoryReader {}

impl<T: IdentityLookup + ExchangePersister + HistoryReader> ChatStore for T {}

#[async_trait]
impl IdentityLookup for ChatDbClient {
    async fn find_user(&self, username: &str) -> Result<Option<UserId>> {
        ChatDbClient::find_user(self, username).await
    }
}

#[async_trait]
impl ExchangePersister for ChatDbClient {
    async fn persist_exchange(
        &self,
        user: UserId,
        message: &str,
        response: &str,
    ) -> Result<PersistedExchange> {
        ChatDbClient::persist_exchange(self, user, message, response).await
    }
}

#[async_trait]
impl HistoryReader for ChatDbClient {
    async fn history(&self, user: UserId) -> Result<Vec<StoredMessage>> {
        ChatDbClient::history(self, user).await
    }
}
