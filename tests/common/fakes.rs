//! In-memory stand-ins for the model server and the chat store

use async_trait::async_trait;
use bytes::Bytes;
use chrono::Utc;
use futures::stream::{self, BoxStream};
use futures::StreamExt;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use llama_relay::chat_db::{
    self, ExchangePersister, HistoryReader, IdentityLookup, PersistedExchange, StoredMessage,
    UserId,
};
use llama_relay::llm::{ByteStream, CompletionProvider, LlmError};

/// One scripted piece of the upstream body
#[derive(Clone)]
pub enum Chunk {
    Bytes(Vec<u8>),
    Fail(&'static str),
    /// Body stays open without sending anything more
    Stall,
}

pub fn ok(bytes: &[u8]) -> Chunk {
    Chunk::Bytes(bytes.to_vec())
}

pub fn fail(reason: &'static str) -> Chunk {
    Chunk::Fail(reason)
}

pub fn stall() -> Chunk {
    Chunk::Stall
}

/// How the fake upstream answers
#[derive(Clone)]
pub enum Script {
    Stream(Vec<Chunk>),
    Unreachable,
    Status(u16),
    Complete(String),
}

pub struct FakeUpstream {
    script: Script,
    pub calls: AtomicUsize,
    pub last_message: Mutex<Option<String>>,
    bodies: Arc<()>,
}

impl FakeUpstream {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            last_message: Mutex::new(None),
            bodies: Arc::new(()),
        }
    }

    pub fn streaming(chunks: Vec<Chunk>) -> Self {
        Self::new(Script::Stream(chunks))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Response bodies handed out and not yet dropped
    pub fn open_bodies(&self) -> usize {
        Arc::strong_count(&self.bodies) - 1
    }

    fn record(&self, message: &str) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_message.lock().unwrap() = Some(message.to_string());
    }

    fn scripted_error(&self) -> Option<LlmError> {
        match &self.script {
            Script::Unreachable => Some(LlmError::Unreachable("connection refused".into())),
            Script::Status(status) => Some(LlmError::HttpError {
                status: *status,
                body: "model failed".into(),
            }),
            _ => None,
        }
    }
}

#[async_trait]
impl CompletionProvider for FakeUpstream {
    async fn stream_completion(&self, user_message: &str) -> Result<ByteStream, LlmError> {
        self.record(user_message);
        if let Some(err) = self.scripted_error() {
            return Err(err);
        }

        let chunks = match &self.script {
            Script::Stream(chunks) => chunks.clone(),
            Script::Complete(text) => vec![Chunk::Bytes(text.clone().into_bytes())],
            _ => Vec::new(),
        };

        let stalls = chunks.iter().any(|chunk| matches!(chunk, Chunk::Stall));
        let items: Vec<Result<Bytes, LlmError>> = chunks
            .into_iter()
            .filter_map(|chunk| match chunk {
                Chunk::Bytes(bytes) => Some(Ok(Bytes::from(bytes))),
                Chunk::Fail(reason) => Some(Err(LlmError::StreamError(reason.to_string()))),
                Chunk::Stall => None,
            })
            .collect();

        let tail: BoxStream<'static, Result<Bytes, LlmError>> = if stalls {
            stream::pending().boxed()
        } else {
            stream::empty().boxed()
        };
        let held = Arc::clone(&self.bodies);
        let body = stream::iter(items).chain(tail).map(move |item| {
            let _held = &held;
            item
        });

        Ok(Box::pin(body))
    }

    async fn complete(&self, user_message: &str) -> Result<String, LlmError> {
        self.record(user_message);
        if let Some(err) = self.scripted_error() {
            return Err(err);
        }
        match &self.script {
            Script::Complete(text) => Ok(text.clone()),
            _ => Ok(String::new()),
        }
    }
}

/// Store that keeps everything in memory and can be told to fail writes
#[derive(Default)]
pub struct FakeStore {
    users: Mutex<HashMap<String, UserId>>,
    messages: Mutex<Vec<(UserId, StoredMessage)>>,
    fail_writes: AtomicBool,
    pub rollbacks: AtomicUsize,
}

impl FakeStore {
    pub fn with_user(username: &str) -> Self {
        let store = Self::default();
        store
            .users
            .lock()
            .unwrap()
            .insert(username.to_string(), UserId(1));
        store
    }

    pub fn failing_writes(self) -> Self {
        self.fail_writes.store(true, Ordering::SeqCst);
        self
    }

    pub fn saved(&self) -> Vec<StoredMessage> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .map(|(_, message)| message.clone())
            .collect()
    }

    pub fn rollback_count(&self) -> usize {
        self.rollbacks.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IdentityLookup for FakeStore {
    async fn find_user(&self, username: &str) -> chat_db::Result<Option<UserId>> {
        Ok(self.users.lock().unwrap().get(username).copied())
    }
}

#[async_trait]
impl ExchangePersister for FakeStore {
    async fn persist_exchange(
        &self,
        user: UserId,
        message: &str,
        response: &str,
    ) -> chat_db::Result<PersistedExchange> {
        if self.fail_writes.load(Ordering::SeqCst) {
            self.rollbacks.fetch_add(1, Ordering::SeqCst);
            return Err(chat_db::Error::DatabaseError("disk full".into()));
        }

        let mut messages = self.messages.lock().unwrap();
        let saved = PersistedExchange {
            id: messages.len() as i64 + 1,
            created_at: Some(Utc::now()),
        };
        messages.push((
            user,
            StoredMessage {
                id: saved.id,
                content: message.to_string(),
                response: response.to_string(),
                created_at: saved.created_at,
            },
        ));
        Ok(saved)
    }
}

#[async_trait]
impl HistoryReader for FakeStore {
    async fn history(&self, user: UserId) -> chat_db::Result<Vec<StoredMessage>> {
        Ok(self
            .messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(owner, _)| *owner == user)
            .map(|(_, message)| message.clone())
            .collect())
    }
}
