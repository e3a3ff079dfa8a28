// Handlers module

pub mod chat;
pub mod history;
pub mod stream_chat;

pub use chat::chat_handler;
pub use history::history_handler;
pub use stream_chat::stream_chat_handler;

use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::{Reply, Response};

use crate::chat_db::ChatStore;
use crate::llm::CompletionProvider;
use crate::models::ErrorBody;
use crate::relay::StreamRelay;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<StreamRelay>,
    pub store: Arc<dyn ChatStore>,
    pub upstream: Arc<dyn CompletionProvider>,
}

impl AppState {
    pub fn new<S>(store: Arc<S>, upstream: Arc<dyn CompletionProvider>) -> Self
    where
        S: ChatStore + 'static,
    {
        let relay = StreamRelay::new(store.clone(), store.clone(), Arc::clone(&upstream));
        Self {
            relay: Arc::new(relay),
            store,
            upstream,
        }
    }
}

/// JSON `{"detail": ...}` reply with the given status
pub fn error_reply(status: u16, detail: &str) -> Response {
    let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    warp::reply::with_status(warp::reply::json(&ErrorBody::new(detail)), status).into_response()
}
