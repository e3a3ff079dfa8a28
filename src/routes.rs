// Route definitions

use crate::handlers::{self, AppState};
use crate::models::ChatRequest;
use warp::Filter;

/// Largest accepted request body
const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn configure_routes(
    state: AppState,
    cors_origins: &[String],
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let api = warp::path("api").and(warp::path("chat"));
    let with_state = warp::any().map(move || state.clone());

    // POST /api/chat/{username}/stream
    let stream_chat = api
        .and(warp::path::param::<String>())
        .and(warp::path("stream"))
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_state.clone())
        .and_then(handlers::stream_chat_handler);

    // POST /api/chat/{username}
    let chat = api
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::post())
        .and(json_body())
        .and(with_state.clone())
        .and_then(handlers::chat_handler);

    // GET /api/chat/{username}/history
    let history = api
        .and(warp::path::param::<String>())
        .and(warp::path("history"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_state)
        .and_then(handlers::history_handler);

    let cors = cors_origins.iter().fold(
        warp::cors()
            .allow_methods(vec!["GET", "POST", "OPTIONS"])
            .allow_header("content-type")
            .allow_credentials(true),
        |cors, origin| cors.allow_origin(origin.as_str()),
    );

    // Combine routes
    stream_chat.or(chat).or(history).with(cors)
}

fn json_body() -> impl Filter<Extract = (ChatRequest,), Error = warp::Rejection> + Clone {
    warp::body::content_length_limit(MAX_BODY_BYTES).and(warp::body::json())
}
