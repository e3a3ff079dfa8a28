// POST /api/chat/{username}/stream handler

use futures_util::StreamExt;
use tracing::{info, warn};
use warp::reply::{Reply, Response};

use super::{error_reply, AppState};
use crate::models::ChatRequest;
use crate::sse::frame_to_event;

pub async fn stream_chat_handler(
    username: String,
    request: ChatRequest,
    state: AppState,
) -> Result<Response, warp::Rejection> {
    info!(username = %username, "POST /api/chat/{}/stream", username);

    let relay_stream = match state.relay.open(&username, &request.message).await {
        Ok(relay_stream) => relay_stream,
        Err(e) => {
            warn!(username = %username, error = %e, "Stream request rejected");
            return Ok(error_reply(e.status_code(), e.detail()));
        }
    };

    let event_stream = relay_stream.spawn_frames().map(frame_to_event);

    Ok(warp::sse::reply(warp::sse::keep_alive().stream(event_stream)).into_response())
}
