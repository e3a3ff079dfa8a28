// POST /api/chat/{username} handler

use tracing::{error, info, warn};
use warp::reply::{Reply, Response};

use super::{error_reply, AppState};
use crate::llm::LlmError;
use crate::models::{ChatReply, ChatRequest};

/// Single-shot chat: wait for the whole completion, store it, return it
pub async fn chat_handler(
    username: String,
    request: ChatRequest,
    state: AppState,
) -> Result<Response, warp::Rejection> {
    info!(username = %username, "POST /api/chat/{}", username);

    let user = match state.store.find_user(&username).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(error_reply(404, "User not found")),
        Err(e) => {
            error!(username = %username, error = %e, "User lookup failed");
            return Ok(error_reply(500, "Internal server error"));
        }
    };

    let output = match state.upstream.complete(&request.message).await {
        Ok(output) => output,
        Err(LlmError::HttpError { status, .. }) => {
            warn!(username = %username, status, "Model server rejected completion");
            return Ok(error_reply(500, "Model server error"));
        }
        Err(e) => {
            error!(username = %username, error = %e, "Model server unreachable");
            return Ok(error_reply(502, "Model server unreachable"));
        }
    };

    match state
        .store
        .persist_exchange(user, &request.message, &output)
        .await
    {
        Ok(saved) => Ok(warp::reply::json(&ChatReply {
            response: output,
            id: saved.id,
        })
        .into_response()),
        Err(e) => {
            error!(username = %username, error = %e, "Failed to save exchange");
            Ok(error_reply(500, "DB save failed"))
        }
    }
}
