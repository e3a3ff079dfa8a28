// GET /api/chat/{username}/history handler

use tracing::{error, info};
use warp::reply::{Reply, Response};

use super::{error_reply, AppState};
use crate::models::HistoryResponse;

pub async fn history_handler(username: String, state: AppState) -> Result<Response, warp::Rejection> {
    info!(username = %username, "GET /api/chat/{}/history", username);

    let user = match state.store.find_user(&username).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(error_reply(404, "User not found")),
        Err(e) => {
            error!(username = %username, error = %e, "Failed to fetch history");
            return Ok(error_reply(500, "Failed to fetch history"));
        }
    };

    match state.store.history(user).await {
        Ok(messages) => {
            let body: HistoryResponse = messages;
            Ok(warp::reply::json(&body).into_response())
        }
        Err(e) => {
            error!(username = %username, error = %e, "Failed to fetch history");
            Ok(error_reply(500, "Failed to fetch history"))
        }
    }
}
