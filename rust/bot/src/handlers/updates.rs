use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply as _;

use crate::dispatcher::Dispatcher;
use crate::errors::ErrorResponse;
use crate::message::{Incoming, Reply};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateResponse {
    pub replies: Vec<Reply>,
}

/// Feeds one JSON-encoded [`Incoming`] update to the dispatcher.
pub async fn post_update(dispatcher: Arc<Dispatcher>, body: Bytes) -> Response {
    let incoming: Incoming = match serde_json::from_slice(&body) {
        Ok(incoming) => incoming,
        Err(err) => {
            tracing::debug!(error = %err, "rejected malformed update");
            return ErrorResponse::new("invalid_update", format!("malformed update: {err}"))
                .into_response(StatusCode::BAD_REQUEST);
        }
    };

    // sqlite calls block
    let replies = match tokio::task::spawn_blocking(move || dispatcher.handle(incoming)).await {
        Ok(replies) => replies,
        Err(err) => {
            tracing::error!(error = %err, "dispatcher task failed");
            return ErrorResponse::new("internal_error", "update could not be processed")
                .into_response(StatusCode::INTERNAL_SERVER_ERROR);
        }
    };

    reply::with_status(reply::json(&UpdateResponse { replies }), StatusCode::OK).into_response()
}
