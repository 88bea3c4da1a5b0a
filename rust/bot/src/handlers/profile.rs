use std::sync::Arc;

use warp::http::StatusCode;
use warp::reply::{self, Response};
use warp::Reply as _;

use ginga_engine::round::PlayerId;
use ginga_store::Ledger;

use crate::dispatcher::DispatchError;
use crate::errors::IntoErrorResponse;

pub async fn get_profile(ledger: Arc<Ledger>, user: PlayerId) -> Response {
    match ledger.profile(user) {
        Ok(profile) => reply::with_status(reply::json(&profile), StatusCode::OK).into_response(),
        Err(err) => DispatchError::from(err).into_http_response(),
    }
}
