use serde::Serialize;
use warp::reply::Json;

use crate::server::AppContext;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    version: &'static str,
    subscribers: usize,
    global_round: bool,
}

/// Liveness plus a glance at the shared state. A poisoned round lock reports
/// no round rather than failing the probe.
pub fn health(context: &AppContext) -> Json {
    let global_round = context
        .dispatcher()
        .global_round()
        .info()
        .map(|info| info.is_some())
        .unwrap_or(false);
    warp::reply::json(&HealthBody {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        subscribers: context.bus().subscriber_count(),
        global_round,
    })
}
