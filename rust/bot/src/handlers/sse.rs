use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::StreamExt;
use warp::http;
use warp::reply::{self, Response};
use warp::sse;
use warp::Reply;

use ginga_engine::round::PlayerId;

use crate::events::{Delivery, DeliveryBus, Subscription};

/// Streams broadcasts and round announcements addressed to `user` for as long
/// as the connection stays open.
pub async fn stream_deliveries(user: PlayerId, bus: Arc<DeliveryBus>) -> Response {
    let subscription = bus.subscribe(user);
    let stream = subscription_stream(subscription);
    let keep_alive = sse::keep_alive()
        .interval(Duration::from_secs(15))
        .text(":keep-alive\n");

    let reply = sse::reply(keep_alive.stream(stream));
    reply::with_header(reply, http::header::CACHE_CONTROL, "no-cache").into_response()
}

fn subscription_stream(
    subscription: Subscription,
) -> impl tokio_stream::Stream<Item = Result<sse::Event, Infallible>> {
    let mut subscription = subscription;
    let (_, placeholder_rx) = mpsc::channel(1);
    let receiver = std::mem::replace(&mut subscription.receiver, placeholder_rx);
    let subscription = Arc::new(subscription);

    ReceiverStream::new(receiver).map(move |delivery| {
        let _alive = Arc::clone(&subscription);
        Ok(render_delivery(&delivery))
    })
}

fn render_delivery(delivery: &Delivery) -> sse::Event {
    match serde_json::to_string(delivery) {
        Ok(json) => sse::Event::default().event("delivery").data(json),
        Err(err) => {
            let fallback = serde_json::json!({
                "type": "error",
                "message": format!("failed to serialize delivery: {err}")
            })
            .to_string();
            sse::Event::default().event("delivery").data(fallback)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{DeliveryKind, Outbox};
    use crate::message::Reply as BotReply;

    #[tokio::test]
    async fn stream_yields_deliveries_and_holds_subscription() {
        let bus = DeliveryBus::new();
        let stream = subscription_stream(bus.subscribe(4));
        tokio::pin!(stream);
        assert!(bus.is_connected(4));

        let delivery = Delivery {
            kind: DeliveryKind::GlobalRound,
            reply: BotReply::text("new round"),
        };
        bus.deliver(4, &delivery).unwrap();
        assert!(stream.next().await.is_some());
    }
}
