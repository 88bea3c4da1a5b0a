use serde::Serialize;

use ginga_engine::round::PlayerId;

use crate::events::{Delivery, Outbox};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BroadcastReport {
    pub sent: usize,
    pub failed: usize,
}

impl BroadcastReport {
    pub fn total(&self) -> usize {
        self.sent + self.failed
    }
}

/// Delivers `delivery` to each recipient in turn. A failed recipient is
/// logged and counted; the loop always reaches the end of the list.
pub fn broadcast(outbox: &dyn Outbox, recipients: &[PlayerId], delivery: &Delivery) -> BroadcastReport {
    let mut report = BroadcastReport::default();
    for &user in recipients {
        match outbox.deliver(user, delivery) {
            Ok(()) => report.sent += 1,
            Err(e) => {
                report.failed += 1;
                tracing::warn!(recipient = user, kind = ?delivery.kind, error = %e, "delivery failed");
            }
        }
    }
    tracing::info!(
        kind = ?delivery.kind,
        sent = report.sent,
        failed = report.failed,
        "broadcast finished"
    );
    report
}
