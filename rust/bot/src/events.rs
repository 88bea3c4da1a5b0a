//! Out-of-band delivery to users who are not the sender of the current
//! update: broadcasts and global round announcements.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use thiserror::Error;
use tokio::sync::mpsc;

use ginga_engine::round::PlayerId;

use crate::message::Reply;

// Slow readers lose messages rather than stall a broadcast
const DELIVERY_CHANNEL_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryKind {
    Broadcast,
    GlobalRound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Delivery {
    pub kind: DeliveryKind,
    pub reply: Reply,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeliveryError {
    #[error("User {0} is not connected")]
    NotConnected(PlayerId),
    #[error("Delivery queue of user {0} is full")]
    QueueFull(PlayerId),
    #[error("Delivery to user {user} failed: {reason}")]
    Rejected { user: PlayerId, reason: String },
}

/// Anything that can push a message to a user outside a request/response
/// exchange.
pub trait Outbox: Send + Sync {
    fn deliver(&self, user: PlayerId, delivery: &Delivery) -> Result<(), DeliveryError>;
}

pub type DeliverySender = mpsc::Sender<Delivery>;
pub type DeliveryReceiver = mpsc::Receiver<Delivery>;

/// A live subscription; dropping it unsubscribes.
pub struct Subscription {
    bus: DeliveryBus,
    user: PlayerId,
    subscriber_id: usize,
    pub receiver: DeliveryReceiver,
}

impl Subscription {
    pub fn user(&self) -> PlayerId {
        self.user
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus.unsubscribe(self.user, self.subscriber_id);
    }
}

/// Per-user fan-out of deliveries to every open connection of that user.
#[derive(Debug, Clone, Default)]
pub struct DeliveryBus {
    inner: Arc<DeliveryBusInner>,
}

#[derive(Debug, Default)]
struct DeliveryBusInner {
    subscribers: RwLock<HashMap<PlayerId, Vec<(usize, DeliverySender)>>>,
    next_id: AtomicUsize,
}

impl DeliveryBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, user: PlayerId) -> Subscription {
        let (tx, rx) = mpsc::channel(DELIVERY_CHANNEL_BUFFER);
        let id = self.inner.next_id.fetch_add(1, Ordering::AcqRel);
        {
            let mut guard = match self.inner.subscribers.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            guard.entry(user).or_default().push((id, tx));
        }
        tracing::info!(user_id = user, subscriber_id = id, "user subscribed to deliveries");
        Subscription {
            bus: self.clone(),
            user,
            subscriber_id: id,
            receiver: rx,
        }
    }

    pub fn unsubscribe(&self, user: PlayerId, subscriber_id: usize) {
        self.remove_subscribers(user, &[subscriber_id]);
    }

    pub fn subscriber_count(&self) -> usize {
        match self.inner.subscribers.read() {
            Ok(guard) => guard.values().map(Vec::len).sum(),
            Err(poisoned) => poisoned.into_inner().values().map(Vec::len).sum(),
        }
    }

    pub fn is_connected(&self, user: PlayerId) -> bool {
        match self.inner.subscribers.read() {
            Ok(guard) => guard.contains_key(&user),
            Err(_) => false,
        }
    }

    fn senders(&self, user: PlayerId) -> Option<Vec<(usize, DeliverySender)>> {
        let guard = match self.inner.subscribers.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        guard.get(&user).cloned()
    }

    fn remove_subscribers(&self, user: PlayerId, ids: &[usize]) {
        let mut guard = match self.inner.subscribers.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(list) = guard.get_mut(&user) {
            list.retain(|(id, _)| !ids.contains(id));
            if list.is_empty() {
                guard.remove(&user);
            }
        }
    }
}

impl Outbox for DeliveryBus {
    /// Succeeds when at least one connection of `user` accepted the message.
    /// Closed connections are pruned on the way.
    fn deliver(&self, user: PlayerId, delivery: &Delivery) -> Result<(), DeliveryError> {
        let Some(list) = self.senders(user) else {
            return Err(DeliveryError::NotConnected(user));
        };

        let mut accepted = 0usize;
        let mut full = false;
        let mut closed = Vec::new();
        for (id, sender) in list {
            match sender.try_send(delivery.clone()) {
                Ok(()) => accepted += 1,
                Err(mpsc::error::TrySendError::Full(_)) => full = true,
                Err(mpsc::error::TrySendError::Closed(_)) => closed.push(id),
            }
        }
        if !closed.is_empty() {
            tracing::debug!(user_id = user, pruned = closed.len(), "pruned closed subscribers");
            self.remove_subscribers(user, &closed);
        }

        if accepted > 0 {
            Ok(())
        } else if full {
            Err(DeliveryError::QueueFull(user))
        } else {
            Err(DeliveryError::NotConnected(user))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(text: &str) -> Delivery {
        Delivery {
            kind: DeliveryKind::Broadcast,
            reply: Reply::text(text),
        }
    }

    #[test]
    fn dropping_subscription_unsubscribes() {
        let bus = DeliveryBus::new();
        {
            let _sub = bus.subscribe(1);
            assert_eq!(bus.subscriber_count(), 1);
            assert!(bus.is_connected(1));
        }
        assert_eq!(bus.subscriber_count(), 0);
        assert_eq!(bus.deliver(1, &note("x")), Err(DeliveryError::NotConnected(1)));
    }

    #[test]
    fn every_connection_of_a_user_receives() {
        let bus = DeliveryBus::new();
        let mut a = bus.subscribe(4);
        let mut b = bus.subscribe(4);
        let _other = bus.subscribe(5);

        bus.deliver(4, &note("hello")).unwrap();
        assert_eq!(a.receiver.try_recv().unwrap().reply.text, "hello");
        assert_eq!(b.receiver.try_recv().unwrap().reply.text, "hello");
    }

    #[test]
    fn closed_receiver_is_pruned() {
        let bus = DeliveryBus::new();
        let mut sub = bus.subscribe(2);
        sub.receiver.close();
        assert!(bus.deliver(2, &note("gone")).is_err());
        assert!(!bus.is_connected(2));
    }

    #[test]
    fn full_queue_is_reported() {
        let bus = DeliveryBus::new();
        let _sub = bus.subscribe(3);
        for _ in 0..DELIVERY_CHANNEL_BUFFER {
            bus.deliver(3, &note("spam")).unwrap();
        }
        assert_eq!(bus.deliver(3, &note("one more")), Err(DeliveryError::QueueFull(3)));
    }
}
