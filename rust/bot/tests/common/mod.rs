#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use ginga_bot::{
    Delivery, DeliveryError, Dispatcher, DispatcherConfig, GlobalRoundHandle, Incoming, MenuContext,
    Outbox, Reply, User,
};
use ginga_engine::round::PlayerId;
use ginga_store::Ledger;

pub const ADMIN: PlayerId = 1;

/// Records every delivery; users listed in `unreachable` always fail.
#[derive(Default)]
pub struct RecordingOutbox {
    pub unreachable: HashSet<PlayerId>,
    pub delivered: Mutex<Vec<(PlayerId, Delivery)>>,
}

impl RecordingOutbox {
    pub fn failing(users: &[PlayerId]) -> Self {
        Self {
            unreachable: users.iter().copied().collect(),
            delivered: Mutex::new(Vec::new()),
        }
    }

    pub fn recipients(&self) -> Vec<PlayerId> {
        self.delivered.lock().unwrap().iter().map(|(u, _)| *u).collect()
    }
}

impl Outbox for RecordingOutbox {
    fn deliver(&self, user: PlayerId, delivery: &Delivery) -> Result<(), DeliveryError> {
        if self.unreachable.contains(&user) {
            return Err(DeliveryError::Rejected {
                user,
                reason: "bot was blocked by the user".into(),
            });
        }
        self.delivered.lock().unwrap().push((user, delivery.clone()));
        Ok(())
    }
}

pub fn config() -> DispatcherConfig {
    DispatcherConfig {
        admin_id: Some(ADMIN),
        word_reward: 50,
        seed: Some(2024),
        menus: MenuContext {
            bot_username: "ginga_casino_bot".into(),
            channel: "ginga_news".into(),
            daily_bonus: 100,
        },
    }
}

pub struct Harness {
    pub dispatcher: Dispatcher,
    pub outbox: Arc<RecordingOutbox>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_outbox(RecordingOutbox::default())
    }

    pub fn with_outbox(outbox: RecordingOutbox) -> Self {
        let outbox = Arc::new(outbox);
        let ledger = Arc::new(Ledger::open_in_memory().unwrap());
        let dispatcher = Dispatcher::new(
            config(),
            ledger,
            Arc::new(GlobalRoundHandle::new()),
            Arc::clone(&outbox) as Arc<dyn Outbox>,
        );
        Self { dispatcher, outbox }
    }

    pub fn user(id: PlayerId) -> User {
        User::new(id, format!("user{id}"))
    }

    pub fn start(&self, id: PlayerId, args: &str) -> Vec<Reply> {
        self.dispatcher
            .handle(Incoming::command(Self::user(id), "start", args))
    }

    pub fn command(&self, id: PlayerId, name: &str, args: &str) -> Vec<Reply> {
        self.dispatcher.handle(Incoming::command(Self::user(id), name, args))
    }

    pub fn text(&self, id: PlayerId, text: &str) -> Vec<Reply> {
        self.dispatcher.handle(Incoming::text(Self::user(id), text))
    }

    pub fn press(&self, id: PlayerId, data: &str) -> Vec<Reply> {
        self.dispatcher.handle(Incoming::button(Self::user(id), data))
    }

    pub fn balance(&self, id: PlayerId) -> i64 {
        self.dispatcher.ledger().balance(id).unwrap()
    }

    pub fn state(&self, id: PlayerId) -> &'static str {
        self.dispatcher.conversations().state_name(id).unwrap()
    }
}

pub fn only(replies: Vec<Reply>) -> Reply {
    assert_eq!(replies.len(), 1, "expected one reply, got {replies:?}");
    replies.into_iter().next().unwrap()
}
