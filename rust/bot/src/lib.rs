//! # ginga_bot: Casino Chat Bot
//!
//! Turns chat updates (commands, free text, button presses) into replies and
//! ledger movements. The [`Dispatcher`] is transport-neutral; [`BotServer`]
//! exposes it over HTTP with an SSE channel for broadcasts.

pub mod broadcast;
pub mod conversation;
pub mod dispatcher;
pub mod errors;
pub mod events;
pub mod global_round;
pub mod handlers;
pub mod logging;
pub mod menus;
pub mod message;
pub mod server;
pub mod settings;

pub use broadcast::{broadcast, BroadcastReport};
pub use conversation::{ActiveGame, BetGame, ConversationState, Conversations};
pub use dispatcher::{DispatchError, Dispatcher, DispatcherConfig};
pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use events::{Delivery, DeliveryBus, DeliveryError, DeliveryKind, Outbox, Subscription};
pub use global_round::{GlobalRoundError, GlobalRoundHandle, RoundInfo};
pub use logging::{init_logging, init_test_logging, LogEntry, TestLogSubscriber};
pub use menus::MenuContext;
pub use message::{Button, ButtonTarget, Event, Incoming, Reply, User};
pub use server::{AppContext, BotServer, ServerConfig, ServerError, ServerHandle};
pub use settings::{
    load, load_with_sources, ResolvedSettings, Settings, SettingsError, ValueSource,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_provides_shared_components() {
        let ctx = AppContext::new_for_tests().unwrap();

        assert_eq!(ctx.bus().subscriber_count(), 0);
        assert_eq!(ctx.dispatcher().conversations().active(), 0);
        assert_eq!(ctx.ledger().user_count().unwrap(), 0);
    }
}
