//! Where each user is in a dialogue with the bot.

use std::collections::HashMap;
use std::sync::RwLock;

use ginga_engine::blackjack::BlackjackRound;
use ginga_engine::game::GameKind;
use ginga_engine::round::PlayerId;
use ginga_engine::word::WordRound;

use crate::dispatcher::DispatchError;

/// A round the user is in the middle of. Slots resolve on the bet itself and
/// never sit here.
#[derive(Debug)]
pub enum ActiveGame {
    Blackjack(BlackjackRound),
    Word(WordRound),
}

impl ActiveGame {
    pub fn kind(&self) -> GameKind {
        match self {
            ActiveGame::Blackjack(_) => GameKind::Blackjack,
            ActiveGame::Word(_) => GameKind::Word,
        }
    }
}

/// A game that starts by taking a bet. Word rounds are free and never ask.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum BetGame {
    Blackjack,
    Slots,
}

impl BetGame {
    pub fn kind(self) -> GameKind {
        match self {
            BetGame::Blackjack => GameKind::Blackjack,
            BetGame::Slots => GameKind::Slots,
        }
    }
}

#[derive(Debug, Default)]
pub enum ConversationState {
    #[default]
    Idle,
    AwaitingBet(BetGame),
    Playing(ActiveGame),
    /// Next text is a guess for the global round
    GlobalWord,
    AwaitingBroadcast,
    AwaitingGlobalWord,
    AwaitingHintDecision { word: String },
    AwaitingHint { word: String },
}

impl ConversationState {
    pub fn name(&self) -> &'static str {
        match self {
            ConversationState::Idle => "idle",
            ConversationState::AwaitingBet(_) => "awaiting_bet",
            ConversationState::Playing(ActiveGame::Blackjack(_)) => "blackjack",
            ConversationState::Playing(ActiveGame::Word(_)) => "word",
            ConversationState::GlobalWord => "global_word",
            ConversationState::AwaitingBroadcast => "awaiting_broadcast",
            ConversationState::AwaitingGlobalWord => "awaiting_global_word",
            ConversationState::AwaitingHintDecision { .. } => "awaiting_hint_decision",
            ConversationState::AwaitingHint { .. } => "awaiting_hint",
        }
    }
}

/// Conversation state per user. A handler takes the state out, works on it
/// and puts the successor back.
#[derive(Debug, Default)]
pub struct Conversations {
    states: RwLock<HashMap<PlayerId, ConversationState>>,
}

impl Conversations {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn take(&self, user: PlayerId) -> Result<ConversationState, DispatchError> {
        let mut guard = self
            .states
            .write()
            .map_err(|_| DispatchError::StatePoisoned)?;
        Ok(guard.remove(&user).unwrap_or_default())
    }

    pub fn put(&self, user: PlayerId, state: ConversationState) -> Result<(), DispatchError> {
        let mut guard = self
            .states
            .write()
            .map_err(|_| DispatchError::StatePoisoned)?;
        match state {
            ConversationState::Idle => {
                guard.remove(&user);
            }
            other => {
                guard.insert(user, other);
            }
        }
        Ok(())
    }

    pub fn state_name(&self, user: PlayerId) -> Result<&'static str, DispatchError> {
        let guard = self
            .states
            .read()
            .map_err(|_| DispatchError::StatePoisoned)?;
        Ok(guard.get(&user).map_or("idle", ConversationState::name))
    }

    /// Users with a non-idle conversation.
    pub fn active(&self) -> usize {
        self.states.read().map(|g| g.len()).unwrap_or(0)
    }
}
