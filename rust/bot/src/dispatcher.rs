//! Transport-neutral request/response core of the bot.
//!
//! Every update goes through [`Dispatcher::handle`]: the user's conversation
//! state is taken out, the event is applied to it, and the successor state is
//! stored back. Answers for the sender come back as the return value; anything
//! addressed to other users leaves through the [`Outbox`].

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error;
use warp::http::StatusCode;

use ginga_engine::blackjack::{BlackjackRound, Move};
use ginga_engine::errors::GameError;
use ginga_engine::game::{GameKind, Round, Settlement};
use ginga_engine::round::{GlobalGuess, PlayerId};
use ginga_engine::rules::validate_bet;
use ginga_engine::slots::{Pull, SlotRound};
use ginga_engine::word::{validate_secret, Verdict, WordRound};
use ginga_engine::words;
use ginga_store::{Ledger, StoreError};

use crate::broadcast::{broadcast, BroadcastReport};
use crate::conversation::{ActiveGame, BetGame, ConversationState, Conversations};
use crate::errors::{ErrorSeverity, IntoErrorResponse};
use crate::events::{Delivery, DeliveryKind, Outbox};
use crate::global_round::{GlobalRoundError, GlobalRoundHandle};
use crate::menus::{self, MenuContext};
use crate::message::{Event, Incoming, Reply, User};
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Round(#[from] GlobalRoundError),
    #[error("Conversation state lock poisoned")]
    StatePoisoned,
    #[error("Random source lock poisoned")]
    RngPoisoned,
}

impl IntoErrorResponse for DispatchError {
    fn status_code(&self) -> StatusCode {
        match self {
            DispatchError::Store(StoreError::UnknownUser(_)) => StatusCode::NOT_FOUND,
            DispatchError::Store(StoreError::InsufficientFunds { .. }) => StatusCode::CONFLICT,
            DispatchError::Store(e) if e.is_busy() => StatusCode::SERVICE_UNAVAILABLE,
            DispatchError::Game(e) if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            DispatchError::Store(StoreError::UnknownUser(_)) => "unknown_user",
            DispatchError::Store(StoreError::InsufficientFunds { .. }) => "insufficient_funds",
            DispatchError::Store(_) => "storage_error",
            DispatchError::Game(_) => "game_error",
            DispatchError::Round(_) => "global_round_error",
            DispatchError::StatePoisoned | DispatchError::RngPoisoned => "state_poisoned",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            DispatchError::Store(StoreError::UnknownUser(id)) => {
                Some(serde_json::json!({ "user_id": id }))
            }
            _ => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            DispatchError::StatePoisoned | DispatchError::RngPoisoned => ErrorSeverity::Critical,
            DispatchError::Round(GlobalRoundError::Poisoned) => ErrorSeverity::Critical,
            _ if self.status_code().is_server_error() => ErrorSeverity::Server,
            _ => ErrorSeverity::Client,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DispatcherConfig {
    pub admin_id: Option<PlayerId>,
    pub word_reward: u64,
    pub seed: Option<u64>,
    pub menus: MenuContext,
}

impl DispatcherConfig {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            admin_id: settings.admin_id,
            word_reward: settings.word_reward,
            seed: settings.seed,
            menus: MenuContext {
                bot_username: settings.bot_username.clone(),
                channel: settings.channel_handle().to_string(),
                daily_bonus: settings.daily_bonus,
            },
        }
    }
}

type Step = (ConversationState, Vec<Reply>);

pub struct Dispatcher {
    config: DispatcherConfig,
    ledger: Arc<Ledger>,
    conversations: Conversations,
    global: Arc<GlobalRoundHandle>,
    outbox: Arc<dyn Outbox>,
    rng: Mutex<ChaCha20Rng>,
    today: fn() -> NaiveDate,
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("conversations", &self.conversations.active())
            .finish_non_exhaustive()
    }
}

fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

impl Dispatcher {
    pub fn new(
        config: DispatcherConfig,
        ledger: Arc<Ledger>,
        global: Arc<GlobalRoundHandle>,
        outbox: Arc<dyn Outbox>,
    ) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        Self {
            config,
            ledger,
            conversations: Conversations::new(),
            global,
            outbox,
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
            today: local_today,
        }
    }

    /// Replaces the calendar used for daily bonus claims.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn ledger(&self) -> &Arc<Ledger> {
        &self.ledger
    }

    pub fn global_round(&self) -> &Arc<GlobalRoundHandle> {
        &self.global
    }

    pub fn conversations(&self) -> &Conversations {
        &self.conversations
    }

    /// Handles one update. Failures are logged and answered with a generic
    /// apology; the user's conversation falls back to idle.
    pub fn handle(&self, incoming: Incoming) -> Vec<Reply> {
        let user_id = incoming.user.id;
        match self.try_handle(incoming) {
            Ok(replies) => replies,
            Err(e) => {
                tracing::error!(user_id, error = %e, "update failed");
                vec![menus::try_again_later()]
            }
        }
    }

    pub fn try_handle(&self, incoming: Incoming) -> Result<Vec<Reply>, DispatchError> {
        let Incoming { user, event } = incoming;
        tracing::debug!(user_id = user.id, event = ?event, "update received");

        let is_start = matches!(&event, Event::Command { name, .. } if name == "start");
        if !is_start {
            self.ledger.ensure_user(user.id, &user.name)?;
        }

        let state = self.conversations.take(user.id)?;
        let (next, replies) = match event {
            Event::Command { name, args } => self.on_command(&user, state, &name, &args)?,
            Event::Text(text) => self.on_text(&user, state, &text)?,
            Event::Button(data) => self.on_button(&user, state, &data)?,
        };
        tracing::trace!(user_id = user.id, state = next.name(), "conversation advanced");
        self.conversations.put(user.id, next)?;
        Ok(replies)
    }

    fn is_admin(&self, user: PlayerId) -> bool {
        self.config.admin_id == Some(user)
    }

    fn rng(&self) -> Result<MutexGuard<'_, ChaCha20Rng>, DispatchError> {
        self.rng.lock().map_err(|_| DispatchError::RngPoisoned)
    }

    fn next_seed(&self) -> Result<u64, DispatchError> {
        Ok(self.rng()?.random())
    }

    fn on_command(
        &self,
        user: &User,
        state: ConversationState,
        name: &str,
        args: &str,
    ) -> Result<Step, DispatchError> {
        match name {
            "start" => self.start(user, args),
            "admin" | "dupe" | "gamewordly" if !self.is_admin(user.id) => {
                tracing::debug!(user_id = user.id, command = name, "admin command ignored");
                Ok((state, Vec::new()))
            }
            "admin" => Ok((ConversationState::AwaitingBroadcast, vec![menus::admin_panel()])),
            "dupe" => self.dupe(user, state, args),
            "gamewordly" => Ok((
                ConversationState::AwaitingGlobalWord,
                vec![menus::ask_global_word()],
            )),
            _ => Ok((state, vec![menus::main_menu(&self.config.menus)])),
        }
    }

    fn on_button(
        &self,
        user: &User,
        state: ConversationState,
        data: &str,
    ) -> Result<Step, DispatchError> {
        match data {
            menus::PROFILE => {
                abandon(user.id, &state);
                Ok((ConversationState::Idle, vec![self.profile(user)?]))
            }
            menus::GAMES => {
                abandon(user.id, &state);
                Ok((ConversationState::Idle, vec![menus::games()]))
            }
            menus::HINTS => {
                abandon(user.id, &state);
                Ok((ConversationState::Idle, vec![menus::hints(&self.config.menus)]))
            }
            menus::DAILY_BONUS => {
                abandon(user.id, &state);
                self.daily_bonus(user)
            }
            menus::BLACKJACK => self.ask_bet(user, state, BetGame::Blackjack),
            menus::SLOTS => self.ask_bet(user, state, BetGame::Slots),
            menus::WORD_GAME => {
                abandon(user.id, &state);
                self.start_word_round()
            }
            menus::HIT | menus::STAND => {
                let mv = if data == menus::HIT { Move::Hit } else { Move::Stand };
                match state {
                    ConversationState::Playing(ActiveGame::Blackjack(round)) => {
                        self.blackjack_move(user, round, mv)
                    }
                    other => Ok((other, vec![menus::no_blackjack()])),
                }
            }
            menus::JOIN_GLOBAL => self.join_global(user, state),
            menus::ADD_HINT | menus::NO_HINT => match state {
                ConversationState::AwaitingHintDecision { word } if self.is_admin(user.id) => {
                    if data == menus::ADD_HINT {
                        Ok((ConversationState::AwaitingHint { word }, vec![menus::ask_hint()]))
                    } else {
                        self.start_global_round(&word, None)
                    }
                }
                other => Ok((other, Vec::new())),
            },
            _ => {
                tracing::debug!(user_id = user.id, data, "unknown button");
                Ok((state, vec![menus::main_menu(&self.config.menus)]))
            }
        }
    }

    fn on_text(
        &self,
        user: &User,
        state: ConversationState,
        text: &str,
    ) -> Result<Step, DispatchError> {
        match state {
            ConversationState::Idle => {
                Ok((ConversationState::Idle, vec![menus::main_menu(&self.config.menus)]))
            }
            ConversationState::AwaitingBet(game) => self.place_bet(user, game, text),
            ConversationState::Playing(ActiveGame::Blackjack(round)) => {
                let table = menus::blackjack_table(&round);
                Ok((ConversationState::Playing(ActiveGame::Blackjack(round)), vec![table]))
            }
            ConversationState::Playing(ActiveGame::Word(round)) => {
                self.word_guess(user, round, text)
            }
            ConversationState::GlobalWord => self.global_guess(user, text),
            ConversationState::AwaitingBroadcast if self.is_admin(user.id) => {
                self.run_broadcast(text)
            }
            ConversationState::AwaitingGlobalWord if self.is_admin(user.id) => {
                match validate_secret(text) {
                    Ok(word) => Ok((
                        ConversationState::AwaitingHintDecision { word },
                        vec![menus::ask_hint_decision()],
                    )),
                    Err(_) => Ok((
                        ConversationState::AwaitingGlobalWord,
                        vec![menus::invalid_global_word()],
                    )),
                }
            }
            state @ ConversationState::AwaitingHintDecision { .. } => {
                Ok((state, vec![menus::ask_hint_decision()]))
            }
            ConversationState::AwaitingHint { word } if self.is_admin(user.id) => {
                self.start_global_round(&word, Some(text.to_string()))
            }
            _ => Ok((ConversationState::Idle, vec![menus::main_menu(&self.config.menus)])),
        }
    }

    fn start(&self, user: &User, args: &str) -> Result<Step, DispatchError> {
        let arg = args.trim();
        let referrer = if !arg.is_empty() && arg.chars().all(|c| c.is_ascii_digit()) {
            arg.parse::<PlayerId>().ok()
        } else {
            None
        };
        let registration = {
            let mut rng = self.rng()?;
            self.ledger
                .register_with_rng(user.id, &user.name, referrer, &mut *rng)?
        };
        if registration.created {
            tracing::info!(user_id = user.id, referrer = ?referrer, "new user");
        }
        Ok((ConversationState::Idle, vec![self.profile(user)?]))
    }

    fn profile(&self, user: &User) -> Result<Reply, DispatchError> {
        let profile = self.ledger.profile(user.id)?;
        Ok(menus::profile(&self.config.menus, &user.name, &profile))
    }

    fn daily_bonus(&self, user: &User) -> Result<Step, DispatchError> {
        if self.ledger.claim_daily_bonus(user.id, (self.today)())? {
            Ok((
                ConversationState::Idle,
                vec![
                    menus::bonus_claimed(self.ledger.daily_bonus()),
                    self.profile(user)?,
                ],
            ))
        } else {
            Ok((ConversationState::Idle, vec![menus::bonus_already_claimed()]))
        }
    }

    fn ask_bet(
        &self,
        user: &User,
        state: ConversationState,
        game: BetGame,
    ) -> Result<Step, DispatchError> {
        abandon(user.id, &state);
        let balance = self.ledger.balance(user.id)?;
        Ok((
            ConversationState::AwaitingBet(game),
            vec![menus::bet_prompt(game, balance)],
        ))
    }

    fn place_bet(&self, user: &User, game: BetGame, text: &str) -> Result<Step, DispatchError> {
        let retry = |reply: Reply| -> Result<Step, DispatchError> {
            Ok((ConversationState::AwaitingBet(game), vec![reply]))
        };

        let balance = self.ledger.balance(user.id)?;
        let bet = match validate_bet(text, balance) {
            Ok(bet) => bet,
            Err(GameError::NotANumber(_)) => return retry(menus::not_a_number()),
            Err(GameError::NonPositiveBet) => return retry(menus::non_positive_bet()),
            Err(GameError::InsufficientFunds { .. }) => return retry(menus::insufficient_funds()),
            Err(e) => return Err(e.into()),
        };
        match self.ledger.debit(user.id, bet) {
            Ok(_) => {}
            Err(StoreError::InsufficientFunds { .. }) => return retry(menus::insufficient_funds()),
            Err(e) => return Err(e.into()),
        }
        tracing::info!(user_id = user.id, game = ?game.kind(), bet, "bet placed");

        match game {
            BetGame::Blackjack => {
                let round = BlackjackRound::start(bet, self.next_seed()?)?;
                let table = menus::blackjack_table(&round);
                Ok((
                    ConversationState::Playing(ActiveGame::Blackjack(round)),
                    vec![table],
                ))
            }
            BetGame::Slots => {
                let mut round = SlotRound::new(bet, self.next_seed()?);
                let reels = round.apply(Pull)?;
                let settlement = round.settlement().ok_or(GameError::RoundResolved)?;
                let balance = self.settle(user.id, GameKind::Slots, settlement)?;
                Ok((
                    ConversationState::Idle,
                    vec![menus::slots_result(&reels, bet, settlement.payout, balance)],
                ))
            }
        }
    }

    /// Credits the payout of a finished round and returns the new balance.
    fn settle(
        &self,
        user: PlayerId,
        kind: GameKind,
        settlement: Settlement,
    ) -> Result<i64, DispatchError> {
        let balance = if settlement.payout > 0 {
            let payout = i64::try_from(settlement.payout)
                .map_err(|_| StoreError::AmountOutOfRange(settlement.payout))?;
            self.ledger.add_balance(user, payout)?
        } else {
            self.ledger.balance(user)?
        };
        tracing::info!(
            user_id = user,
            game = ?kind,
            stake = settlement.stake,
            payout = settlement.payout,
            net = settlement.net(),
            "round settled"
        );
        Ok(balance)
    }

    fn blackjack_move(
        &self,
        user: &User,
        mut round: BlackjackRound,
        mv: Move,
    ) -> Result<Step, DispatchError> {
        round.apply(mv)?;
        match round.settlement() {
            Some(settlement) => {
                let balance = self.settle(user.id, GameKind::Blackjack, settlement)?;
                Ok((
                    ConversationState::Idle,
                    vec![menus::blackjack_result(&round, balance)],
                ))
            }
            None => {
                let table = menus::blackjack_table(&round);
                Ok((
                    ConversationState::Playing(ActiveGame::Blackjack(round)),
                    vec![table],
                ))
            }
        }
    }

    fn start_word_round(&self) -> Result<Step, DispatchError> {
        let (category, word) = {
            let mut rng = self.rng()?;
            words::pick(&mut *rng)
        };
        let round = WordRound::new(category, word, self.config.word_reward)?;
        let reply = menus::word_started(round.category(), round.len());
        Ok((ConversationState::Playing(ActiveGame::Word(round)), vec![reply]))
    }

    fn word_guess(
        &self,
        user: &User,
        mut round: WordRound,
        text: &str,
    ) -> Result<Step, DispatchError> {
        match round.apply(text.to_string()) {
            Ok(Verdict::Solved) => {
                let settlement = round.settlement().ok_or(GameError::RoundResolved)?;
                self.settle(user.id, GameKind::Word, settlement)?;
                Ok((
                    ConversationState::Idle,
                    vec![menus::word_solved(settlement.payout)],
                ))
            }
            Ok(Verdict::Marks(marks)) => Ok((
                ConversationState::Playing(ActiveGame::Word(round)),
                vec![menus::word_marks(&marks)],
            )),
            Err(GameError::WrongLength { expected, .. }) => Ok((
                ConversationState::Playing(ActiveGame::Word(round)),
                vec![menus::wrong_length(expected)],
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn join_global(&self, user: &User, state: ConversationState) -> Result<Step, DispatchError> {
        match self.global.has_solved(user.id) {
            Err(GlobalRoundError::NoActiveRound) => Ok((state, vec![menus::global_over()])),
            Err(e) => Err(e.into()),
            Ok(true) => Ok((state, vec![menus::global_already_solved()])),
            Ok(false) => {
                abandon(user.id, &state);
                Ok((ConversationState::GlobalWord, vec![menus::global_prompt()]))
            }
        }
    }

    fn global_guess(&self, user: &User, text: &str) -> Result<Step, DispatchError> {
        match self.global.guess(user.id, text) {
            Ok(GlobalGuess::Solved) => {
                let reward = self.config.word_reward;
                self.settle(user.id, GameKind::Word, Settlement::new(0, reward))?;
                Ok((ConversationState::Idle, vec![menus::global_solved(reward)]))
            }
            Ok(GlobalGuess::AlreadySolved) => Ok((
                ConversationState::Idle,
                vec![menus::global_already_solved()],
            )),
            Ok(GlobalGuess::Marks { marks }) => Ok((
                ConversationState::GlobalWord,
                vec![menus::global_marks(&marks)],
            )),
            Err(GlobalRoundError::NoActiveRound) => {
                Ok((ConversationState::Idle, vec![menus::global_over()]))
            }
            Err(GlobalRoundError::Game(GameError::WrongLength { expected, .. })) => Ok((
                ConversationState::GlobalWord,
                vec![menus::wrong_length(expected)],
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn dupe(&self, user: &User, state: ConversationState, args: &str) -> Result<Step, DispatchError> {
        let amount: i64 = match args.trim().parse() {
            Ok(amount) => amount,
            Err(_) => return Ok((state, vec![menus::dupe_usage()])),
        };
        if amount <= 0 {
            return Ok((state, vec![menus::dupe_non_positive()]));
        }
        let balance = self.ledger.add_balance(user.id, amount)?;
        tracing::info!(user_id = user.id, amount, balance, "admin minted balance");
        Ok((state, vec![menus::dupe_done(amount as u64, balance)]))
    }

    fn run_broadcast(&self, text: &str) -> Result<Step, DispatchError> {
        let recipients = self.ledger.user_ids()?;
        let delivery = Delivery {
            kind: DeliveryKind::Broadcast,
            reply: Reply::text(text),
        };
        let started = menus::broadcast_started(recipients.len());
        let report = self.deliver_all(&recipients, &delivery);
        Ok((
            ConversationState::Idle,
            vec![started, menus::broadcast_finished(&report)],
        ))
    }

    fn start_global_round(&self, word: &str, hint: Option<String>) -> Result<Step, DispatchError> {
        let info = self.global.start(word, hint)?;
        let recipients = self.ledger.user_ids()?;
        let delivery = Delivery {
            kind: DeliveryKind::GlobalRound,
            reply: menus::global_announcement(info.letters, info.hint.as_deref()),
        };
        let report = self.deliver_all(&recipients, &delivery);
        Ok((
            ConversationState::Idle,
            vec![menus::global_started(info.hint.is_some(), &report)],
        ))
    }

    fn deliver_all(&self, recipients: &[PlayerId], delivery: &Delivery) -> BroadcastReport {
        broadcast(self.outbox.as_ref(), recipients, delivery)
    }
}

fn abandon(user: PlayerId, state: &ConversationState) {
    if let ConversationState::Playing(game) = state {
        tracing::debug!(user_id = user, game = ?game.kind(), "round abandoned");
    }
}
