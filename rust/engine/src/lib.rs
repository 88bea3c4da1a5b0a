//! # ginga-engine: Mini-game Rules Core
//!
//! Deterministic rules for the games that move a player's game balance:
//! blackjack against a dealer standing on 17, a three-reel slot machine, and a
//! word-guessing game with per-letter feedback. Nothing here touches storage
//! or the chat transport.
//!
//! ## Core Modules
//!
//! - [`cards`] - Card representation (Suit, Rank, Card) and deck construction
//! - [`deck`] - Deterministic deck shuffling with ChaCha20 RNG
//! - [`hand`] - Blackjack hand value with ace reduction
//! - [`blackjack`] - Player/dealer round state machine
//! - [`slots`] - Reel draws and the payout table
//! - [`word`] - Guess scoring and the private word round
//! - [`words`] - Built-in word catalogue
//! - [`round`] - The shared, admin-started word round
//! - [`game`] - The round contract and settlements
//! - [`rules`] - Bet validation
//! - [`errors`] - Error types for game operations
//!
//! ## Quick Start
//!
//! ```rust
//! use ginga_engine::blackjack::{BlackjackRound, Phase};
//! use ginga_engine::game::Round;
//!
//! let mut round = BlackjackRound::start(100, 42).unwrap();
//! assert_eq!(round.phase(), Phase::PlayerTurn);
//!
//! round.stand().unwrap();
//! let settlement = round.settlement().unwrap();
//! println!("net: {}", settlement.net());
//! ```
//!
//! ## Guess Feedback
//!
//! ```rust
//! use ginga_engine::word::{render_marks, score_guess};
//!
//! let marks = score_guess("alpha", "apple").unwrap();
//! assert_eq!(render_marks(&marks), "🟩 🟧 🟩 🟥 🟥");
//! ```

pub mod blackjack;
pub mod cards;
pub mod deck;
pub mod errors;
pub mod game;
pub mod hand;
pub mod round;
pub mod rules;
pub mod slots;
pub mod word;
pub mod words;
