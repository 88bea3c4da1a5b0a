use thiserror::Error;

use crate::blackjack::Phase;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Not a number: {0:?}")]
    NotANumber(String),
    #[error("Bet must be greater than zero")]
    NonPositiveBet,
    #[error("Insufficient funds: bet {bet}, balance {balance}")]
    InsufficientFunds { bet: u64, balance: i64 },
    #[error("Guess must have {expected} letters, got {actual}")]
    WrongLength { expected: usize, actual: usize },
    #[error("Invalid secret word: {0:?}")]
    InvalidWord(String),
    #[error("Action not allowed in the {0:?} phase")]
    WrongPhase(Phase),
    #[error("Round already resolved")]
    RoundResolved,
    #[error("Deck exhausted")]
    DeckExhausted,
}

impl GameError {
    /// Input the player can simply retype: bad number, bad guess length.
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            GameError::NotANumber(_) | GameError::NonPositiveBet | GameError::WrongLength { .. }
        )
    }
}
