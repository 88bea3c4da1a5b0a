//! State of the admin-started word round shared by every user.

use std::collections::HashSet;

use serde::Serialize;

use crate::errors::GameError;
use crate::word::{judge, validate_secret, Mark, Verdict};

/// Chat user identifier.
pub type PlayerId = i64;

#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum GlobalGuess {
    /// First correct guess by this player; pays the reward
    Solved,
    /// Correct again; pays nothing
    AlreadySolved,
    Marks { marks: Vec<Mark> },
}

/// One global round. Replaced wholesale when an admin starts the next one,
/// which is the only way the winner set is cleared.
#[derive(Debug, Clone)]
pub struct GlobalRound {
    id: u64,
    secret: String,
    hint: Option<String>,
    winners: HashSet<PlayerId>,
}

impl GlobalRound {
    pub fn new(id: u64, word: &str, hint: Option<String>) -> Result<Self, GameError> {
        let secret = validate_secret(word)?;
        let hint = hint
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty());
        Ok(Self {
            id,
            secret,
            hint,
            winners: HashSet::new(),
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    pub fn secret_len(&self) -> usize {
        self.secret.chars().count()
    }

    pub fn has_solved(&self, player: PlayerId) -> bool {
        self.winners.contains(&player)
    }

    pub fn winner_count(&self) -> usize {
        self.winners.len()
    }

    /// Scores a guess and records the player as a winner on first success.
    pub fn guess(&mut self, player: PlayerId, input: &str) -> Result<GlobalGuess, GameError> {
        match judge(input, &self.secret)? {
            Verdict::Solved => {
                if self.winners.insert(player) {
                    Ok(GlobalGuess::Solved)
                } else {
                    Ok(GlobalGuess::AlreadySolved)
                }
            }
            Verdict::Marks(marks) => Ok(GlobalGuess::Marks { marks }),
        }
    }
}
