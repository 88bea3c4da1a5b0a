//! Shared handle on the admin-started word round.
//!
//! At most one round exists at a time. Starting a round replaces the previous
//! one wholesale, which is the only way its winner set is cleared.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;

use ginga_engine::errors::GameError;
use ginga_engine::round::{GlobalGuess, GlobalRound, PlayerId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GlobalRoundError {
    #[error("No global round is running")]
    NoActiveRound,
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Global round lock poisoned")]
    Poisoned,
}

/// What players may know about the running round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundInfo {
    pub id: u64,
    pub letters: usize,
    pub hint: Option<String>,
    pub winners: usize,
}

impl RoundInfo {
    fn of(round: &GlobalRound) -> Self {
        Self {
            id: round.id(),
            letters: round.secret_len(),
            hint: round.hint().map(str::to_string),
            winners: round.winner_count(),
        }
    }
}

#[derive(Debug, Default)]
pub struct GlobalRoundHandle {
    current: RwLock<Option<GlobalRound>>,
    next_id: AtomicU64,
}

impl GlobalRoundHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any running round with a new one.
    pub fn start(&self, word: &str, hint: Option<String>) -> Result<RoundInfo, GlobalRoundError> {
        let id = self.next_id.fetch_add(1, Ordering::AcqRel) + 1;
        let round = GlobalRound::new(id, word, hint)?;
        let info = RoundInfo::of(&round);
        let previous = self.write()?.replace(round);
        tracing::info!(
            round_id = id,
            letters = info.letters,
            has_hint = info.hint.is_some(),
            replaced = previous.map(|r| r.id()),
            "global round started"
        );
        Ok(info)
    }

    pub fn info(&self) -> Result<Option<RoundInfo>, GlobalRoundError> {
        Ok(self.read()?.as_ref().map(RoundInfo::of))
    }

    pub fn has_solved(&self, player: PlayerId) -> Result<bool, GlobalRoundError> {
        match self.read()?.as_ref() {
            Some(round) => Ok(round.has_solved(player)),
            None => Err(GlobalRoundError::NoActiveRound),
        }
    }

    pub fn guess(&self, player: PlayerId, input: &str) -> Result<GlobalGuess, GlobalRoundError> {
        let mut guard = self.write()?;
        let round = guard.as_mut().ok_or(GlobalRoundError::NoActiveRound)?;
        let outcome = round.guess(player, input)?;
        if outcome == GlobalGuess::Solved {
            tracing::info!(round_id = round.id(), user_id = player, "global round solved");
        }
        Ok(outcome)
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Option<GlobalRound>>, GlobalRoundError> {
        self.current.read().map_err(|_| GlobalRoundError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Option<GlobalRound>>, GlobalRoundError> {
        self.current.write().map_err(|_| GlobalRoundError::Poisoned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guessing_without_a_round_is_refused() {
        let handle = GlobalRoundHandle::new();
        assert_eq!(handle.guess(1, "crane"), Err(GlobalRoundError::NoActiveRound));
        assert_eq!(handle.info(), Ok(None));
    }

    #[test]
    fn new_round_clears_winners() {
        let handle = GlobalRoundHandle::new();
        let first = handle.start("Crane", Some("a bird".into())).unwrap();
        assert_eq!(first.letters, 5);
        assert_eq!(handle.guess(1, "crane"), Ok(GlobalGuess::Solved));
        assert_eq!(handle.guess(1, "crane"), Ok(GlobalGuess::AlreadySolved));
        assert_eq!(handle.has_solved(1), Ok(true));

        let second = handle.start("crane", None).unwrap();
        assert!(second.id > first.id);
        assert_eq!(handle.has_solved(1), Ok(false));
        assert_eq!(handle.guess(1, "crane"), Ok(GlobalGuess::Solved));
    }

    #[test]
    fn invalid_word_keeps_previous_round() {
        let handle = GlobalRoundHandle::new();
        handle.start("ocean", None).unwrap();
        assert!(handle.start("two words", None).is_err());
        assert_eq!(handle.info().unwrap().unwrap().letters, 5);
    }
}
