use serde::{Deserialize, Serialize};

use crate::errors::GameError;

/// Money movement of a finished round.
///
/// The stake is debited when the bet is placed; the payout is credited once
/// the round resolves. A push pays back exactly the stake.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Amount taken from the balance when the round started
    pub stake: u64,
    /// Gross amount credited at resolution
    pub payout: u64,
}

impl Settlement {
    pub fn new(stake: u64, payout: u64) -> Self {
        Self { stake, payout }
    }

    /// Net change of the balance over the whole round.
    ///
    /// ```
    /// use ginga_engine::game::Settlement;
    ///
    /// assert_eq!(Settlement::new(100, 200).net(), 100);
    /// assert_eq!(Settlement::new(100, 100).net(), 0);
    /// assert_eq!(Settlement::new(100, 0).net(), -100);
    /// ```
    pub fn net(&self) -> i64 {
        self.payout as i64 - self.stake as i64
    }
}

/// Start/advance/resolve contract shared by every mini-game.
///
/// A round is created by the game's own constructor (which takes the bet and
/// the RNG seed), advanced with [`Round::apply`] until [`Round::is_resolved`]
/// is true, and then reports its [`Settlement`].
pub trait Round {
    /// What the player can do to the round
    type Action;
    /// What one action produced, for display
    type Step;

    fn apply(&mut self, action: Self::Action) -> Result<Self::Step, GameError>;

    fn is_resolved(&self) -> bool;

    /// `None` until the round is resolved.
    fn settlement(&self) -> Option<Settlement>;
}

/// Which mini-game a bet or round belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameKind {
    Blackjack,
    Slots,
    Word,
}

impl GameKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameKind::Blackjack => "blackjack",
            GameKind::Slots => "slots",
            GameKind::Word => "word",
        }
    }
}
