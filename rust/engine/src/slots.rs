//! Three-reel slot machine with a flat payout table.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::GameError;
use crate::game::{Round, Settlement};

pub const REELS: usize = 3;

/// Multiplier for two equal neighbouring reels.
pub const PAIR_MULTIPLIER: u64 = 2;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Symbol {
    Cherry,
    Lemon,
    Orange,
    Watermelon,
    Grapes,
    Strawberry,
    Bell,
    Diamond,
    Seven,
}

pub const SYMBOLS: [Symbol; 9] = [
    Symbol::Cherry,
    Symbol::Lemon,
    Symbol::Orange,
    Symbol::Watermelon,
    Symbol::Grapes,
    Symbol::Strawberry,
    Symbol::Bell,
    Symbol::Diamond,
    Symbol::Seven,
];

impl Symbol {
    pub fn glyph(self) -> &'static str {
        match self {
            Symbol::Cherry => "🍒",
            Symbol::Lemon => "🍋",
            Symbol::Orange => "🍊",
            Symbol::Watermelon => "🍉",
            Symbol::Grapes => "🍇",
            Symbol::Strawberry => "🍓",
            Symbol::Bell => "🔔",
            Symbol::Diamond => "💎",
            Symbol::Seven => "7️⃣",
        }
    }

    /// Multiplier when all three reels show this symbol.
    pub fn triple_multiplier(self) -> u64 {
        match self {
            Symbol::Seven => 10,
            Symbol::Diamond => 7,
            _ => 5,
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.glyph())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    Jackpot,
    Pair,
    Miss,
}

pub fn classify(reels: &[Symbol; REELS]) -> LineKind {
    if reels[0] == reels[1] && reels[1] == reels[2] {
        LineKind::Jackpot
    } else if reels[0] == reels[1] || reels[1] == reels[2] {
        LineKind::Pair
    } else {
        LineKind::Miss
    }
}

/// Payout multiplier of a line; zero means the bet is lost.
pub fn multiplier(reels: &[Symbol; REELS]) -> u64 {
    match classify(reels) {
        LineKind::Jackpot => reels[0].triple_multiplier(),
        LineKind::Pair => PAIR_MULTIPLIER,
        LineKind::Miss => 0,
    }
}

/// Gross amount credited for `bet` on this line.
///
/// ```
/// use ginga_engine::slots::{payout, Symbol};
///
/// assert_eq!(payout(&[Symbol::Diamond; 3], 10), 70);
/// assert_eq!(payout(&[Symbol::Bell, Symbol::Bell, Symbol::Lemon], 10), 20);
/// assert_eq!(payout(&[Symbol::Bell, Symbol::Lemon, Symbol::Bell], 10), 0);
/// ```
pub fn payout(reels: &[Symbol; REELS], bet: u64) -> u64 {
    bet.saturating_mul(multiplier(reels))
}

/// Draws each reel uniformly from [`SYMBOLS`], with replacement.
pub fn spin<R: Rng + ?Sized>(rng: &mut R) -> [Symbol; REELS] {
    let mut reels = [Symbol::Cherry; REELS];
    for reel in reels.iter_mut() {
        *reel = SYMBOLS[rng.random_range(0..SYMBOLS.len())];
    }
    reels
}

pub fn format_line(reels: &[Symbol; REELS]) -> String {
    reels
        .iter()
        .map(|s| format!("[{}]", s))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Pulling the lever is the only thing a player can do.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Pull;

#[derive(Debug)]
pub struct SlotRound {
    bet: u64,
    rng: ChaCha20Rng,
    reels: Option<[Symbol; REELS]>,
}

impl SlotRound {
    pub fn new(bet: u64, seed: u64) -> Self {
        Self {
            bet,
            rng: ChaCha20Rng::seed_from_u64(seed),
            reels: None,
        }
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn reels(&self) -> Option<[Symbol; REELS]> {
        self.reels
    }
}

impl Round for SlotRound {
    type Action = Pull;
    type Step = [Symbol; REELS];

    fn apply(&mut self, _action: Pull) -> Result<[Symbol; REELS], GameError> {
        if self.reels.is_some() {
            return Err(GameError::RoundResolved);
        }
        let reels = spin(&mut self.rng);
        self.reels = Some(reels);
        Ok(reels)
    }

    fn is_resolved(&self) -> bool {
        self.reels.is_some()
    }

    fn settlement(&self) -> Option<Settlement> {
        self.reels
            .map(|r| Settlement::new(self.bet, payout(&r, self.bet)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_multipliers_rank_jackpots() {
        assert_eq!(multiplier(&[Symbol::Seven; 3]), 10);
        assert_eq!(multiplier(&[Symbol::Diamond; 3]), 7);
        assert_eq!(multiplier(&[Symbol::Cherry; 3]), 5);
    }

    #[test]
    fn only_adjacent_pairs_pay() {
        use Symbol::*;
        assert_eq!(classify(&[Lemon, Lemon, Bell]), LineKind::Pair);
        assert_eq!(classify(&[Bell, Lemon, Lemon]), LineKind::Pair);
        assert_eq!(classify(&[Lemon, Bell, Lemon]), LineKind::Miss);
    }

    #[test]
    fn round_spins_once() {
        let mut round = SlotRound::new(10, 3);
        assert!(round.settlement().is_none());
        let reels = round.apply(Pull).unwrap();
        assert_eq!(round.reels(), Some(reels));
        assert_eq!(round.apply(Pull), Err(GameError::RoundResolved));
        let s = round.settlement().unwrap();
        assert_eq!(s.stake, 10);
        assert_eq!(s.payout, payout(&reels, 10));
    }

    #[test]
    fn format_line_brackets_each_reel() {
        assert_eq!(format_line(&[Symbol::Diamond; 3]), "[💎] [💎] [💎]");
    }
}
