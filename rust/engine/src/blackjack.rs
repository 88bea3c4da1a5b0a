//! Single-player blackjack against a dealer that stands on 17.
//!
//! A round moves through [`Phase::Dealing`] → [`Phase::PlayerTurn`] →
//! [`Phase::DealerTurn`] → [`Phase::Resolved`]. A player bust skips the dealer
//! turn entirely.

use serde::{Deserialize, Serialize};

use crate::cards::Card;
use crate::deck::Deck;
use crate::errors::GameError;
use crate::game::{Round, Settlement};
use crate::hand::{evaluate, hand_value, BLACKJACK};

/// The dealer stops drawing at this total, soft or hard.
pub const DEALER_STANDS_ON: u32 = 17;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Dealing,
    PlayerTurn,
    DealerTurn,
    Resolved,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Move {
    Hit,
    Stand,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Player went over 21; the dealer never plays
    Bust,
    Win,
    Lose,
    Push,
}

impl Outcome {
    /// Gross amount credited back for a resolved bet.
    pub fn payout(self, bet: u64) -> u64 {
        match self {
            Outcome::Win => bet.saturating_mul(2),
            Outcome::Push => bet,
            Outcome::Bust | Outcome::Lose => 0,
        }
    }
}

/// Whether the dealer takes another card.
pub fn dealer_should_draw(cards: &[Card]) -> bool {
    hand_value(cards) < DEALER_STANDS_ON
}

/// Compares final totals once the player has stood.
///
/// ```
/// use ginga_engine::blackjack::{resolve_totals, Outcome};
///
/// assert_eq!(resolve_totals(18, 22), Outcome::Win);
/// assert_eq!(resolve_totals(20, 19), Outcome::Win);
/// assert_eq!(resolve_totals(17, 19), Outcome::Lose);
/// assert_eq!(resolve_totals(19, 19), Outcome::Push);
/// ```
pub fn resolve_totals(player: u32, dealer: u32) -> Outcome {
    if player > BLACKJACK {
        Outcome::Bust
    } else if dealer > BLACKJACK || player > dealer {
        Outcome::Win
    } else if player < dealer {
        Outcome::Lose
    } else {
        Outcome::Push
    }
}

#[derive(Debug)]
pub struct BlackjackRound {
    deck: Deck,
    bet: u64,
    player: Vec<Card>,
    dealer: Vec<Card>,
    phase: Phase,
    outcome: Option<Outcome>,
}

impl BlackjackRound {
    /// Shuffles a fresh deck from `seed` and deals the opening hands.
    pub fn start(bet: u64, seed: u64) -> Result<Self, GameError> {
        let mut round = Self::with_deck(bet, Deck::shuffled(seed));
        round.deal()?;
        Ok(round)
    }

    /// A round in the dealing phase that will draw from `deck`.
    pub fn with_deck(bet: u64, deck: Deck) -> Self {
        Self {
            deck,
            bet,
            player: Vec::with_capacity(6),
            dealer: Vec::with_capacity(6),
            phase: Phase::Dealing,
            outcome: None,
        }
    }

    /// Two cards to the player, then two to the dealer.
    pub fn deal(&mut self) -> Result<(), GameError> {
        self.expect_phase(Phase::Dealing)?;
        for _ in 0..2 {
            let c = self.draw()?;
            self.player.push(c);
        }
        for _ in 0..2 {
            let c = self.draw()?;
            self.dealer.push(c);
        }
        self.phase = Phase::PlayerTurn;
        Ok(())
    }

    pub fn hit(&mut self) -> Result<Phase, GameError> {
        self.expect_phase(Phase::PlayerTurn)?;
        let c = self.draw()?;
        self.player.push(c);
        if evaluate(&self.player).is_bust() {
            self.finish(Outcome::Bust);
        }
        Ok(self.phase)
    }

    pub fn stand(&mut self) -> Result<Phase, GameError> {
        self.expect_phase(Phase::PlayerTurn)?;
        self.phase = Phase::DealerTurn;
        while dealer_should_draw(&self.dealer) {
            let c = self.draw()?;
            self.dealer.push(c);
        }
        let outcome = resolve_totals(self.player_value(), self.dealer_value());
        self.finish(outcome);
        Ok(self.phase)
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn player_hand(&self) -> &[Card] {
        &self.player
    }

    pub fn dealer_hand(&self) -> &[Card] {
        &self.dealer
    }

    /// The only dealer card visible during the player's turn.
    pub fn dealer_upcard(&self) -> Option<Card> {
        self.dealer.first().copied()
    }

    pub fn player_value(&self) -> u32 {
        hand_value(&self.player)
    }

    pub fn dealer_value(&self) -> u32 {
        hand_value(&self.dealer)
    }

    fn draw(&mut self) -> Result<Card, GameError> {
        self.deck.deal_card().ok_or(GameError::DeckExhausted)
    }

    fn finish(&mut self, outcome: Outcome) {
        self.outcome = Some(outcome);
        self.phase = Phase::Resolved;
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase == expected {
            Ok(())
        } else if self.phase == Phase::Resolved {
            Err(GameError::RoundResolved)
        } else {
            Err(GameError::WrongPhase(self.phase))
        }
    }
}

impl Round for BlackjackRound {
    type Action = Move;
    type Step = Phase;

    fn apply(&mut self, action: Move) -> Result<Phase, GameError> {
        match action {
            Move::Hit => self.hit(),
            Move::Stand => self.stand(),
        }
    }

    fn is_resolved(&self) -> bool {
        self.phase == Phase::Resolved
    }

    fn settlement(&self) -> Option<Settlement> {
        self.outcome
            .map(|o| Settlement::new(self.bet, o.payout(self.bet)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Rank, Suit};

    fn c(r: Rank) -> Card {
        Card::new(r, Suit::Hearts)
    }

    #[test]
    fn deal_is_player_player_dealer_dealer() {
        let deck = Deck::stacked(vec![c(Rank::Two), c(Rank::Three), c(Rank::Four), c(Rank::Five)]);
        let mut round = BlackjackRound::with_deck(10, deck);
        round.deal().unwrap();
        assert_eq!(round.player_hand(), &[c(Rank::Two), c(Rank::Three)]);
        assert_eq!(round.dealer_hand(), &[c(Rank::Four), c(Rank::Five)]);
        assert_eq!(round.dealer_upcard(), Some(c(Rank::Four)));
        assert_eq!(round.phase(), Phase::PlayerTurn);
    }

    #[test]
    fn hit_before_deal_is_rejected() {
        let mut round = BlackjackRound::with_deck(10, Deck::shuffled(1));
        assert_eq!(round.hit(), Err(GameError::WrongPhase(Phase::Dealing)));
    }

    #[test]
    fn exhausted_deck_is_an_error() {
        let mut round = BlackjackRound::with_deck(10, Deck::stacked(vec![c(Rank::Two)]));
        assert_eq!(round.deal(), Err(GameError::DeckExhausted));
    }

    #[test]
    fn settlement_absent_until_resolved() {
        let round = BlackjackRound::start(25, 7).unwrap();
        assert!(!round.is_resolved());
        assert!(round.settlement().is_none());
    }
}
