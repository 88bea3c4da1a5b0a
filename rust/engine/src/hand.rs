use crate::cards::{Card, Rank};

/// Highest total that does not bust.
pub const BLACKJACK: u32 = 21;

/// Score of a blackjack hand after ace reduction.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct HandValue {
    pub total: u32,
    /// At least one ace is still counted as 11.
    pub soft: bool,
}

impl HandValue {
    pub fn is_bust(&self) -> bool {
        self.total > BLACKJACK
    }
}

/// Scores a hand: aces start at 11 and are dropped to 1, one at a time, while
/// the total is over 21.
///
/// # Examples
///
/// ```
/// use ginga_engine::cards::{Card, Rank, Suit};
/// use ginga_engine::hand::evaluate;
///
/// let hand = [
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::Ace, Suit::Hearts),
///     Card::new(Rank::Nine, Suit::Clubs),
/// ];
/// let value = evaluate(&hand);
/// assert_eq!(value.total, 21);
/// assert!(value.soft);
/// ```
pub fn evaluate(cards: &[Card]) -> HandValue {
    let mut total: u32 = cards.iter().map(|c| c.rank.value()).sum();
    let mut high_aces = cards.iter().filter(|c| c.rank == Rank::Ace).count();
    while total > BLACKJACK && high_aces > 0 {
        total -= 10;
        high_aces -= 1;
    }
    HandValue {
        total,
        soft: high_aces > 0,
    }
}

pub fn hand_value(cards: &[Card]) -> u32 {
    evaluate(cards).total
}

pub fn is_bust(cards: &[Card]) -> bool {
    evaluate(cards).is_bust()
}

pub fn format_hand(cards: &[Card]) -> String {
    cards
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Suit;

    fn c(r: Rank) -> Card {
        Card::new(r, Suit::Clubs)
    }

    #[test]
    fn empty_hand_scores_zero() {
        assert_eq!(evaluate(&[]), HandValue { total: 0, soft: false });
    }

    #[test]
    fn single_ace_reduces_only_when_needed() {
        assert_eq!(hand_value(&[c(Rank::Ace), c(Rank::Six)]), 17);
        assert_eq!(hand_value(&[c(Rank::Ace), c(Rank::Six), c(Rank::Nine)]), 16);
    }

    #[test]
    fn hard_total_without_aces_can_bust() {
        let v = evaluate(&[c(Rank::King), c(Rank::Queen), c(Rank::Two)]);
        assert_eq!(v.total, 22);
        assert!(v.is_bust());
        assert!(!v.soft);
    }

    #[test]
    fn format_joins_with_spaces() {
        let hand = [Card::new(Rank::Ace, Suit::Spades), Card::new(Rank::Ten, Suit::Hearts)];
        assert_eq!(format_hand(&hand), "A♠️ 10♥️");
    }
}
