use ginga_engine::cards::{Card, Rank as R, Suit as S};
use ginga_engine::deck::Deck;
use ginga_engine::hand::{evaluate, hand_value, is_bust, BLACKJACK};

fn c(r: R) -> Card {
    Card { suit: S::Spades, rank: r }
}

#[test]
fn face_cards_and_ace_make_21() {
    assert_eq!(hand_value(&[c(R::Ace), c(R::King)]), 21);
    assert_eq!(hand_value(&[c(R::Ace), c(R::Jack)]), 21);
}

#[test]
fn two_aces_count_12() {
    let v = evaluate(&[c(R::Ace), c(R::Ace)]);
    assert_eq!(v.total, 12);
    assert!(v.soft, "one ace is still high");
}

#[test]
fn four_aces_and_a_king_is_14_hard() {
    let hand = [c(R::Ace), c(R::Ace), c(R::Ace), c(R::Ace), c(R::King)];
    let v = evaluate(&hand);
    assert_eq!(v.total, 14);
    assert!(!v.soft);
}

#[test]
fn soft_17_is_seventeen() {
    let v = evaluate(&[c(R::Ace), c(R::Six)]);
    assert_eq!(v.total, 17);
    assert!(v.soft);
}

#[test]
fn bust_needs_hard_total_over_21() {
    assert!(!is_bust(&[c(R::Ace), c(R::Nine), c(R::Nine)]));
    assert!(is_bust(&[c(R::Ten), c(R::Nine), c(R::Five)]));
}

/// Over 21 only when every ace is already counted low, and every reduction
/// that was possible has been taken.
#[test]
fn total_exceeds_21_only_when_forced() {
    for seed in 0..500u64 {
        let mut deck = Deck::shuffled(seed);
        let mut hand = Vec::new();
        for _ in 0..6 {
            hand.push(deck.deal_card().unwrap());
            let v = evaluate(&hand);
            let high_sum: u32 = hand.iter().map(|card| card.rank.value()).sum();
            let aces = hand.iter().filter(|card| card.rank == R::Ace).count() as u32;

            if v.total > BLACKJACK {
                assert!(!v.soft, "bust hand {:?} still has a high ace", hand);
                assert_eq!(v.total, high_sum - 10 * aces);
            } else {
                // never reduced more than needed
                let reductions = (high_sum - v.total) / 10;
                assert!(reductions <= aces);
                if reductions > 0 {
                    assert!(v.total + 10 > BLACKJACK, "over-reduced {:?}", hand);
                }
            }
        }
    }
}
