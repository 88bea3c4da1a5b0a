use ginga_engine::blackjack::{
    dealer_should_draw, BlackjackRound, Move, Outcome, Phase, DEALER_STANDS_ON,
};
use ginga_engine::cards::{Card, Rank as R, Suit as S};
use ginga_engine::deck::Deck;
use ginga_engine::errors::GameError;
use ginga_engine::game::{Round, Settlement};
use ginga_engine::hand::hand_value;

fn c(r: R) -> Card {
    Card { suit: S::Diamonds, rank: r }
}

/// Player gets the first two cards, dealer the next two, then draws follow.
fn round_with(cards: &[R], bet: u64) -> BlackjackRound {
    let deck = Deck::stacked(cards.iter().map(|&r| c(r)).collect());
    let mut round = BlackjackRound::with_deck(bet, deck);
    round.deal().expect("deal");
    round
}

#[test]
fn push_refunds_the_bet_exactly() {
    let balance: i64 = 500;
    let bet = 100;
    let mut round = round_with(&[R::Ten, R::Nine, R::King, R::Nine], bet);

    // bet is debited up front
    let after_bet = balance - bet as i64;
    round.stand().unwrap();

    assert_eq!(round.outcome(), Some(Outcome::Push));
    let s = round.settlement().unwrap();
    assert_eq!(s, Settlement::new(100, 100));
    assert_eq!(after_bet + s.payout as i64, 500);
    assert_eq!(s.net(), 0);
}

#[test]
fn win_pays_double() {
    let mut round = round_with(&[R::Ten, R::King, R::Ten, R::Seven], 40);
    round.stand().unwrap();
    assert_eq!(round.outcome(), Some(Outcome::Win));
    assert_eq!(round.settlement().unwrap().payout, 80);
}

#[test]
fn lower_total_loses() {
    let mut round = round_with(&[R::Ten, R::Seven, R::Ten, R::Nine], 40);
    round.stand().unwrap();
    assert_eq!(round.outcome(), Some(Outcome::Lose));
    assert_eq!(round.settlement().unwrap().net(), -40);
}

#[test]
fn player_bust_resolves_without_dealer_turn() {
    // dealer holds 12 and would have to draw, but never gets the chance
    let mut round = round_with(&[R::Ten, R::Six, R::Ten, R::Two, R::King, R::Five], 25);
    let phase = round.apply(Move::Hit).unwrap();
    assert_eq!(phase, Phase::Resolved);
    assert_eq!(round.outcome(), Some(Outcome::Bust));
    assert_eq!(round.dealer_hand().len(), 2);
    assert_eq!(round.settlement().unwrap().payout, 0);
}

#[test]
fn hit_to_21_keeps_player_turn() {
    let mut round = round_with(&[R::Ten, R::Six, R::Ten, R::Eight, R::Five], 10);
    assert_eq!(round.hit().unwrap(), Phase::PlayerTurn);
    assert_eq!(round.player_value(), 21);
}

#[test]
fn dealer_bust_is_a_player_win() {
    // dealer 16 draws a king
    let mut round = round_with(&[R::Ten, R::Two, R::Ten, R::Six, R::King], 10);
    round.stand().unwrap();
    assert!(round.dealer_value() > 21);
    assert_eq!(round.outcome(), Some(Outcome::Win));
}

#[test]
fn dealer_stands_on_soft_17() {
    let mut round = round_with(&[R::Ten, R::Eight, R::Ace, R::Six, R::Five], 10);
    round.stand().unwrap();
    assert_eq!(round.dealer_hand().len(), 2, "soft 17 must not draw");
    assert_eq!(round.outcome(), Some(Outcome::Win));
}

#[test]
fn actions_after_resolution_are_rejected() {
    let mut round = round_with(&[R::Ten, R::Nine, R::Ten, R::Eight], 10);
    round.stand().unwrap();
    assert_eq!(round.hit(), Err(GameError::RoundResolved));
    assert_eq!(round.apply(Move::Stand), Err(GameError::RoundResolved));
}

#[test]
fn dealer_policy_threshold() {
    assert!(dealer_should_draw(&[c(R::Ten), c(R::Six)]));
    assert!(!dealer_should_draw(&[c(R::Ten), c(R::Seven)]));
    assert!(!dealer_should_draw(&[c(R::Ace), c(R::Six)]));
}

/// Over many shuffled rounds the dealer ends on 17 or more, and every card it
/// drew was taken while below 17.
#[test]
fn dealer_draws_exactly_while_below_17() {
    for seed in 0..300u64 {
        let mut round = BlackjackRound::start(10, seed).unwrap();
        round.stand().unwrap();
        let dealer = round.dealer_hand();
        assert!(hand_value(dealer) >= DEALER_STANDS_ON, "seed {seed}");
        for n in 2..dealer.len() {
            assert!(
                hand_value(&dealer[..n]) < DEALER_STANDS_ON,
                "seed {seed}: dealer drew at {}",
                hand_value(&dealer[..n])
            );
        }
        assert!(round.is_resolved());
    }
}

#[test]
fn terminal_state_reports_both_hands_and_delta() {
    let mut round = BlackjackRound::start(50, 99).unwrap();
    while round.phase() == Phase::PlayerTurn && round.player_value() < 15 {
        round.hit().unwrap();
    }
    if round.phase() == Phase::PlayerTurn {
        round.stand().unwrap();
    }
    assert_eq!(round.phase(), Phase::Resolved);
    assert!(round.player_hand().len() >= 2);
    assert!(round.dealer_hand().len() >= 2);
    let s = round.settlement().unwrap();
    assert_eq!(s.stake, 50);
    assert!([0, 50, 100].contains(&s.payout));
}
