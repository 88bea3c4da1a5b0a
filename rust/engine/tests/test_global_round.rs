use ginga_engine::errors::GameError;
use ginga_engine::round::{GlobalGuess, GlobalRound};
use ginga_engine::word::Mark;

#[test]
fn wrong_guess_gets_marks_and_no_win() {
    let mut round = GlobalRound::new(3, "river", Some("flows to the sea".into())).unwrap();
    assert_eq!(round.hint(), Some("flows to the sea"));
    match round.guess(1, "rover").unwrap() {
        GlobalGuess::Marks { marks } => {
            assert_eq!(marks[0], Mark::Exact);
            assert_eq!(marks[1], Mark::Absent);
        }
        other => panic!("unexpected {other:?}"),
    }
    assert_eq!(round.winner_count(), 0);
}

#[test]
fn second_correct_guess_is_not_paid_again() {
    let mut round = GlobalRound::new(1, "ocean", None).unwrap();
    assert_eq!(round.guess(42, "ocean"), Ok(GlobalGuess::Solved));
    assert_eq!(round.guess(42, "OCEAN"), Ok(GlobalGuess::AlreadySolved));
    assert_eq!(round.winner_count(), 1);
}

#[test]
fn wrong_length_is_an_error_not_a_guess() {
    let mut round = GlobalRound::new(1, "ocean", None).unwrap();
    assert_eq!(
        round.guess(1, "sea"),
        Err(GameError::WrongLength {
            expected: 5,
            actual: 3
        })
    );
}

#[test]
fn replacing_the_round_resets_winners() {
    let mut round = GlobalRound::new(1, "ocean", None).unwrap();
    round.guess(9, "ocean").unwrap();
    round = GlobalRound::new(round.id() + 1, "cloud", None).unwrap();
    assert_eq!(round.id(), 2);
    assert!(!round.has_solved(9));
    assert_eq!(round.guess(9, "cloud"), Ok(GlobalGuess::Solved));
}

#[test]
fn secret_with_spaces_is_rejected() {
    assert!(matches!(
        GlobalRound::new(1, "two words", None),
        Err(GameError::InvalidWord(_))
    ));
}

#[test]
fn guess_result_serializes_with_tag() {
    let json = serde_json::to_string(&GlobalGuess::Solved).unwrap();
    assert_eq!(json, r#"{"result":"solved"}"#);
}
