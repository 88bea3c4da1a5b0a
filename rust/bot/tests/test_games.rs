mod common;

use common::{only, Harness};
use ginga_bot::menus;
use ginga_engine::words::CATALOGUE;

#[test]
fn start_registers_with_starting_balance() {
    let h = Harness::new();
    let reply = only(h.start(10, ""));
    assert!(reply.text.contains("Profile: user10"));
    assert!(reply.text.contains("500G"));
    assert!(reply.text.contains("https://t.me/ginga_casino_bot?start=10"));
    assert!(reply.button(menus::DAILY_BONUS).is_some());
    assert_eq!(h.balance(10), 500);
}

#[test]
fn start_with_referrer_credits_them_once() {
    let h = Harness::new();
    h.start(10, "");
    h.start(11, "10");
    h.start(11, "10");
    h.start(12, "not-a-number");

    let referrer = h.dispatcher.ledger().profile(10).unwrap();
    assert_eq!(referrer.referrals, 1);
    assert!((2.0..=5.0).contains(&referrer.bonus_balance));
    assert_eq!(h.dispatcher.ledger().profile(11).unwrap().referrer_id, Some(10));
    assert_eq!(h.dispatcher.ledger().profile(12).unwrap().referrer_id, None);
}

#[test]
fn any_update_creates_missing_user() {
    let h = Harness::new();
    let reply = only(h.text(20, "hello"));
    assert!(reply.button(menus::PROFILE).is_some());
    assert_eq!(h.balance(20), 500);
}

#[test]
fn bet_errors_keep_waiting_for_a_bet() {
    let h = Harness::new();
    h.start(10, "");
    let prompt = only(h.press(10, menus::SLOTS));
    assert!(prompt.text.contains("500G"));
    assert_eq!(h.state(10), "awaiting_bet");

    assert_eq!(only(h.text(10, "ten")), menus::not_a_number());
    assert_eq!(only(h.text(10, "0")), menus::non_positive_bet());
    assert_eq!(only(h.text(10, "501")), menus::insufficient_funds());
    assert_eq!(h.state(10), "awaiting_bet");
    assert_eq!(h.balance(10), 500);
}

#[test]
fn slots_settle_on_the_bet() {
    let h = Harness::new();
    h.start(10, "");
    h.press(10, menus::SLOTS);
    let reply = only(h.text(10, "100"));

    assert_eq!(h.state(10), "idle");
    let balance = h.balance(10);
    // stake gone, payout is a whole multiple of the bet
    assert!(balance >= 400);
    assert_eq!((balance - 400) % 100, 0);
    assert!(reply.text.contains(&format!("{balance}G")));
    assert!(reply.button(menus::SLOTS).is_some());
}

#[test]
fn blackjack_plays_to_settlement() {
    let h = Harness::new();
    h.start(10, "");
    h.press(10, menus::BLACKJACK);
    let table = only(h.text(10, "100"));
    assert_eq!(h.balance(10), 400);
    assert_eq!(h.state(10), "blackjack");
    assert!(table.text.contains("[?]"));
    assert!(table.button(menus::HIT).is_some());

    // free text re-shows the table without touching the round
    assert_eq!(only(h.text(10, "what now")), table);

    let result = only(h.press(10, menus::STAND));
    assert_eq!(h.state(10), "idle");
    let balance = h.balance(10);
    assert!([400, 500, 600].contains(&balance), "balance {balance}");
    assert!(result.text.contains(&format!("Your new balance: *{balance}G*")));

    assert_eq!(only(h.press(10, menus::HIT)), menus::no_blackjack());
}

#[test]
fn hitting_until_done_never_loses_more_than_the_stake() {
    let h = Harness::new();
    h.start(10, "");
    for _ in 0..5 {
        h.press(10, menus::BLACKJACK);
        h.text(10, "50");
        let mut guard = 0;
        while h.state(10) == "blackjack" && guard < 12 {
            h.press(10, menus::HIT);
            guard += 1;
        }
        assert_eq!(h.state(10), "idle");
    }
    assert!(h.balance(10) >= 250);
}

#[test]
fn navigating_away_abandons_the_round() {
    let h = Harness::new();
    h.start(10, "");
    h.press(10, menus::BLACKJACK);
    h.text(10, "100");
    h.press(10, menus::PROFILE);
    assert_eq!(h.state(10), "idle");
    assert_eq!(h.balance(10), 400);
}

#[test]
fn word_round_pays_reward_on_solve() {
    let h = Harness::new();
    h.start(10, "");
    let intro = only(h.press(10, menus::WORD_GAME));
    assert_eq!(h.state(10), "word");
    // free to play: no bet prompt, nothing debited
    assert!(!intro.text.contains("Enter your bet"));
    assert_eq!(h.balance(10), 500);

    let category = CATALOGUE
        .iter()
        .find(|c| intro.text.contains(&format!("*{}*", c.name)))
        .expect("category named in intro");

    let wrong = only(h.text(10, "x"));
    assert!(wrong.text.contains("letters"));
    assert_eq!(h.state(10), "word");

    let mut solved = None;
    for word in category.words {
        let reply = only(h.text(10, word));
        if h.state(10) == "idle" {
            solved = Some(reply);
            break;
        }
    }
    let reply = solved.expect("one catalogue word solves the round");
    assert_eq!(reply, menus::word_solved(50));
    assert_eq!(h.balance(10), 550);
}
