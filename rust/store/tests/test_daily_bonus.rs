use chrono::NaiveDate;
use ginga_store::{DEFAULT_DAILY_BONUS, Ledger, StoreError};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
}

#[test]
fn claim_once_per_day() {
    let ledger = Ledger::open_in_memory().unwrap();
    ledger.register(1, "a", None).unwrap();

    assert!(ledger.claim_daily_bonus(1, day(4)).unwrap());
    assert_eq!(ledger.balance(1).unwrap(), 500 + DEFAULT_DAILY_BONUS as i64);

    assert!(!ledger.claim_daily_bonus(1, day(4)).unwrap());
    assert_eq!(ledger.balance(1).unwrap(), 600);

    assert!(ledger.claim_daily_bonus(1, day(5)).unwrap());
    assert_eq!(ledger.balance(1).unwrap(), 700);
    assert_eq!(ledger.profile(1).unwrap().last_bonus_date, Some(day(5)));
}

#[test]
fn claims_are_per_user() {
    let ledger = Ledger::open_in_memory().unwrap();
    ledger.register(1, "a", None).unwrap();
    ledger.register(2, "b", None).unwrap();
    assert!(ledger.claim_daily_bonus(1, day(9)).unwrap());
    assert!(ledger.claim_daily_bonus(2, day(9)).unwrap());
}

#[test]
fn configured_amount_is_credited() {
    let ledger = Ledger::open_in_memory().unwrap().with_daily_bonus(25);
    ledger.register(1, "a", None).unwrap();
    assert!(ledger.claim_daily_bonus(1, day(1)).unwrap());
    assert_eq!(ledger.balance(1).unwrap(), 525);
}

#[test]
fn unknown_user_cannot_claim() {
    let ledger = Ledger::open_in_memory().unwrap();
    assert!(matches!(
        ledger.claim_daily_bonus(8, day(1)),
        Err(StoreError::UnknownUser(8))
    ));
}
