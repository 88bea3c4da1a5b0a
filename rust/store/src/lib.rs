//! # ginga-store: Balance Ledger
//!
//! One SQLite table, `users`, holds every player's totals: the game balance
//! spent and won in the mini-games, the bonus balance fed by referrals, and
//! the date of the last daily bonus claim. No history is kept.
//!
//! ```rust
//! use ginga_store::Ledger;
//!
//! let ledger = Ledger::open_in_memory().unwrap();
//! ledger.register(7, "ada", None).unwrap();
//! assert_eq!(ledger.balance(7).unwrap(), 500);
//!
//! ledger.debit(7, 120).unwrap();
//! ledger.add_balance(7, 240).unwrap();
//! assert_eq!(ledger.balance(7).unwrap(), 620);
//! ```

pub mod errors;
pub mod ledger;
pub mod profile;

pub use errors::StoreError;
pub use ledger::{DEFAULT_DAILY_BONUS, Ledger, STARTING_BALANCE};
pub use profile::{Profile, ReferralCredit, Registration};
