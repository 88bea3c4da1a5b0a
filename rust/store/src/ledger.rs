use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use rand::Rng;
use rusqlite::{Connection, OptionalExtension, Row, params};

use crate::errors::StoreError;
use crate::profile::{Profile, ReferralCredit, Registration};

/// Game balance of a freshly registered user.
pub const STARTING_BALANCE: i64 = 500;
pub const DEFAULT_DAILY_BONUS: u64 = 100;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS users (
    user_id INTEGER PRIMARY KEY,
    user_name TEXT NOT NULL,
    referrer_id INTEGER,
    bonus_balance REAL NOT NULL DEFAULT 0,
    game_balance INTEGER NOT NULL DEFAULT 500,
    purchases INTEGER NOT NULL DEFAULT 0,
    referrals INTEGER NOT NULL DEFAULT 0,
    last_bonus_date TEXT
)";

const PROFILE_COLUMNS: &str = "user_id, user_name, referrer_id, bonus_balance, game_balance, \
     purchases, referrals, last_bonus_date";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// The balance ledger. Every operation runs on one connection guarded by a
/// mutex; single statements carry their own conditions so a debit never
/// takes a balance below zero.
#[derive(Debug)]
pub struct Ledger {
    conn: Mutex<Connection>,
    daily_bonus: u64,
}

impl Ledger {
    /// Opens (or creates) the database file and makes sure the table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }
        let ledger = Self::from_connection(Connection::open(path)?);
        ledger.init()?;
        tracing::debug!(path = %path.display(), "ledger opened");
        Ok(ledger)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let ledger = Self::from_connection(Connection::open_in_memory()?);
        ledger.init()?;
        Ok(ledger)
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
            daily_bonus: DEFAULT_DAILY_BONUS,
        }
    }

    /// Sets the amount credited by [`Ledger::claim_daily_bonus`].
    pub fn with_daily_bonus(mut self, amount: u64) -> Self {
        self.daily_bonus = amount;
        self
    }

    pub fn daily_bonus(&self) -> u64 {
        self.daily_bonus
    }

    /// Creates the `users` table if missing.
    pub fn init(&self) -> Result<(), StoreError> {
        self.lock()?.execute(SCHEMA, [])?;
        Ok(())
    }

    /// Registers a user with the thread-local RNG drawing the referral bonus.
    pub fn register(
        &self,
        user_id: i64,
        name: &str,
        referrer: Option<i64>,
    ) -> Result<Registration, StoreError> {
        self.register_with_rng(user_id, name, referrer, &mut rand::rng())
    }

    /// Inserts the user once. A newcomer referred by another existing user
    /// credits that user a bonus in [2, 5] (two decimals) and one referral.
    /// Self-referral and unknown referrers are stored as no referrer.
    pub fn register_with_rng<R: Rng + ?Sized>(
        &self,
        user_id: i64,
        name: &str,
        referrer: Option<i64>,
        rng: &mut R,
    ) -> Result<Registration, StoreError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;

        let known: Option<i64> = tx
            .query_row(
                "SELECT user_id FROM users WHERE user_id = ?1",
                params![user_id],
                |r| r.get(0),
            )
            .optional()?;
        if known.is_some() {
            return Ok(Registration {
                created: false,
                referral: None,
            });
        }

        let referrer = match referrer.filter(|&r| r != user_id) {
            Some(r) => tx
                .query_row(
                    "SELECT user_id FROM users WHERE user_id = ?1",
                    params![r],
                    |row| row.get::<_, i64>(0),
                )
                .optional()?,
            None => None,
        };

        tx.execute(
            "INSERT INTO users (user_id, user_name, referrer_id, game_balance)
             VALUES (?1, ?2, ?3, ?4)",
            params![user_id, name, referrer, STARTING_BALANCE],
        )?;

        let referral = match referrer {
            Some(referrer) => {
                let bonus = referral_bonus(rng);
                tx.execute(
                    "UPDATE users SET bonus_balance = bonus_balance + ?1,
                         referrals = referrals + 1
                     WHERE user_id = ?2",
                    params![bonus, referrer],
                )?;
                Some(ReferralCredit { referrer, bonus })
            }
            None => None,
        };
        tx.commit()?;

        match referral {
            Some(credit) => tracing::info!(
                user_id,
                referrer = credit.referrer,
                bonus = credit.bonus,
                "user registered via referral"
            ),
            None => tracing::debug!(user_id, "user registered"),
        }
        Ok(Registration {
            created: true,
            referral,
        })
    }

    /// Registers the user without a referrer if they are not known yet.
    pub fn ensure_user(&self, user_id: i64, name: &str) -> Result<(), StoreError> {
        self.register(user_id, name, None).map(|_| ())
    }

    pub fn profile(&self, user_id: i64) -> Result<Profile, StoreError> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM users WHERE user_id = ?1");
        self.lock()?
            .query_row(&sql, params![user_id], profile_from_row)
            .optional()?
            .ok_or(StoreError::UnknownUser(user_id))
    }

    pub fn balance(&self, user_id: i64) -> Result<i64, StoreError> {
        self.lock()?
            .query_row(
                "SELECT game_balance FROM users WHERE user_id = ?1",
                params![user_id],
                |r| r.get(0),
            )
            .optional()?
            .ok_or(StoreError::UnknownUser(user_id))
    }

    /// Adds `delta` (which may be negative) to the game balance and returns
    /// the new balance.
    pub fn add_balance(&self, user_id: i64, delta: i64) -> Result<i64, StoreError> {
        let balance = self
            .lock()?
            .query_row(
                "UPDATE users SET game_balance = game_balance + ?1
                 WHERE user_id = ?2
                 RETURNING game_balance",
                params![delta, user_id],
                |r| r.get(0),
            )
            .optional()?
            .ok_or(StoreError::UnknownUser(user_id))?;
        tracing::debug!(user_id, delta, balance, "balance adjusted");
        Ok(balance)
    }

    /// Takes `amount` off the game balance only if the balance covers it.
    pub fn debit(&self, user_id: i64, amount: u64) -> Result<i64, StoreError> {
        let signed = i64::try_from(amount).map_err(|_| StoreError::AmountOutOfRange(amount))?;
        let conn = self.lock()?;
        let updated: Option<i64> = conn
            .query_row(
                "UPDATE users SET game_balance = game_balance - ?1
                 WHERE user_id = ?2 AND game_balance >= ?1
                 RETURNING game_balance",
                params![signed, user_id],
                |r| r.get(0),
            )
            .optional()?;
        match updated {
            Some(balance) => {
                tracing::debug!(user_id, amount, balance, "bet debited");
                Ok(balance)
            }
            None => {
                let balance: Option<i64> = conn
                    .query_row(
                        "SELECT game_balance FROM users WHERE user_id = ?1",
                        params![user_id],
                        |r| r.get(0),
                    )
                    .optional()?;
                match balance {
                    Some(balance) => Err(StoreError::InsufficientFunds {
                        needed: amount,
                        balance,
                    }),
                    None => Err(StoreError::UnknownUser(user_id)),
                }
            }
        }
    }

    /// Credits the daily bonus unless it was already claimed on `day`.
    pub fn claim_daily_bonus(&self, user_id: i64, day: NaiveDate) -> Result<bool, StoreError> {
        let bonus = i64::try_from(self.daily_bonus)
            .map_err(|_| StoreError::AmountOutOfRange(self.daily_bonus))?;
        let day = day.format(DATE_FORMAT).to_string();
        let conn = self.lock()?;
        let changed = conn.execute(
            "UPDATE users SET game_balance = game_balance + ?1, last_bonus_date = ?2
             WHERE user_id = ?3 AND (last_bonus_date IS NULL OR last_bonus_date <> ?2)",
            params![bonus, day, user_id],
        )?;
        if changed == 1 {
            tracing::info!(user_id, bonus, day = %day, "daily bonus claimed");
            return Ok(true);
        }
        let known: Option<i64> = conn
            .query_row(
                "SELECT user_id FROM users WHERE user_id = ?1",
                params![user_id],
                |r| r.get(0),
            )
            .optional()?;
        match known {
            Some(_) => Ok(false),
            None => Err(StoreError::UnknownUser(user_id)),
        }
    }

    /// [`Ledger::claim_daily_bonus`] for the local calendar day.
    pub fn claim_daily_bonus_today(&self, user_id: i64) -> Result<bool, StoreError> {
        self.claim_daily_bonus(user_id, chrono::Local::now().date_naive())
    }

    /// Every registered user, ascending.
    pub fn user_ids(&self) -> Result<Vec<i64>, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare("SELECT user_id FROM users ORDER BY user_id")?;
        let ids = stmt
            .query_map([], |r| r.get(0))?
            .collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    pub fn user_count(&self) -> Result<u64, StoreError> {
        let n: i64 = self
            .lock()?
            .query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?;
        Ok(n as u64)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| StoreError::Poisoned)
    }
}

/// Uniform draw from [2, 5] rounded to cents.
fn referral_bonus<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let raw: f64 = rng.random_range(2.0..=5.0);
    (raw * 100.0).round() / 100.0
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<Profile> {
    let last_bonus: Option<String> = row.get(7)?;
    Ok(Profile {
        user_id: row.get(0)?,
        user_name: row.get(1)?,
        referrer_id: row.get(2)?,
        bonus_balance: row.get(3)?,
        game_balance: row.get(4)?,
        purchases: row.get(5)?,
        referrals: row.get(6)?,
        last_bonus_date: last_bonus
            .and_then(|s| NaiveDate::parse_from_str(&s, DATE_FORMAT).ok()),
    })
}
