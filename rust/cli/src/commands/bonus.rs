use std::io::Write;
use std::path::PathBuf;

use ginga_engine::round::PlayerId;

use crate::error::CliError;
use crate::io_utils::{open_ledger, resolve_settings};
use crate::validation::parse_date;

/// Claims the daily bonus of `user` for `date` (today when absent).
///
/// A second claim on the same day is not an error; it reports
/// `already claimed` and leaves the balance alone.
pub fn handle_bonus_command(
    db: Option<PathBuf>,
    user: PlayerId,
    date: Option<String>,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let day = match date {
        Some(raw) => parse_date(&raw).map_err(CliError::InvalidInput)?,
        None => chrono::Local::now().date_naive(),
    };
    let settings = resolve_settings(db)?.settings;
    let ledger = open_ledger(&settings)?;

    if ledger.claim_daily_bonus(user, day)? {
        writeln!(
            out,
            "bonus: user={} day={} credited={} balance={}",
            user,
            day,
            ledger.daily_bonus(),
            ledger.balance(user)?
        )?;
    } else {
        writeln!(
            out,
            "bonus: user={} day={} already claimed balance={}",
            user,
            day,
            ledger.balance(user)?
        )?;
    }
    Ok(())
}
