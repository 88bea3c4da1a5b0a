use std::io::Write;
use std::path::PathBuf;

use ginga_engine::round::PlayerId;

use crate::error::CliError;
use crate::io_utils::{open_ledger, resolve_settings};

/// Adds `amount` to the game balance of an existing user.
pub fn handle_grant_command(
    db: Option<PathBuf>,
    user: PlayerId,
    amount: i64,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    if amount <= 0 {
        return Err(CliError::InvalidInput(
            "amount must be a positive number".to_string(),
        ));
    }
    let settings = resolve_settings(db)?.settings;
    let ledger = open_ledger(&settings)?;
    let balance = ledger.add_balance(user, amount)?;
    writeln!(out, "grant: user={} amount={} balance={}", user, amount, balance)?;
    Ok(())
}
