use std::io::Write;
use std::path::PathBuf;

use crate::error::CliError;
use crate::io_utils::{open_ledger, resolve_settings};

/// Prints the number of registered users followed by their ids.
pub fn handle_users_command(db: Option<PathBuf>, out: &mut dyn Write) -> Result<(), CliError> {
    let settings = resolve_settings(db)?.settings;
    let ledger = open_ledger(&settings)?;
    let ids = ledger.user_ids()?;
    writeln!(out, "users: {}", ids.len())?;
    for id in ids {
        writeln!(out, "{}", id)?;
    }
    Ok(())
}
