use std::io::Write;
use std::path::PathBuf;

use ginga_engine::round::PlayerId;

use crate::error::CliError;
use crate::io_utils::{open_ledger, resolve_settings};

/// Prints the stored profile of `user` as pretty JSON.
pub fn handle_profile_command(
    db: Option<PathBuf>,
    user: PlayerId,
    out: &mut dyn Write,
) -> Result<(), CliError> {
    let settings = resolve_settings(db)?.settings;
    let ledger = open_ledger(&settings)?;
    let profile = ledger.profile(user)?;
    let json = serde_json::to_string_pretty(&profile).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json)?;
    Ok(())
}
