//! Input helpers and settings resolution shared by the commands.

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;

use ginga_bot::{ResolvedSettings, Settings, ValueSource};
use ginga_store::Ledger;

use crate::error::CliError;

/// Reads a line of input from a buffered reader, blocking until available.
///
/// Trailing whitespace is trimmed. Returns `None` on EOF or read errors.
///
/// # Example
///
/// ```rust
/// use std::io::Cursor;
/// # use ginga_cli::io_utils::read_stdin_line;
///
/// let mut input = Cursor::new("hello  \n");
/// assert_eq!(read_stdin_line(&mut input), Some("hello".to_string()));
/// assert_eq!(read_stdin_line(&mut input), None);
/// ```
pub fn read_stdin_line(stdin: &mut dyn BufRead) -> Option<String> {
    let mut line = String::new();
    match stdin.read_line(&mut line) {
        Ok(0) => None,
        Ok(_) => Some(line.trim().to_string()),
        Err(_) => None,
    }
}

/// Loads settings with sources and applies the `--db` override.
pub fn resolve_settings(db: Option<PathBuf>) -> Result<ResolvedSettings, CliError> {
    let mut resolved = ginga_bot::load_with_sources()?;
    if let Some(path) = db {
        resolved.settings.database_path = path;
        resolved.sources.database_path = ValueSource::Flag;
        resolved.settings.validate()?;
    }
    Ok(resolved)
}

/// Opens the ledger named by `settings`, creating the file when needed.
pub fn open_ledger(settings: &Settings) -> Result<Arc<Ledger>, CliError> {
    let ledger = Ledger::open(&settings.database_path)?.with_daily_bonus(settings.daily_bonus);
    Ok(Arc::new(ledger))
}
