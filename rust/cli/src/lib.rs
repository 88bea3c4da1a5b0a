//! # Ginga CLI Library
//!
//! Command-line front end for the ginga casino bot: a console chat transport
//! for the dispatcher plus ledger and diagnostics tools.
//!
//! ## Main Entry Point
//!
//! [`run`] parses command-line arguments and executes the subcommand.
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::io;
//! let args = vec!["ginga", "profile", "--user", "42"];
//! let code = ginga_cli::run(args, &mut io::stdout(), &mut io::stderr());
//! assert_eq!(code, 0);
//! ```
//!
//! ## Available Subcommands
//!
//! - `chat`: Talk to the bot as one user (`/cmd`, `[button]`, `#data`, text)
//! - `profile`: Print a stored profile as JSON
//! - `bonus`: Claim the daily bonus for a user
//! - `grant`: Add game balance to a user
//! - `users`: List registered users
//! - `cfg`: Display resolved settings and their sources
//! - `doctor`: Run environment diagnostics

use clap::Parser;
use std::io::{BufRead, Write};

pub mod cli;
mod commands;
mod error;
pub mod exit_code;
pub mod formatters;
pub mod io_utils;
pub mod ui;
pub mod validation;

use cli::{Commands, GingaCli};
use commands::{
    handle_bonus_command, handle_cfg_command, handle_chat_command, handle_doctor_command,
    handle_grant_command, handle_profile_command, handle_users_command, ChatOptions,
};

pub use error::CliError;

const COMMANDS: &[&str] = &["chat", "profile", "bonus", "grant", "users", "cfg", "doctor"];

/// Main entry point for the CLI application. Reads chat input from stdin.
///
/// # Returns
///
/// Exit code: `0` for success, `2` for errors
pub fn run<I, S>(args: I, out: &mut dyn Write, err: &mut dyn Write) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let stdin = std::io::stdin();
    let mut stdin_lock = stdin.lock();
    run_with_input(args, &mut stdin_lock, out, err)
}

/// Same as [`run`] with an explicit input stream for the `chat` command.
///
/// # Example
///
/// ```
/// use std::io::{self, Cursor};
/// let mut input = Cursor::new("");
/// let code = ginga_cli::run_with_input(vec!["ginga", "--help"], &mut input, &mut io::sink(), &mut io::sink());
/// assert_eq!(code, 0);
/// ```
pub fn run_with_input<I, S>(
    args: I,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> i32
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let argv: Vec<String> = args.into_iter().map(|s| s.as_ref().to_string()).collect();

    let cli = match GingaCli::try_parse_from(&argv) {
        Ok(cli) => cli,
        Err(e) => return report_parse_error(e, out, err),
    };

    let GingaCli { db, cmd } = cli;
    let name = cmd.name();
    let result = match cmd {
        Commands::Chat {
            user,
            name,
            admin,
            seed,
        } => handle_chat_command(
            ChatOptions {
                db,
                user,
                name,
                admin,
                seed,
            },
            input,
            out,
            err,
        ),
        Commands::Profile { user } => handle_profile_command(db, user, out),
        Commands::Bonus { user, date } => handle_bonus_command(db, user, date, out),
        Commands::Grant { user, amount } => handle_grant_command(db, user, amount, out),
        Commands::Users => handle_users_command(db, out),
        Commands::Cfg => handle_cfg_command(db, out, err),
        Commands::Doctor => handle_doctor_command(db, out, err),
    };

    match result {
        Ok(()) => exit_code::SUCCESS,
        // cfg and doctor already explain themselves on stderr
        Err(CliError::Config(_)) if matches!(name, "cfg" | "doctor") => exit_code::ERROR,
        Err(e) => {
            let _ = ui::write_error(err, &e.to_string());
            exit_code::ERROR
        }
    }
}

fn report_parse_error(e: clap::Error, out: &mut dyn Write, err: &mut dyn Write) -> i32 {
    use clap::error::ErrorKind;

    match e.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
            if write!(out, "{}", e).is_err() {
                return exit_code::ERROR;
            }
            exit_code::SUCCESS
        }
        _ => {
            if writeln!(err, "{}", e).is_err()
                || writeln!(err).is_err()
                || writeln!(err, "Ginga casino bot CLI").is_err()
                || writeln!(err, "Usage: ginga <command> [options]\n").is_err()
                || writeln!(err, "Commands:").is_err()
            {
                return exit_code::ERROR;
            }
            for c in COMMANDS {
                if writeln!(err, "  {}", c).is_err() {
                    return exit_code::ERROR;
                }
            }
            let _ = writeln!(err, "\nFor full help, run: ginga --help");
            exit_code::ERROR
        }
    }
}
