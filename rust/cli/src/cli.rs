//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "ginga",
    version,
    about = "Ginga casino bot: console chat, ledger tools and diagnostics"
)]
pub struct GingaCli {
    /// SQLite database to use instead of the configured one
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Talk to the bot from the terminal as one user
    Chat {
        #[arg(long)]
        user: i64,
        #[arg(long, default_value = "Player")]
        name: String,
        /// Treat this user as the admin for the session
        #[arg(long)]
        admin: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Print a user's profile as JSON
    Profile {
        #[arg(long)]
        user: i64,
    },
    /// Claim the daily bonus for a user
    Bonus {
        #[arg(long)]
        user: i64,
        /// Calendar day (YYYY-MM-DD), defaults to today
        #[arg(long)]
        date: Option<String>,
    },
    /// Add game balance to a user
    Grant {
        #[arg(long)]
        user: i64,
        #[arg(long, allow_negative_numbers = true)]
        amount: i64,
    },
    /// List registered users
    Users,
    /// Show the resolved settings and where each value came from
    Cfg,
    /// Check the local environment
    Doctor,
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Chat { .. } => "chat",
            Commands::Profile { .. } => "profile",
            Commands::Bonus { .. } => "bonus",
            Commands::Grant { .. } => "grant",
            Commands::Users => "users",
            Commands::Cfg => "cfg",
            Commands::Doctor => "doctor",
        }
    }
}
