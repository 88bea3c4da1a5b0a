//! Command handler modules for the ginga CLI.
//!
//! Each command lives in its own module with a public
//! `handle_COMMAND_command(...) -> Result<(), CliError>` entry point. Output
//! streams are passed in as `&mut dyn Write` so tests can capture them.

mod bonus;
mod cfg;
mod chat;
mod doctor;
mod grant;
mod profile;
mod users;

pub use bonus::handle_bonus_command;
pub use cfg::handle_cfg_command;
pub use chat::{handle_chat_command, ChatOptions};
pub use doctor::handle_doctor_command;
pub use grant::handle_grant_command;
pub use profile::handle_profile_command;
pub use users::handle_users_command;
