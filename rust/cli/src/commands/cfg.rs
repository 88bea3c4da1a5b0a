//! Configuration command handler.
//!
//! Displays the resolved bot settings with the source of each value
//! (default, environment, or configuration file).
//!
//! # Example Output
//!
//! ```json
//! {
//!   "daily_bonus": {
//!     "value": 100,
//!     "source": "default"
//!   },
//!   ...
//! }
//! ```

use crate::error::CliError;
use crate::io_utils::resolve_settings;
use crate::ui;
use std::io::Write;
use std::path::PathBuf;

/// Loads the settings with source tracking and prints them as pretty JSON.
///
/// # Errors
///
/// Returns `CliError::Config` if the settings cannot be loaded.
/// Returns `CliError::Io` if writing to the output stream fails.
pub fn handle_cfg_command(
    db: Option<PathBuf>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let resolved = match resolve_settings(db) {
        Ok(r) => r,
        Err(e) => {
            ui::write_error(err, &format!("Invalid configuration: {}", e))?;
            return Err(e);
        }
    };

    let json_str =
        serde_json::to_string_pretty(&resolved.to_json()).map_err(std::io::Error::other)?;
    writeln!(out, "{}", json_str)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_cfg_displays_json_output() {
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = handle_cfg_command(Some(PathBuf::from("cfg-test.sqlite")), &mut out, &mut err);
        assert!(result.is_ok(), "cfg command should succeed");

        let output = String::from_utf8(out).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&output).expect("cfg output should be valid JSON");

        for key in ["database_path", "admin_id", "daily_bonus", "word_reward", "port"] {
            assert!(json.get(key).is_some(), "should contain {key}");
        }
        assert_eq!(json["database_path"]["value"], "cfg-test.sqlite");
        assert_eq!(json["database_path"]["source"], "flag");
    }
}
