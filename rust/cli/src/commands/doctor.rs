//! Environment diagnostics for running the bot.
//!
//! `ginga doctor` prints one JSON object per check under `checks` and fails
//! when any of them fails:
//!
//! - **settings**: defaults, `GINGA_CONFIG` and `GINGA_*` variables resolve
//! - **database**: the configured ledger opens and its users table is readable
//! - **sqlite**: a scratch database can be written in a directory
//!   (`GINGA_DOCTOR_SQLITE_DIR`, default the temp dir)
//! - **locale**: the terminal locale is UTF-8, since replies carry emoji
//!   (`GINGA_DOCTOR_LOCALE_OVERRIDE` replaces the `LC_*`/`LANG` lookup)

use std::collections::BTreeMap;
use std::env;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::CliError;
use crate::io_utils::{open_ledger, resolve_settings};
use crate::ui;

const SQLITE_DIR_ENV: &str = "GINGA_DOCTOR_SQLITE_DIR";
const LOCALE_OVERRIDE_ENV: &str = "GINGA_DOCTOR_LOCALE_OVERRIDE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
enum Status {
    Ok,
    Fail,
}

#[derive(Debug, Serialize)]
struct Check {
    status: Status,
    detail: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl Check {
    fn pass(detail: impl Into<String>) -> Self {
        Check {
            status: Status::Ok,
            detail: detail.into(),
            error: None,
        }
    }

    fn fail(detail: impl Into<String>, error: impl Into<String>) -> Self {
        Check {
            status: Status::Fail,
            detail: detail.into(),
            error: Some(error.into()),
        }
    }

    fn passed(&self) -> bool {
        self.status == Status::Ok
    }
}

#[derive(Debug, Default, Serialize)]
struct Report {
    checks: BTreeMap<&'static str, Check>,
}

impl Report {
    fn record(&mut self, name: &'static str, check: Check) {
        self.checks.insert(name, check);
    }

    fn failures(&self) -> impl Iterator<Item = (&'static str, &Check)> {
        self.checks
            .iter()
            .filter(|(_, check)| !check.passed())
            .map(|(name, check)| (*name, check))
    }
}

fn check_ledger(report: &mut Report, db: Option<PathBuf>) {
    let resolved = match resolve_settings(db) {
        Ok(resolved) => resolved,
        Err(e) => {
            report.record("settings", Check::fail("settings did not resolve", e.to_string()));
            report.record(
                "database",
                Check::fail("skipped", "database check needs resolved settings"),
            );
            return;
        }
    };

    let settings = &resolved.settings;
    let admin = match settings.admin_id {
        Some(id) => format!("admin {id}"),
        None => "no admin".to_string(),
    };
    report.record(
        "settings",
        Check::pass(format!(
            "resolved with {admin}, bot @{}",
            settings.bot_username
        )),
    );

    let path = settings.database_path.display().to_string();
    let database = open_ledger(settings)
        .and_then(|ledger| ledger.user_count().map_err(CliError::from))
        .map(|count| {
            Check::pass(format!(
                "{path} ({:?}) holds {count} users",
                resolved.sources.database_path
            ))
        })
        .unwrap_or_else(|e| Check::fail(format!("opening {path}"), e.to_string()));
    report.record("database", database);
}

/// Writes and removes a scratch database in `dir`.
fn check_sqlite(dir: &Path) -> Check {
    if !dir.is_dir() {
        return Check::fail(
            format!("scratch dir {}", dir.display()),
            format!("{} does not exist or is not a directory", dir.display()),
        );
    }
    let scratch = dir.join(format!("ginga-doctor-{}.sqlite", std::process::id()));
    let written = rusqlite::Connection::open(&scratch)
        .and_then(|conn| conn.execute_batch("CREATE TABLE probe (id INTEGER); DROP TABLE probe;"));
    let _ = std::fs::remove_file(&scratch);
    match written {
        Ok(()) => Check::pass(format!("wrote a scratch database in {}", dir.display())),
        Err(e) => Check::fail(
            format!("scratch database in {}", dir.display()),
            format!("SQLite write failed: {e}"),
        ),
    }
}

fn check_locale(override_val: Option<String>) -> Check {
    let found = override_val
        .map(|value| (LOCALE_OVERRIDE_ENV, value))
        .or_else(|| {
            ["LC_ALL", "LC_CTYPE", "LANG"]
                .into_iter()
                .find_map(|key| env::var(key).ok().map(|value| (key, value)))
        });

    match found {
        Some((key, value)) => {
            let lowered = value.to_ascii_lowercase();
            if lowered.contains("utf-8") || lowered.contains("utf8") {
                Check::pass(format!("{key}={value}"))
            } else {
                Check::fail(
                    format!("{key}={value}"),
                    format!("{key}={value} is not UTF-8; card suits and marks will not render"),
                )
            }
        }
        // Nothing set is common in containers; Rust strings are UTF-8 anyway.
        None => Check::pass("no locale variables set"),
    }
}

/// Runs every check and prints the JSON report.
///
/// Each failing check is also written to `err`, and the command fails with
/// [`CliError::Config`].
pub fn handle_doctor_command(
    db: Option<PathBuf>,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), CliError> {
    let sqlite_dir = env::var(SQLITE_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|_| env::temp_dir());

    let mut report = Report::default();
    check_ledger(&mut report, db);
    report.record("sqlite", check_sqlite(&sqlite_dir));
    report.record("locale", check_locale(env::var(LOCALE_OVERRIDE_ENV).ok()));

    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| CliError::InvalidInput(format!("Failed to serialize doctor report: {e}")))?;
    writeln!(out, "{json}")?;

    let mut failed = 0;
    for (name, check) in report.failures() {
        failed += 1;
        let reason = check.error.as_deref().unwrap_or("failed");
        ui::write_error(err, &format!("{name}: {reason}"))?;
    }
    if failed == 0 {
        Ok(())
    } else {
        Err(CliError::Config(format!("{failed} doctor check(s) failed")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_doctor_reports_every_check_as_json() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("ledger.sqlite");
        let mut out = Vec::new();
        let mut err = Vec::new();

        let result = handle_doctor_command(Some(db.clone()), &mut out, &mut err);

        let output = String::from_utf8(out).unwrap();
        let json: serde_json::Value = serde_json::from_str(&output).expect("valid JSON");
        for name in ["settings", "database", "sqlite", "locale"] {
            assert!(json["checks"].get(name).is_some(), "missing {name}");
        }
        assert_eq!(json["checks"]["database"]["status"], "ok");
        assert!(db.exists());
        if result.is_ok() {
            assert!(err.is_empty());
        }
    }

    #[test]
    fn test_locale_check_requires_utf8() {
        assert!(check_locale(Some("en_US.UTF-8".into())).passed());
        assert!(!check_locale(Some("C".into())).passed());
    }

    #[test]
    fn test_sqlite_check_fails_for_missing_directory() {
        let check = check_sqlite(Path::new("/definitely/not/here"));
        assert!(!check.passed());
        assert!(check.error.unwrap().contains("does not exist"));
    }

    #[test]
    fn test_sqlite_check_writes_in_temp_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(check_sqlite(dir.path()).passed());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
