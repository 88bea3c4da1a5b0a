use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

pub const CONFIG_ENV: &str = "GINGA_CONFIG";

/// Runtime settings of the bot service and the `ginga` command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    pub database_path: PathBuf,
    /// The only user allowed to broadcast, mint balance and start global rounds
    pub admin_id: Option<i64>,
    /// Used to build referral links
    pub bot_username: String,
    /// Announcement channel, with its leading `@`
    pub channel: String,
    pub daily_bonus: u64,
    pub word_reward: u64,
    /// Fixes every shuffle, spin and word pick when set
    pub seed: Option<u64>,
    pub host: String,
    pub port: u16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("data/ginga.sqlite"),
            admin_id: None,
            bot_username: "ginga_casino_bot".into(),
            channel: "@ginga_news".into(),
            daily_bonus: 100,
            word_reward: 50,
            seed: None,
            host: "127.0.0.1".into(),
            port: 8080,
        }
    }
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.database_path.as_os_str().is_empty() {
            return Err(SettingsError::InvalidValue(
                "database_path cannot be empty".to_string(),
            ));
        }
        if self.daily_bonus == 0 {
            return Err(SettingsError::InvalidValue(
                "daily_bonus must be greater than 0".to_string(),
            ));
        }
        if self.word_reward == 0 {
            return Err(SettingsError::InvalidValue(
                "word_reward must be greater than 0".to_string(),
            ));
        }
        if self.bot_username.trim().is_empty() {
            return Err(SettingsError::InvalidValue(
                "bot_username cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_id == Some(user_id)
    }

    /// Channel name without the leading `@`, for `t.me` links.
    pub fn channel_handle(&self) -> &str {
        self.channel.trim_start_matches('@')
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueSource {
    Default,
    File,
    Env,
    /// Command-line flag of the operator tool
    Flag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SettingsSources {
    pub database_path: ValueSource,
    pub admin_id: ValueSource,
    pub bot_username: ValueSource,
    pub channel: ValueSource,
    pub daily_bonus: ValueSource,
    pub word_reward: ValueSource,
    pub seed: ValueSource,
    pub host: ValueSource,
    pub port: ValueSource,
}

impl Default for SettingsSources {
    fn default() -> Self {
        Self {
            database_path: ValueSource::Default,
            admin_id: ValueSource::Default,
            bot_username: ValueSource::Default,
            channel: ValueSource::Default,
            daily_bonus: ValueSource::Default,
            word_reward: ValueSource::Default,
            seed: ValueSource::Default,
            host: ValueSource::Default,
            port: ValueSource::Default,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedSettings {
    pub settings: Settings,
    pub sources: SettingsSources,
}

impl ResolvedSettings {
    /// `{ field: { value, source } }` for every setting.
    pub fn to_json(&self) -> serde_json::Value {
        let s = &self.settings;
        let src = &self.sources;
        let entry = |value: serde_json::Value, source: ValueSource| {
            serde_json::json!({ "value": value, "source": source })
        };
        serde_json::json!({
            "database_path": entry(serde_json::json!(s.database_path), src.database_path),
            "admin_id": entry(serde_json::json!(s.admin_id), src.admin_id),
            "bot_username": entry(serde_json::json!(s.bot_username), src.bot_username),
            "channel": entry(serde_json::json!(s.channel), src.channel),
            "daily_bonus": entry(serde_json::json!(s.daily_bonus), src.daily_bonus),
            "word_reward": entry(serde_json::json!(s.word_reward), src.word_reward),
            "seed": entry(serde_json::json!(s.seed), src.seed),
            "host": entry(serde_json::json!(s.host), src.host),
            "port": entry(serde_json::json!(s.port), src.port),
        })
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
    #[error("Invalid settings value: {0}")]
    InvalidValue(String),
}

pub fn load() -> Result<Settings, SettingsError> {
    load_with_sources().map(|resolved| resolved.settings)
}

/// Defaults, then the TOML file named by `GINGA_CONFIG`, then `GINGA_*`
/// variables.
pub fn load_with_sources() -> Result<ResolvedSettings, SettingsError> {
    resolve(|key| std::env::var(key).ok())
}

/// Same as [`load_with_sources`] with an explicit variable lookup.
pub fn resolve<F>(lookup: F) -> Result<ResolvedSettings, SettingsError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut cfg = Settings::default();
    let mut sources = SettingsSources::default();
    let var = |key: &str| lookup(key).filter(|v| !v.is_empty());

    if let Some(path) = var(CONFIG_ENV) {
        let text = fs::read_to_string(path)?;
        let file: FileSettings = toml::from_str(&text)?;
        apply_file(&mut cfg, &mut sources, file);
    }

    if let Some(v) = var("GINGA_DB") {
        cfg.database_path = PathBuf::from(v);
        sources.database_path = ValueSource::Env;
    }
    if let Some(v) = var("GINGA_ADMIN_ID") {
        cfg.admin_id = Some(parse_env("GINGA_ADMIN_ID", v)?);
        sources.admin_id = ValueSource::Env;
    }
    if let Some(v) = var("GINGA_BOT_USERNAME") {
        cfg.bot_username = v;
        sources.bot_username = ValueSource::Env;
    }
    if let Some(v) = var("GINGA_CHANNEL") {
        cfg.channel = v;
        sources.channel = ValueSource::Env;
    }
    if let Some(v) = var("GINGA_DAILY_BONUS") {
        cfg.daily_bonus = parse_env("GINGA_DAILY_BONUS", v)?;
        sources.daily_bonus = ValueSource::Env;
    }
    if let Some(v) = var("GINGA_WORD_REWARD") {
        cfg.word_reward = parse_env("GINGA_WORD_REWARD", v)?;
        sources.word_reward = ValueSource::Env;
    }
    if let Some(v) = var("GINGA_SEED") {
        cfg.seed = Some(parse_env("GINGA_SEED", v)?);
        sources.seed = ValueSource::Env;
    }
    if let Some(v) = var("GINGA_HOST") {
        cfg.host = v;
        sources.host = ValueSource::Env;
    }
    if let Some(v) = var("GINGA_PORT") {
        cfg.port = parse_env("GINGA_PORT", v)?;
        sources.port = ValueSource::Env;
    }

    cfg.validate()?;
    Ok(ResolvedSettings {
        settings: cfg,
        sources,
    })
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    database_path: Option<PathBuf>,
    admin_id: Option<i64>,
    bot_username: Option<String>,
    channel: Option<String>,
    daily_bonus: Option<u64>,
    word_reward: Option<u64>,
    seed: Option<u64>,
    host: Option<String>,
    port: Option<u16>,
}

fn apply_file(cfg: &mut Settings, sources: &mut SettingsSources, file: FileSettings) {
    if let Some(v) = file.database_path {
        cfg.database_path = v;
        sources.database_path = ValueSource::File;
    }
    if let Some(v) = file.admin_id {
        cfg.admin_id = Some(v);
        sources.admin_id = ValueSource::File;
    }
    if let Some(v) = file.bot_username {
        cfg.bot_username = v;
        sources.bot_username = ValueSource::File;
    }
    if let Some(v) = file.channel {
        cfg.channel = v;
        sources.channel = ValueSource::File;
    }
    if let Some(v) = file.daily_bonus {
        cfg.daily_bonus = v;
        sources.daily_bonus = ValueSource::File;
    }
    if let Some(v) = file.word_reward {
        cfg.word_reward = v;
        sources.word_reward = ValueSource::File;
    }
    if let Some(v) = file.seed {
        cfg.seed = Some(v);
        sources.seed = ValueSource::File;
    }
    if let Some(v) = file.host {
        cfg.host = v;
        sources.host = ValueSource::File;
    }
    if let Some(v) = file.port {
        cfg.port = v;
        sources.port = ValueSource::File;
    }
}

fn parse_env<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, SettingsError> {
    value
        .trim()
        .parse()
        .map_err(|_| SettingsError::InvalidEnv { key, value })
}
