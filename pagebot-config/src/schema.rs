//! Typed configuration schema. Every field has a default, so partial files are fine.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use pagebot_core::{LogSettings, Platform};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::ConfigError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            other => Err(format!("unknown log level: {}", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BotSection {
    /// User ids allowed to run owner-only commands.
    pub owners: Vec<String>,
    pub default_language: String,
}

impl Default for BotSection {
    fn default() -> Self {
        Self {
            owners: Vec::new(),
            default_language: "en".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TelegramPlatformConfig {
    pub enabled: bool,
    pub token: String,
    /// Bot API base URL, for a local Bot API server or tests.
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DiscordPlatformConfig {
    pub enabled: bool,
    pub token: String,
    pub application_id: String,
    /// REST base URL; defaults to `https://discord.com/api/v10`.
    pub api_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformsConfig {
    pub telegram: TelegramPlatformConfig,
    pub discord: DiscordPlatformConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseConfig {
    pub enabled: bool,
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: "file:./pagebot.db".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ApiConfig {
    pub enabled: bool,
    pub host: String,
    pub port: u16,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

/// The whole configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppConfig {
    pub debug: bool,
    pub log_level: LogLevel,
    pub auto_update: bool,
    pub log_dir: PathBuf,
    pub bot: BotSection,
    pub platforms: PlatformsConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            debug: false,
            log_level: LogLevel::Info,
            auto_update: false,
            log_dir: PathBuf::from("logs"),
            bot: BotSection::default(),
            platforms: PlatformsConfig::default(),
            database: DatabaseConfig::default(),
            api: ApiConfig::default(),
        }
    }
}

/// Overlays `parsed` onto `defaults` leaf by leaf.
///
/// Objects are walked key by key along the default shape; keys the defaults do not know are
/// dropped. A leaf is taken from `parsed` only if the default document still deserializes with
/// that one value swapped in, so a bad value falls back to its own default and nothing else.
fn reconcile(defaults: &Value, parsed: &Value) -> Value {
    let mut merged = defaults.clone();
    let mut path = Vec::new();
    overlay(defaults, defaults, parsed, &mut path, &mut merged);
    merged
}

fn overlay(
    root: &Value,
    default: &Value,
    parsed: &Value,
    path: &mut Vec<String>,
    merged: &mut Value,
) {
    match (default, parsed) {
        (_, Value::Null) => {}
        (Value::Object(default_map), Value::Object(parsed_map)) => {
            for (key, default_child) in default_map {
                if let Some(parsed_child) = parsed_map.get(key) {
                    path.push(key.clone());
                    overlay(root, default_child, parsed_child, path, merged);
                    path.pop();
                }
            }
        }
        (Value::Object(_), _) => {
            warn!(key = %path.join("."), "Config value is not an object, using defaults");
        }
        _ => {
            let pointer = json_pointer(path);
            if accepts_leaf(root, &pointer, parsed) {
                if let Some(slot) = merged.pointer_mut(&pointer) {
                    *slot = parsed.clone();
                }
            } else {
                warn!(key = %path.join("."), "Invalid config value, using default");
            }
        }
    }
}

fn json_pointer(path: &[String]) -> String {
    path.iter().map(|key| format!("/{}", key)).collect()
}

/// Whether the defaults still deserialize as an [`AppConfig`] with `value` at `pointer`.
fn accepts_leaf(root: &Value, pointer: &str, value: &Value) -> bool {
    let mut candidate = root.clone();
    match candidate.pointer_mut(pointer) {
        Some(slot) => *slot = value.clone(),
        None => return false,
    }
    serde_json::from_value::<AppConfig>(candidate).is_ok()
}

/// Appends `extra` to `base`, skipping ids already present. First appearance wins the position.
pub(crate) fn union_owners(base: &[String], extra: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(base.len() + extra.len());
    for id in base.iter().chain(extra) {
        let id = id.trim();
        if !id.is_empty() && !merged.iter().any(|m| m == id) {
            merged.push(id.to_string());
        }
    }
    merged
}

impl AppConfig {
    /// Reconciles a parsed document against the defaults.
    ///
    /// Unknown keys are dropped and missing keys are filled in. A value of the wrong type falls
    /// back to its default while its siblings still load. Owners are unioned with the default
    /// owners.
    pub fn from_value(root: &Value) -> Self {
        let defaults = AppConfig::default();
        if !root.is_object() {
            warn!("Config root is not an object, using defaults");
            return defaults;
        }
        let default_value = match serde_json::to_value(&defaults) {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Could not serialize default config, using defaults");
                return defaults;
            }
        };

        let mut config: AppConfig = match serde_json::from_value(reconcile(&default_value, root)) {
            Ok(config) => config,
            Err(e) => {
                warn!(error = %e, "Reconciled config did not deserialize, using defaults");
                return defaults;
            }
        };
        config.bot.owners = union_owners(&defaults.bot.owners, &config.bot.owners);
        config
    }

    /// Platforms with `enabled: true`, in platform order.
    pub fn enabled_platforms(&self) -> Vec<Platform> {
        Platform::ALL
            .into_iter()
            .filter(|p| match p {
                Platform::Telegram => self.platforms.telegram.enabled,
                Platform::Discord => self.platforms.discord.enabled,
            })
            .collect()
    }

    /// `debug: true` forces the debug level.
    pub fn effective_log_level(&self) -> LogLevel {
        if self.debug {
            LogLevel::Debug
        } else {
            self.log_level
        }
    }

    pub fn log_settings(&self) -> LogSettings {
        LogSettings {
            level: self.effective_log_level().as_str().to_string(),
            log_dir: self.log_dir.clone(),
            file_sink: true,
        }
    }

    pub fn is_owner(&self, user_id: &str) -> bool {
        self.bot.owners.iter().any(|o| o == user_id)
    }

    /// Enabled platforms must have a token; configured API URLs must parse.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let telegram = &self.platforms.telegram;
        if telegram.enabled && telegram.token.trim().is_empty() {
            return Err(ConfigError::MissingToken {
                platform: Platform::Telegram.as_str(),
            });
        }
        check_url(Platform::Telegram, telegram.api_url.as_deref())?;

        let discord = &self.platforms.discord;
        if discord.enabled && discord.token.trim().is_empty() {
            return Err(ConfigError::MissingToken {
                platform: Platform::Discord.as_str(),
            });
        }
        check_url(Platform::Discord, discord.api_url.as_deref())?;
        Ok(())
    }
}

fn check_url(platform: Platform, url: Option<&str>) -> Result<(), ConfigError> {
    match url {
        Some(url) if reqwest::Url::parse(url).is_err() => Err(ConfigError::InvalidApiUrl {
            platform: platform.as_str(),
            url: url.to_string(),
        }),
        _ => Ok(()),
    }
}
