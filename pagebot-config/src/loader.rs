//! Loading: file (or template), then environment overrides.

use std::env;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::error::ConfigError;
use crate::jsonc::strip_comments;
use crate::schema::{union_owners, AppConfig};
use crate::template::write_template;

/// Where the loaded values came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadSource {
    File,
    /// The file was missing and a template was written.
    TemplateCreated,
    /// The file could not be parsed; defaults are in effect.
    Defaults,
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AppConfig,
    pub source: LoadSource,
}

/// Parses JSON-with-comments into a config. Invalid JSON yields `None`.
pub fn parse_config(text: &str) -> Option<AppConfig> {
    match serde_json::from_str::<serde_json::Value>(&strip_comments(text)) {
        Ok(value) => Some(AppConfig::from_value(&value)),
        Err(e) => {
            warn!(error = %e, "Config is not valid JSON");
            None
        }
    }
}

/// Loads `path`, writing the template first if it does not exist. Parse problems are logged
/// and replaced by defaults; only I/O errors other than "not found" are returned.
pub fn load_or_init(path: &Path) -> Result<LoadedConfig, ConfigError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            write_template(path)?;
            info!(path = %path.display(), "Config not found, wrote template with defaults");
            return Ok(LoadedConfig {
                config: AppConfig::default(),
                source: LoadSource::TemplateCreated,
            });
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    match parse_config(&text) {
        Some(config) => Ok(LoadedConfig {
            config,
            source: LoadSource::File,
        }),
        None => {
            warn!(path = %path.display(), "Malformed config, using defaults");
            Ok(LoadedConfig {
                config: AppConfig::default(),
                source: LoadSource::Defaults,
            })
        }
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Applies environment overrides. Load `.env` before calling.
///
/// - `TELEGRAM_BOT_TOKEN` (or `BOT_TOKEN`), `DISCORD_BOT_TOKEN`: platform tokens
/// - `PAGEBOT_LOG_LEVEL`, `PAGEBOT_LOG_DIR`: logging
/// - `PAGEBOT_OWNERS`: comma-separated ids added to `bot.owners`
pub fn apply_env_overrides(config: &mut AppConfig) {
    if let Some(token) = non_empty_var("TELEGRAM_BOT_TOKEN").or_else(|| non_empty_var("BOT_TOKEN")) {
        config.platforms.telegram.token = token;
    }
    if let Some(token) = non_empty_var("DISCORD_BOT_TOKEN") {
        config.platforms.discord.token = token;
    }
    if let Some(level) = non_empty_var("PAGEBOT_LOG_LEVEL") {
        match level.parse() {
            Ok(level) => config.log_level = level,
            Err(e) => warn!(error = %e, "Ignoring PAGEBOT_LOG_LEVEL"),
        }
    }
    if let Some(dir) = non_empty_var("PAGEBOT_LOG_DIR") {
        config.log_dir = dir.into();
    }
    if let Some(owners) = non_empty_var("PAGEBOT_OWNERS") {
        let extra: Vec<String> = owners.split(',').map(str::to_string).collect();
        config.bot.owners = union_owners(&config.bot.owners, &extra);
    }
}
