//! pagebot configuration.
//!
//! The file is JSON with `//` and `/* */` comments. [`load_or_init`] writes a commented
//! template when the file is missing and falls back to defaults when it cannot be parsed;
//! environment variables then override tokens and logging.

mod error;
mod jsonc;
mod loader;
mod schema;
mod template;


pub use error::ConfigError;
pub use jsonc::strip_comments;
pub use loader::{apply_env_overrides, load_or_init, parse_config, LoadedConfig, LoadSource};
pub use schema::{
    ApiConfig, AppConfig, BotSection, DatabaseConfig, DiscordPlatformConfig, LogLevel,
    PlatformsConfig, TelegramPlatformConfig,
};
pub use template::{write_template, TEMPLATE};
