use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Commented config written when no config file exists. Values match [`crate::AppConfig::default`].
pub const TEMPLATE: &str = r#"{
  // Force debug logging regardless of logLevel.
  "debug": false,
  // One of: error, warn, info, debug. RUST_LOG overrides it.
  "logLevel": "info",
  "autoUpdate": false,
  // Error and warn events are also written to <logDir>/<platform>/<date>.log
  "logDir": "logs",

  "bot": {
    // User ids allowed to run owner-only commands such as /status.
    "owners": [],
    "defaultLanguage": "en"
  },

  "platforms": {
    "telegram": {
      "enabled": false,
      // Or set TELEGRAM_BOT_TOKEN / BOT_TOKEN.
      "token": "",
      "apiUrl": null
    },
    "discord": {
      "enabled": false,
      // Or set DISCORD_BOT_TOKEN.
      "token": "",
      "applicationId": "",
      "apiUrl": null
    }
  },

  /* Reserved for storage and HTTP API integrations. */
  "database": {
    "enabled": false,
    "url": "file:./pagebot.db"
  },
  "api": {
    "enabled": false,
    "host": "127.0.0.1",
    "port": 3000
  }
}
"#;

/// Writes [`TEMPLATE`] to `path`, creating parent directories.
pub fn write_template(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, TEMPLATE).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}
