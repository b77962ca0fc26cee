use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config template {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("platforms.{platform}.enabled is true but no token is configured")]
    MissingToken { platform: &'static str },

    #[error("platforms.{platform}.apiUrl is not a valid URL: {url}")]
    InvalidApiUrl { platform: &'static str, url: String },
}
