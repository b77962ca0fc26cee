//! Supported chat platforms.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PagebotError;

/// A chat backend the bot can run on. The enabled subset comes from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Discord,
    Telegram,
}

impl Platform {
    /// Every platform this build knows about.
    pub const ALL: [Platform; 2] = [Platform::Discord, Platform::Telegram];

    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Discord => "discord",
            Platform::Telegram => "telegram",
        }
    }

    /// The full supported set; buttons built without explicit platforms use this.
    pub fn all() -> BTreeSet<Platform> {
        Self::ALL.into_iter().collect()
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = PagebotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "discord" => Ok(Platform::Discord),
            "telegram" => Ok(Platform::Telegram),
            other => Err(PagebotError::UnknownPlatform(other.to_string())),
        }
    }
}
