//! Telegram connection settings: token and optional Bot API URL.

use pagebot_core::TransportError;

#[derive(Debug, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    /// Custom Bot API server; `None` uses api.telegram.org.
    pub api_url: Option<String>,
}

impl TelegramConfig {
    pub fn with_token(bot_token: impl Into<String>) -> Self {
        Self {
            bot_token: bot_token.into(),
            api_url: None,
        }
    }

    pub fn with_api_url(mut self, api_url: Option<String>) -> Self {
        self.api_url = api_url;
        self
    }

    /// Builds the teloxide client, pointing it at `api_url` when set.
    pub fn build_bot(&self) -> Result<teloxide::Bot, TransportError> {
        let bot = teloxide::Bot::new(&self.bot_token);
        match &self.api_url {
            Some(url) => {
                let url = reqwest::Url::parse(url).map_err(|e| {
                    TransportError::Api(format!("Invalid Telegram API URL {}: {}", url, e))
                })?;
                Ok(bot.set_api_url(url))
            }
            None => Ok(bot),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_token() {
        let config = TelegramConfig::with_token("test_token");
        assert_eq!(config.bot_token, "test_token");
        assert!(config.api_url.is_none());
        assert!(config.build_bot().is_ok());
    }

    #[test]
    fn test_build_bot_rejects_invalid_url() {
        let config =
            TelegramConfig::with_token("t").with_api_url(Some("not a url".to_string()));
        assert!(config.build_bot().is_err());
    }
}
