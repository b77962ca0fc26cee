//! Builds Telegram and Discord handles from the loaded configuration.

use std::sync::{Arc, Mutex};

use bot_runtime::{BotFactory, BotHandle, InboundRouter, LifecycleError};
use pagebot_config::AppConfig;
use pagebot_core::Platform;
use pagebot_discord::{DiscordBotHandle, DiscordConfig, DiscordInbound};
use pagebot_telegram::{TelegramBotHandle, TelegramConfig};

/// Holds per-platform connection settings; a platform without settings is unsupported.
#[derive(Clone, Default)]
pub struct PlatformBotFactory {
    telegram: Option<TelegramConfig>,
    discord: Option<DiscordConfig>,
    /// Inbound entry of the most recently created Discord handle.
    discord_inbound: Arc<Mutex<Option<DiscordInbound>>>,
}

impl PlatformBotFactory {
    /// Settings for every platform that has a token, enabled or not.
    pub fn from_config(config: &AppConfig) -> Self {
        let tg = &config.platforms.telegram;
        let telegram = (!tg.token.trim().is_empty()).then(|| {
            TelegramConfig::with_token(tg.token.clone()).with_api_url(tg.api_url.clone())
        });

        let dc = &config.platforms.discord;
        let discord = (!dc.token.trim().is_empty()).then(|| {
            DiscordConfig::new(dc.token.clone())
                .with_application_id(dc.application_id.clone())
                .with_api_url(dc.api_url.clone())
        });

        Self {
            telegram,
            discord,
            discord_inbound: Arc::default(),
        }
    }

    /// Where a Discord gateway client delivers messages, once a Discord handle was created.
    /// Keep a clone of the factory's `Arc` to reach it after it is handed to the app.
    pub fn discord_inbound(&self) -> Option<DiscordInbound> {
        self.discord_inbound
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn supports(&self, platform: Platform) -> bool {
        match platform {
            Platform::Telegram => self.telegram.is_some(),
            Platform::Discord => self.discord.is_some(),
        }
    }
}

impl BotFactory for PlatformBotFactory {
    fn create(
        &self,
        platform: Platform,
        router: InboundRouter,
    ) -> Result<Box<dyn BotHandle>, LifecycleError> {
        match platform {
            Platform::Telegram => {
                let config = self
                    .telegram
                    .as_ref()
                    .ok_or(LifecycleError::Unsupported(platform))?;
                let handle = TelegramBotHandle::new(config, router).map_err(|e| {
                    LifecycleError::Create {
                        platform,
                        reason: e.to_string(),
                    }
                })?;
                Ok(Box::new(handle))
            }
            Platform::Discord => {
                let config = self
                    .discord
                    .clone()
                    .ok_or(LifecycleError::Unsupported(platform))?;
                let handle = DiscordBotHandle::new(config, router);
                *self
                    .discord_inbound
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(handle.inbound());
                Ok(Box::new(handle))
            }
        }
    }
}
