//! Discord bot handle. Start verifies the token; inbound messages arrive through the
//! [`DiscordInbound`] taken from [`DiscordBotHandle::inbound`].

use std::sync::Arc;

use async_trait::async_trait;
use bot_runtime::{BotHandle, InboundRouter};
use pagebot_core::{Platform, Result, Transport};
use tracing::{info, instrument};

use crate::config::DiscordConfig;
use crate::inbound::DiscordInbound;
use crate::transport::{CurrentUser, DiscordTransport};

pub struct DiscordBotHandle {
    transport: Arc<DiscordTransport>,
    inbound: DiscordInbound,
    bot_user: Option<CurrentUser>,
}

impl DiscordBotHandle {
    pub fn new(config: DiscordConfig, router: InboundRouter) -> Self {
        Self {
            transport: Arc::new(DiscordTransport::new(config)),
            inbound: DiscordInbound::new(router),
            bot_user: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.bot_user.is_some()
    }

    /// The bot account, known once started.
    pub fn bot_user(&self) -> Option<&CurrentUser> {
        self.bot_user.as_ref()
    }

    /// Inbound entry for this bot. Take it before the handle is boxed; clones stay valid for
    /// the handle's whole life and follow its start/stop state.
    pub fn inbound(&self) -> DiscordInbound {
        self.inbound.clone()
    }
}

#[async_trait]
impl BotHandle for DiscordBotHandle {
    fn platform(&self) -> Platform {
        Platform::Discord
    }

    fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    #[instrument(skip(self))]
    async fn start(&mut self) -> Result<()> {
        let me = self.transport.current_user().await?;
        info!(platform = %Platform::Discord, bot_id = %me.id, username = %me.username, "Token verified");
        self.inbound.set_bot_id(Some(me.id.clone()));
        self.bot_user = Some(me);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        self.inbound.set_bot_id(None);
        if self.bot_user.take().is_some() {
            info!(platform = %Platform::Discord, "Bot stopped");
        }
        Ok(())
    }
}
