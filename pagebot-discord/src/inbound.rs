//! Inbound side of a Discord bot, usable after its handle has been handed to the manager.
//!
//! A gateway client (e.g. serenity or twilight) feeds every `MESSAGE_CREATE` it receives into
//! [`DiscordInbound::handle_message`]; replies go out through the transport the manager attached
//! to the engine.

use std::sync::{Arc, RwLock};

use bot_runtime::{EngineError, InboundOutcome, InboundRouter};
use pagebot_core::{Chat, Context, Platform, User};
use tracing::debug;

#[derive(Clone)]
pub struct DiscordInbound {
    router: InboundRouter,
    /// Id of the bot account while the handle is started.
    bot_id: Arc<RwLock<Option<String>>>,
}

impl DiscordInbound {
    pub(crate) fn new(router: InboundRouter) -> Self {
        Self {
            router,
            bot_id: Arc::new(RwLock::new(None)),
        }
    }

    pub(crate) fn set_bot_id(&self, id: Option<String>) {
        *self
            .bot_id
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = id;
    }

    fn bot_id(&self) -> Option<String> {
        self.bot_id
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Whether the owning handle is started.
    pub fn is_running(&self) -> bool {
        self.bot_id().is_some()
    }

    /// Routes one channel message. Messages authored by the bot itself, and anything received
    /// while the handle is stopped, are ignored.
    pub async fn handle_message(
        &self,
        channel_id: &str,
        message_id: &str,
        author: User,
        text: &str,
    ) -> Result<InboundOutcome, EngineError> {
        let Some(bot_id) = self.bot_id() else {
            debug!(platform = %Platform::Discord, "Message received while stopped, ignored");
            return Ok(InboundOutcome::Ignored);
        };
        if bot_id == author.id {
            return Ok(InboundOutcome::Ignored);
        }
        let ctx = Context::in_chat(Chat::new(channel_id, "channel"))
            .with_user(author)
            .with_message_id(message_id);
        self.router.route(Platform::Discord, ctx, text).await
    }
}
