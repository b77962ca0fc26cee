//! Telegram bot handle: verifies the token, then runs a teloxide dispatcher in a background task.

use std::sync::Arc;

use async_trait::async_trait;
use bot_runtime::{BotHandle, InboundRouter};
use pagebot_core::{Platform, Result, Transport, TransportError};
use teloxide::dispatching::ShutdownToken;
use teloxide::prelude::*;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument, warn};

use crate::adapters::context_from_message;
use crate::config::TelegramConfig;
use crate::transport::TelegramTransport;

struct Running {
    token: ShutdownToken,
    task: JoinHandle<()>,
}

pub struct TelegramBotHandle {
    bot: Bot,
    transport: Arc<TelegramTransport>,
    router: InboundRouter,
    running: Option<Running>,
}

impl TelegramBotHandle {
    pub fn new(
        config: &TelegramConfig,
        router: InboundRouter,
    ) -> std::result::Result<Self, TransportError> {
        let bot = config.build_bot()?;
        Ok(Self {
            transport: Arc::new(TelegramTransport::new(bot.clone())),
            bot,
            router,
            running: None,
        })
    }

    pub fn is_running(&self) -> bool {
        self.running.is_some()
    }
}

/// Passes one text message to the router. Non-text messages are skipped.
async fn handle_message(router: &InboundRouter, msg: Message) {
    let Some(text) = msg.text() else {
        debug!(platform = %Platform::Telegram, chat_id = msg.chat.id.0, "Received non-text message");
        return;
    };
    let ctx = context_from_message(&msg);
    info!(
        platform = %Platform::Telegram,
        chat_id = msg.chat.id.0,
        user_id = ctx.user_id().unwrap_or("-"),
        "Received message"
    );
    if let Err(e) = router.route(Platform::Telegram, ctx, text).await {
        warn!(platform = %Platform::Telegram, chat_id = msg.chat.id.0, error = %e, "Message handling failed");
    }
}

#[async_trait]
impl BotHandle for TelegramBotHandle {
    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    #[instrument(skip(self))]
    async fn start(&mut self) -> Result<()> {
        if self.running.is_some() {
            return Ok(());
        }

        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TransportError::Api(format!("getMe failed: {}", e)))?;
        info!(
            platform = %Platform::Telegram,
            username = me.user.username.as_deref().unwrap_or("-"),
            "Token verified"
        );

        let router = self.router.clone();
        let handler = Update::filter_message().endpoint(move |msg: Message| {
            let router = router.clone();
            async move {
                handle_message(&router, msg).await;
                respond(())
            }
        });

        let mut dispatcher = Dispatcher::builder(self.bot.clone(), handler).build();
        let token = dispatcher.shutdown_token();
        let task = tokio::spawn(async move {
            dispatcher.dispatch().await;
        });

        self.running = Some(Running { token, task });
        Ok(())
    }

    #[instrument(skip(self))]
    async fn stop(&mut self) -> Result<()> {
        let Some(running) = self.running.take() else {
            return Ok(());
        };

        match running.token.shutdown() {
            Ok(done) => done.await,
            Err(_) => {
                // Dispatcher not polling yet; nothing to drain.
                debug!(platform = %Platform::Telegram, "Dispatcher idle, aborting task");
                running.task.abort();
            }
        }

        match running.task.await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => {
                error!(platform = %Platform::Telegram, error = %e, "Dispatcher task failed");
                return Err(TransportError::Api(format!("dispatcher task failed: {}", e)).into());
            }
        }
        info!(platform = %Platform::Telegram, "Dispatcher stopped");
        Ok(())
    }
}
