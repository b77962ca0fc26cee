//! [`Transport`] over teloxide. Chat ids are Telegram's numeric ids as strings.

use async_trait::async_trait;
use pagebot_core::{Chat, Platform, Result, SentMessage, Transport, TransportError};
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId};
use tracing::debug;

pub fn parse_chat_id(id: &str) -> std::result::Result<ChatId, TransportError> {
    id.trim()
        .parse::<i64>()
        .map(ChatId)
        .map_err(|_| TransportError::InvalidChatId(id.to_string()))
}

pub fn parse_message_id(id: &str) -> std::result::Result<MessageId, TransportError> {
    id.trim()
        .parse::<i32>()
        .map(MessageId)
        .map_err(|_| TransportError::InvalidMessageId(id.to_string()))
}

fn api_error(e: teloxide::RequestError) -> TransportError {
    TransportError::Api(e.to_string())
}

/// Sends through a teloxide [`Bot`]. Cheap to clone; the bot is reference-counted internally.
#[derive(Clone)]
pub struct TelegramTransport {
    bot: Bot,
}

impl TelegramTransport {
    pub fn new(bot: Bot) -> Self {
        Self { bot }
    }

    /// The underlying teloxide client for direct API use.
    pub fn inner(&self) -> &Bot {
        &self.bot
    }
}

#[async_trait]
impl Transport for TelegramTransport {
    fn platform(&self) -> Platform {
        Platform::Telegram
    }

    async fn send_message(&self, chat: &Chat, text: &str) -> Result<SentMessage> {
        let chat_id = parse_chat_id(&chat.id)?;
        let sent = self
            .bot
            .send_message(chat_id, text.to_string())
            .await
            .map_err(api_error)?;
        debug!(platform = %Platform::Telegram, chat_id = %chat.id, message_id = %sent.id, "Message sent");
        Ok(SentMessage {
            id: sent.id.0.to_string(),
            chat_id: chat.id.clone(),
        })
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        let chat_id = parse_chat_id(&chat.id)?;
        let message_id = parse_message_id(message_id)?;
        self.bot
            .edit_message_text(chat_id, message_id, text.to_string())
            .await
            .map_err(api_error)?;
        Ok(())
    }

    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()> {
        let chat_id = parse_chat_id(&chat.id)?;
        let message_id = parse_message_id(message_id)?;
        self.bot
            .delete_message(chat_id, message_id)
            .await
            .map_err(api_error)?;
        Ok(())
    }
}
