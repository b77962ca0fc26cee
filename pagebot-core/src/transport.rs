//! Transport abstraction for sending, editing and deleting messages.
//!
//! [`Transport`] is platform-agnostic; pagebot-telegram and pagebot-discord implement it with real clients.

use crate::error::Result;
use crate::platform::Platform;
use crate::types::{Chat, RenderedPage};
use async_trait::async_trait;

/// A message accepted by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    /// Transport-specific message id (Telegram numeric string, Discord snowflake).
    pub id: String,
    pub chat_id: String,
}

/// Send/edit/delete capability of one platform. The page engine depends on this only.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Platform this transport delivers to.
    fn platform(&self) -> Platform;
    /// Sends a text message to the given chat and returns the platform's id for it.
    async fn send_message(&self, chat: &Chat, text: &str) -> Result<SentMessage>;
    /// Replaces the text of an already-sent message.
    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()>;
    /// Deletes an already-sent message.
    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()>;
    /// Sends a rendered page. Default: the page's plain-text form.
    async fn send_page(&self, chat: &Chat, page: &RenderedPage) -> Result<SentMessage> {
        self.send_message(chat, &page.to_text()).await
    }
}
