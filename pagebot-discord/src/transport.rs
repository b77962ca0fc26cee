//! [`Transport`] over the Discord REST API. Chat ids are channel snowflakes.

use async_trait::async_trait;
use pagebot_core::{Chat, Platform, Result, SentMessage, Transport, TransportError};
use reqwest::{Client, Method, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::config::DiscordConfig;

/// The bot account behind a token, from `GET /users/@me`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CurrentUser {
    pub id: String,
    pub username: String,
}

#[derive(Deserialize)]
struct MessageObject {
    id: String,
    channel_id: String,
}

/// Snowflakes are decimal digits only; anything else would change the request path.
fn check_snowflake(id: &str, err: fn(String) -> TransportError) -> std::result::Result<(), TransportError> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(err(id.to_string()));
    }
    Ok(())
}

fn request_error(e: reqwest::Error) -> TransportError {
    TransportError::Api(e.to_string())
}

#[derive(Clone)]
pub struct DiscordTransport {
    client: Client,
    config: DiscordConfig,
}

impl DiscordTransport {
    pub fn new(config: DiscordConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &DiscordConfig {
        &self.config
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
    ) -> std::result::Result<Response, TransportError> {
        let mut req = self
            .client
            .request(method.clone(), self.config.endpoint(path))
            .header("Authorization", format!("Bot {}", self.config.bot_token));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let resp = req.send().await.map_err(request_error)?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Api(format!(
                "Discord {} {} failed ({}): {}",
                method, path, status, body
            )));
        }
        Ok(resp)
    }

    /// Checks the token and returns the bot account it belongs to.
    pub async fn current_user(&self) -> Result<CurrentUser> {
        let resp = self.request(Method::GET, "users/@me", None).await?;
        Ok(resp.json().await.map_err(request_error)?)
    }
}

#[async_trait]
impl Transport for DiscordTransport {
    fn platform(&self) -> Platform {
        Platform::Discord
    }

    async fn send_message(&self, chat: &Chat, text: &str) -> Result<SentMessage> {
        check_snowflake(&chat.id, TransportError::InvalidChatId)?;
        let path = format!("channels/{}/messages", chat.id);
        let resp = self
            .request(Method::POST, &path, Some(json!({ "content": text })))
            .await?;
        let message: MessageObject = resp.json().await.map_err(request_error)?;
        debug!(platform = %Platform::Discord, channel_id = %message.channel_id, message_id = %message.id, "Message sent");
        Ok(SentMessage {
            id: message.id,
            chat_id: message.channel_id,
        })
    }

    async fn edit_message(&self, chat: &Chat, message_id: &str, text: &str) -> Result<()> {
        check_snowflake(&chat.id, TransportError::InvalidChatId)?;
        check_snowflake(message_id, TransportError::InvalidMessageId)?;
        let path = format!("channels/{}/messages/{}", chat.id, message_id);
        self.request(Method::PATCH, &path, Some(json!({ "content": text })))
            .await?;
        Ok(())
    }

    async fn delete_message(&self, chat: &Chat, message_id: &str) -> Result<()> {
        check_snowflake(&chat.id, TransportError::InvalidChatId)?;
        check_snowflake(message_id, TransportError::InvalidMessageId)?;
        let path = format!("channels/{}/messages/{}", chat.id, message_id);
        self.request(Method::DELETE, &path, None).await?;
        Ok(())
    }
}
