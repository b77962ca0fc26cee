//! # pagebot-discord
//!
//! Discord platform layer over the REST API (v10): [`DiscordTransport`] sends, edits and deletes
//! channel messages, and [`DiscordBotHandle`] verifies the bot token on start. Gateway event
//! delivery is left to the embedding application, which passes messages to
//! [`DiscordInbound::handle_message`].

mod config;
mod handle;
mod inbound;
mod transport;

pub use config::{DiscordConfig, DEFAULT_API_URL};
pub use handle::DiscordBotHandle;
pub use inbound::DiscordInbound;
pub use transport::{CurrentUser, DiscordTransport};
