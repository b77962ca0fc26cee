//! # pagebot-telegram
//!
//! Telegram platform layer: [`TelegramTransport`] implements [`pagebot_core::Transport`] over
//! teloxide, [`TelegramBotHandle`] runs a teloxide dispatcher that feeds text messages to a
//! [`bot_runtime::InboundRouter`], and the adapters convert teloxide types to core types.

mod adapters;
mod config;
mod handle;
mod transport;

pub use adapters::{context_from_message, user_from_telegram};
pub use config::TelegramConfig;
pub use handle::TelegramBotHandle;
pub use transport::{parse_chat_id, parse_message_id, TelegramTransport};
