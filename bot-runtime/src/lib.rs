//! # bot-runtime
//!
//! Ties the command registry and page graph to platforms: [`BotEngine`] executes buttons and
//! tracks the page shown in each chat, [`InboundRouter`] turns incoming text into commands or
//! button presses, and [`BotManager`] starts and stops one [`BotHandle`] per platform.
//! [`BotApp`] owns all of it for one bot process.

mod app;
mod engine;
mod error;
mod inbound;
mod manager;
mod session;
pub mod shutdown;

pub use app::BotApp;
pub use engine::{BotEngine, CommandDispatch, ExecutionReport};
pub use error::{EngineError, LifecycleError};
pub use inbound::{parse_button_number, parse_command, InboundOutcome, InboundRouter};
pub use manager::{BotFactory, BotHandle, BotManager, LifecycleReport, NO_RUNNING_BOTS};
pub use session::{SessionKey, SessionStore};
