//! # pagebot-core
//!
//! Core types shared by every pagebot crate: [`Platform`], [`Context`], the [`Transport`]
//! capability implemented by platform clients, error types, and tracing initialization.
//! Transport-agnostic; used by command-registry, page-graph, bot-runtime and the platform crates.

pub mod error;
pub mod logger;
pub mod platform;
pub mod transport;
pub mod types;

pub use error::{PagebotError, Result, TransportError};
pub use logger::{capture_events, init_tracing, DeferredEvent, LogSettings};
pub use platform::Platform;
pub use transport::{SentMessage, Transport};
pub use types::{Chat, Context, RenderedButton, RenderedPage, User};
