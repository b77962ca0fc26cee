use pagebot_core::{PagebotError, Platform};
use thiserror::Error;

/// Failures while executing buttons, pages and commands.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Action of button '{button}' failed: {source}")]
    Action {
        button: String,
        #[source]
        source: PagebotError,
    },

    #[error("{hook} hook of page '{page}' failed: {source}")]
    Hook {
        page: String,
        hook: &'static str,
        #[source]
        source: PagebotError,
    },

    #[error("Command '{name}' failed: {source}")]
    Command {
        name: String,
        #[source]
        source: PagebotError,
    },

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("No page is currently shown in this chat")]
    NoActivePage,

    #[error("Button {index} does not exist (page has {available} buttons)")]
    ButtonOutOfRange { index: usize, available: usize },
}

/// Bot start/stop failures. The display strings double as batch report messages.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("Platform {0} is not enabled")]
    NotEnabled(Platform),

    #[error("Bot for {0} is already running")]
    AlreadyRunning(Platform),

    #[error("No running bot found for {0}")]
    NotRunning(Platform),

    #[error("Platform {0} is not supported by this bot factory")]
    Unsupported(Platform),

    #[error("Failed to create bot for {platform}: {reason}")]
    Create { platform: Platform, reason: String },

    #[error("Failed to start bot for {platform}: {source}")]
    StartFailed {
        platform: Platform,
        #[source]
        source: PagebotError,
    },

    #[error("Failed to stop bot for {platform}: {source}")]
    StopFailed {
        platform: Platform,
        #[source]
        source: PagebotError,
    },
}
