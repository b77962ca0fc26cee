use thiserror::Error;

#[derive(Error, Debug)]
pub enum PagebotError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Handler error: {0}")]
    Handler(String),

    #[error("Unknown platform: {0}")]
    UnknownPlatform(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl PagebotError {
    /// Shorthand for handler failures raised by user code (commands, hooks, actions).
    pub fn handler(reason: impl Into<String>) -> Self {
        Self::Handler(reason.into())
    }
}

/// Failures talking to a chat platform.
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Invalid chat id: {0}")]
    InvalidChatId(String),

    #[error("Invalid message id: {0}")]
    InvalidMessageId(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("Operation not supported: {0}")]
    NotSupported(String),
}

pub type Result<T> = std::result::Result<T, PagebotError>;
