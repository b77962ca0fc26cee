use thiserror::Error;

/// Builder misuse, reported by `build()`.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BuildError {
    #[error("Page name is required")]
    MissingPageName,

    #[error("Button '{text}' needs an action, a next page, or a command")]
    ButtonWithoutEffect { text: String },
}
