//! # Command registry
//!
//! Maps command names and aliases (case-insensitive) to [`Command`] records. Several keys may point
//! at the same record; listing deduplicates by record identity. [`CommandRegistry::show_help`]
//! formats the help-eligible commands with optional pagination.

mod command;
mod help;
mod registry;

pub use command::{Command, CommandHandler};
pub use help::{HelpOptions, NO_COMMANDS};
pub use registry::{CommandRegistry, RegistryError};

// Integration tests live in tests/command_registry_test.rs
