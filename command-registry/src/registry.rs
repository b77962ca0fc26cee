//! The command table.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

use thiserror::Error;
use tracing::{debug, warn};

use crate::command::Command;
use crate::help::{format_help, HelpOptions};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Command key '{key}' is already bound to command '{existing}'")]
    KeyConflict { key: String, existing: String },
}

/// Name/alias → command table.
///
/// [`register`](Self::register) is last-write-wins per key. A command displaced from its primary
/// name stays reachable through any alias nobody overwrote; use
/// [`register_exclusive`](Self::register_exclusive) to refuse collisions instead.
#[derive(Default)]
pub struct CommandRegistry {
    commands: RwLock<HashMap<String, Arc<Command>>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds the command under its name and every alias, overwriting existing bindings.
    pub fn register(&self, command: Command) -> Arc<Command> {
        let command = Arc::new(command);
        let mut table = self
            .commands
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for key in command.keys() {
            if let Some(previous) = table.insert(key.to_string(), command.clone()) {
                if previous.name() != command.name() {
                    warn!(
                        key = %key,
                        previous = %previous.name(),
                        command = %command.name(),
                        "Command key overwritten"
                    );
                }
            }
        }
        debug!(command = %command.name(), aliases = command.alias_set().len(), "Command registered");
        command
    }

    /// Binds all keys or none: fails if any key is already bound.
    pub fn register_exclusive(&self, command: Command) -> Result<Arc<Command>, RegistryError> {
        let command = Arc::new(command);
        let mut table = self
            .commands
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        for key in command.keys() {
            if let Some(existing) = table.get(key) {
                return Err(RegistryError::KeyConflict {
                    key: key.to_string(),
                    existing: existing.name().to_string(),
                });
            }
        }
        for key in command.keys() {
            table.insert(key.to_string(), command.clone());
        }
        debug!(command = %command.name(), "Command registered exclusively");
        Ok(command)
    }

    /// Case-insensitive lookup by name or alias.
    pub fn get_command(&self, name: &str) -> Option<Arc<Command>> {
        let key = name.trim().to_lowercase();
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    /// Every distinct command record, deduplicated by identity. Order is unspecified.
    pub fn get_all_commands(&self) -> Vec<Arc<Command>> {
        let table = self.commands.read().unwrap_or_else(PoisonError::into_inner);
        let mut seen = HashSet::new();
        table
            .values()
            .filter(|c| seen.insert(Arc::as_ptr(c)))
            .cloned()
            .collect()
    }

    /// Commands with `show_in_list` set.
    pub fn get_visible_commands(&self) -> Vec<Arc<Command>> {
        self.get_all_commands()
            .into_iter()
            .filter(|c| c.is_shown_in_list())
            .collect()
    }

    /// `• name: description` lines for listed, help-eligible commands, sorted by name.
    pub fn show_help(&self, options: HelpOptions) -> String {
        let eligible = self
            .get_visible_commands()
            .into_iter()
            .filter(|c| c.is_shown_in_help())
            .collect();
        format_help(eligible, options)
    }

    /// Number of distinct commands.
    pub fn len(&self) -> usize {
        self.get_all_commands().len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}
