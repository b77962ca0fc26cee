//! # pagebot-cli
//!
//! Pieces of the `pagebot` binary that are worth testing on their own: argument parsing and
//! config loading, the platform bot factory, and the demo commands and pages.

pub mod cli;
pub mod demo;
pub mod factory;

pub use cli::{load_config, select_platforms, Cli, Commands};
pub use demo::install_demo;
pub use factory::PlatformBotFactory;
