//! CLI parser and config loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use pagebot_config::{apply_env_overrides, load_or_init, AppConfig, LoadSource};
use pagebot_core::Platform;

pub const DEFAULT_CONFIG_PATH: &str = "pagebot.jsonc";

#[derive(Parser)]
#[command(name = "pagebot")]
#[command(about = "Multi-platform page/command chat bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start bots for the enabled platforms and run until SIGINT/SIGTERM.
    Run {
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
        /// Only start these platforms (default: every enabled platform).
        #[arg(short, long = "platform")]
        platforms: Vec<Platform>,
    },
    /// Write a commented config template.
    InitConfig {
        #[arg(default_value = DEFAULT_CONFIG_PATH)]
        path: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Print the help listing of the built-in commands.
    Commands {
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

/// Loads `path` (writing the template if missing) and applies environment overrides.
/// Load `.env` first so overrides see it.
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let loaded = load_or_init(path)
        .with_context(|| format!("Failed to load config from {}", path.display()))?;
    if loaded.source == LoadSource::TemplateCreated {
        eprintln!("Created config template at {}", path.display());
    }
    let mut config = loaded.config;
    apply_env_overrides(&mut config);
    Ok(config)
}

/// Platforms to start: the requested ones (in request order, deduplicated), or all enabled
/// ones when none were requested. Requested but disabled platforms are kept so the lifecycle
/// report says why they did not start.
pub fn select_platforms(config: &AppConfig, requested: &[Platform]) -> Vec<Platform> {
    if requested.is_empty() {
        return config.enabled_platforms();
    }
    let mut selected = Vec::with_capacity(requested.len());
    for p in requested {
        if !selected.contains(p) {
            selected.push(*p);
        }
    }
    selected
}
