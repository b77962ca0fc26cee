//! pagebot: run the configured chat bots until SIGINT/SIGTERM.

use std::sync::Arc;

use anyhow::{bail, Context, Result};
use bot_runtime::BotApp;
use clap::Parser;
use command_registry::HelpOptions;
use pagebot_cli::{install_demo, load_config, select_platforms, Cli, Commands, PlatformBotFactory};
use pagebot_config::write_template;
use pagebot_core::{capture_events, init_tracing, Platform};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, platforms } => run(&config, &platforms).await,
        Commands::InitConfig { path, force } => {
            if path.exists() && !force {
                bail!("{} already exists (use --force to overwrite)", path.display());
            }
            write_template(&path)?;
            println!("Wrote config template to {}", path.display());
            Ok(())
        }
        Commands::Commands { config } => {
            let config = load_config(&config)?;
            let app = BotApp::new(
                config.enabled_platforms(),
                Arc::new(PlatformBotFactory::from_config(&config)),
            )
            .with_owners(config.bot.owners.clone());
            install_demo(&app)?;
            println!("{}", app.commands().show_help(HelpOptions::default()));
            Ok(())
        }
    }
}

async fn run(config_path: &std::path::Path, requested: &[Platform]) -> Result<()> {
    // Config warnings are emitted before the subscriber exists; replay them once it does.
    let (loaded, deferred) = capture_events(|| load_config(config_path));
    let config = loaded?;
    init_tracing(&config.log_settings())?;
    for event in &deferred {
        event.replay();
    }
    config.validate().context("Invalid configuration")?;

    let platforms = select_platforms(&config, requested);
    if platforms.is_empty() {
        bail!(
            "No platform is enabled. Set platforms.<name>.enabled in {}",
            config_path.display()
        );
    }

    let app = BotApp::new(
        config.enabled_platforms(),
        Arc::new(PlatformBotFactory::from_config(&config)),
    )
    .with_owners(config.bot.owners.clone());
    install_demo(&app)?;

    if platforms.contains(&Platform::Discord) {
        warn!(
            platform = %Platform::Discord,
            "No gateway client is bundled; Discord only sends until messages are fed to PlatformBotFactory::discord_inbound"
        );
    }
    info!(platforms = ?platforms, owners = app.owners().len(), "Starting pagebot");
    app.run_until_signal(&platforms).await;
    info!("pagebot exited");
    Ok(())
}
