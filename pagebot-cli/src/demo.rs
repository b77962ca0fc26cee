//! Built-in commands and pages shipped with the `pagebot` binary.
//!
//! Commands: `/help [page]` (aliases `h`, `?`), `/start`, `/ping`, `/status` (owners only).
//! Pages: `home` links to `about` and `settings`; both link back.

use std::collections::BTreeSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use bot_runtime::{BotApp, BotEngine};
use chrono::{DateTime, Utc};
use command_registry::{Command, HelpOptions};
use page_graph::{BuildError, Button, ButtonStyle};
use pagebot_core::{Context, PagebotError, Platform};
use tracing::info;

/// Commands per `/help` page.
pub const HELP_PAGE_SIZE: usize = 5;

pub const HOME_PAGE: &str = "home";

/// Owner check usable from inside command handlers.
#[derive(Clone)]
struct Owners(Arc<BTreeSet<String>>);

impl Owners {
    fn contains(&self, ctx: &Context) -> bool {
        ctx.user_id().is_some_and(|id| self.0.contains(id))
    }
}

fn engine_gone() -> PagebotError {
    PagebotError::handler("bot engine is shut down")
}

/// `/help 2` → second page; anything unparsable → first page. Page numbers too large to
/// address fall back to the first page as well.
pub fn help_options(args: &[String]) -> HelpOptions {
    let offset = args
        .first()
        .and_then(|a| a.parse::<usize>().ok())
        .filter(|p| *p > 0)
        .and_then(|p| (p - 1).checked_mul(HELP_PAGE_SIZE))
        .unwrap_or(0);
    HelpOptions::page(HELP_PAGE_SIZE, offset)
}

fn format_uptime(started: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - started).num_seconds().max(0);
    format!("{}h {}m {}s", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Registers the demo commands and pages on `app`.
pub fn install_demo(app: &BotApp) -> Result<(), BuildError> {
    let engine: Weak<BotEngine> = Arc::downgrade(app.engine());
    let owners = Owners(Arc::new(app.owners().clone()));
    let started_at = Utc::now();

    register_commands(app, engine, owners, started_at);
    build_pages(app)?;
    info!(
        commands = app.commands().len(),
        pages = app.pages().len(),
        "Demo commands and pages installed"
    );
    Ok(())
}

fn register_commands(app: &BotApp, engine: Weak<BotEngine>, owners: Owners, started_at: DateTime<Utc>) {
    let commands = app.commands();

    let help_engine = engine.clone();
    commands.register(
        Command::new("help", "List commands. /help <page> for more", move |p: Platform, c: Context| {
            let engine = help_engine.clone();
            async move {
                let engine = engine.upgrade().ok_or_else(engine_gone)?;
                let text = engine.commands().show_help(help_options(&c.args));
                engine.reply(p, &c, &text).await;
                Ok::<(), PagebotError>(())
            }
        })
        .aliases(["h", "?"]),
    );

    let start_engine = engine.clone();
    commands.register(Command::new("start", "Open the home page", move |p: Platform, c: Context| {
        let engine = start_engine.clone();
        async move {
            let engine = engine.upgrade().ok_or_else(engine_gone)?;
            engine
                .show_page(p, HOME_PAGE, &c)
                .await
                .map_err(|e| PagebotError::handler(e.to_string()))?;
            Ok::<(), PagebotError>(())
        }
    }));

    let ping_engine = engine.clone();
    commands.register(Command::new("ping", "Check that the bot answers", move |p: Platform, c: Context| {
        let engine = ping_engine.clone();
        async move {
            let engine = engine.upgrade().ok_or_else(engine_gone)?;
            engine.reply(p, &c, "pong").await;
            Ok::<(), PagebotError>(())
        }
    }));

    commands.register(
        Command::new("status", "Bot status (owners only)", move |p: Platform, c: Context| {
            let engine = engine.clone();
            let owners = owners.clone();
            async move {
                let engine = engine.upgrade().ok_or_else(engine_gone)?;
                let text = if owners.contains(&c) {
                    format!(
                        "Platform: {}\nUptime: {}\nCommands: {}\nPages: {}",
                        p,
                        format_uptime(started_at, Utc::now()),
                        engine.commands().len(),
                        engine.pages().len()
                    )
                } else {
                    "This command is restricted to bot owners.".to_string()
                };
                engine.reply(p, &c, &text).await;
                Ok::<(), PagebotError>(())
            }
        })
        .show_in_help(false),
    );
}

fn back_home() -> Result<Button, BuildError> {
    Button::builder("Back", &[])
        .style(ButtonStyle::Secondary)
        .next_page(HOME_PAGE)
        .build()
}

fn build_pages(app: &BotApp) -> Result<(), BuildError> {
    let pages = app.pages();

    pages
        .build_page(HOME_PAGE)
        .content("Welcome to pagebot! Reply with a button number.")
        .button(
            Button::builder("About", &[])
                .style(ButtonStyle::Primary)
                .next_page("about")
                .build()?,
        )
        .button(Button::builder("Settings", &[]).next_page("settings").build()?)
        .button(Button::builder("Help", &[]).command("help").build()?)
        .button(
            Button::builder("Ping", &[Platform::Telegram])
                .command("ping")
                .build()?,
        )
        .build()?;

    pages
        .build_page("about")
        .content("pagebot serves the same pages and commands on Telegram and Discord.")
        .button(back_home()?)
        .build()?;

    let toggle = Arc::new(AtomicBool::new(true));
    pages
        .build_page("settings")
        .content("Settings")
        .on_enter(|p: Platform, c: Context| async move {
            info!(platform = %p, chat_id = c.chat_id().unwrap_or("-"), "Settings opened");
            Ok::<(), PagebotError>(())
        })
        .on_leave(|p: Platform, c: Context| async move {
            info!(platform = %p, chat_id = c.chat_id().unwrap_or("-"), "Settings closed");
            Ok::<(), PagebotError>(())
        })
        .button(
            Button::builder("Toggle notifications", &[])
                .style(ButtonStyle::Success)
                .action(move || {
                    let toggle = toggle.clone();
                    async move {
                        let enabled = !toggle.fetch_xor(true, Ordering::SeqCst);
                        info!(enabled, "Notifications toggled");
                        Ok::<(), PagebotError>(())
                    }
                })
                .next_page("settings")
                .build()?,
        )
        .button(back_home()?)
        .build()?;

    Ok(())
}
