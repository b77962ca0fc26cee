//! Button execution and page display.
//!
//! [`BotEngine::execute`] runs a button's effects in order: action, then navigation to
//! `next_page` (if it resolves), then command dispatch. Any subset may be set; all set effects run.

use std::collections::HashMap;
use std::sync::Arc;

use command_registry::CommandRegistry;
use page_graph::{Button, Page, PageTable};
use pagebot_core::{Context, Platform, RenderedPage, Transport};
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::error::EngineError;
use crate::session::{SessionKey, SessionStore};

/// Outcome of dispatching a command by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandDispatch {
    /// The handler ran; carries the command's primary name.
    Dispatched(String),
    /// No command owns the requested name.
    NotFound(String),
}

/// What one button press did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionReport {
    pub action_ran: bool,
    /// The page displayed, if `next_page` resolved.
    pub page: Option<RenderedPage>,
    pub command: Option<CommandDispatch>,
}

/// Commands, pages, per-chat sessions and the transports of running platforms.
#[derive(Default)]
pub struct BotEngine {
    commands: CommandRegistry,
    pages: PageTable,
    sessions: SessionStore,
    transports: RwLock<HashMap<Platform, Arc<dyn Transport>>>,
}

impl BotEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub fn pages(&self) -> &PageTable {
        &self.pages
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    /// Makes `transport` the delivery path for its platform, replacing any previous one.
    pub async fn attach_transport(&self, transport: Arc<dyn Transport>) {
        let platform = transport.platform();
        self.transports.write().await.insert(platform, transport);
        debug!(platform = %platform, "Transport attached");
    }

    pub async fn detach_transport(&self, platform: Platform) {
        if self.transports.write().await.remove(&platform).is_some() {
            debug!(platform = %platform, "Transport detached");
        }
    }

    pub async fn transport(&self, platform: Platform) -> Option<Arc<dyn Transport>> {
        self.transports.read().await.get(&platform).cloned()
    }

    /// Runs the button's action, displays its next page, and dispatches its command, in that order.
    ///
    /// A `next_page` that names no page is skipped silently.
    #[instrument(skip(self, button, ctx), fields(button = %button.text()))]
    pub async fn execute(
        &self,
        platform: Platform,
        button: &Button,
        ctx: &Context,
    ) -> Result<ExecutionReport, EngineError> {
        let mut report = ExecutionReport {
            action_ran: button
                .run_action()
                .await
                .map_err(|source| EngineError::Action {
                    button: button.text().to_string(),
                    source,
                })?,
            ..ExecutionReport::default()
        };

        if let Some(next) = button.next_page() {
            match self.pages.get(next) {
                Some(page) => report.page = Some(self.display(platform, &page, ctx).await?),
                None => debug!(platform = %platform, page = %next, "Next page not found, nothing displayed"),
            }
        }

        if let Some(command) = button.command() {
            report.command = Some(self.dispatch_command(platform, command, ctx).await?);
        }

        Ok(report)
    }

    /// Displays a page by name, e.g. as the entry point of a `/start` command.
    pub async fn show_page(
        &self,
        platform: Platform,
        name: &str,
        ctx: &Context,
    ) -> Result<RenderedPage, EngineError> {
        let page = self
            .pages
            .get(name)
            .ok_or_else(|| EngineError::PageNotFound(name.to_string()))?;
        self.display(platform, &page, ctx).await
    }

    /// Presses the `index`-th (1-based) button visible on the chat's current page.
    pub async fn press(
        &self,
        platform: Platform,
        index: usize,
        ctx: &Context,
    ) -> Result<ExecutionReport, EngineError> {
        let key = SessionKey::from_context(platform, ctx).ok_or(EngineError::NoActivePage)?;
        let current = self
            .sessions
            .get(&key)
            .await
            .ok_or(EngineError::NoActivePage)?;
        let page = self
            .pages
            .get(&current)
            .ok_or(EngineError::PageNotFound(current))?;
        let button = page
            .visible_button(platform, index)
            .cloned()
            .ok_or_else(|| EngineError::ButtonOutOfRange {
                index,
                available: page.visible_buttons(platform).count(),
            })?;
        self.execute(platform, &button, ctx).await
    }

    /// Runs the command owning `name` (name or alias).
    pub async fn dispatch_command(
        &self,
        platform: Platform,
        name: &str,
        ctx: &Context,
    ) -> Result<CommandDispatch, EngineError> {
        let Some(command) = self.commands.get_command(name) else {
            warn!(platform = %platform, command = %name, "Command not found");
            return Ok(CommandDispatch::NotFound(name.to_string()));
        };
        info!(platform = %platform, command = %command.name(), "Dispatching command");
        command
            .run(platform, ctx)
            .await
            .map_err(|source| EngineError::Command {
                name: command.name().to_string(),
                source,
            })?;
        Ok(CommandDispatch::Dispatched(command.name().to_string()))
    }

    /// Sends `text` to the context's chat. Best-effort: returns whether it was delivered.
    pub async fn reply(&self, platform: Platform, ctx: &Context, text: &str) -> bool {
        let (Some(chat), Some(transport)) = (ctx.chat.as_ref(), self.transport(platform).await)
        else {
            debug!(platform = %platform, "Reply dropped: no chat or transport");
            return false;
        };
        match transport.send_message(chat, text).await {
            Ok(_) => true,
            Err(e) => {
                warn!(platform = %platform, chat_id = %chat.id, error = %e, "Failed to send reply");
                false
            }
        }
    }

    /// Leaves the chat's previous page, enters `page`, renders it, records it as current, and delivers it.
    async fn display(
        &self,
        platform: Platform,
        page: &Page,
        ctx: &Context,
    ) -> Result<RenderedPage, EngineError> {
        let key = SessionKey::from_context(platform, ctx);

        if let Some(key) = &key {
            let previous = self
                .sessions
                .get(key)
                .await
                .and_then(|name| self.pages.get(&name));
            if let Some(previous) = previous {
                previous
                    .leave(platform, ctx)
                    .await
                    .map_err(|source| EngineError::Hook {
                        page: previous.name().to_string(),
                        hook: "on_leave",
                        source,
                    })?;
            }
        }

        page.enter(platform, ctx)
            .await
            .map_err(|source| EngineError::Hook {
                page: page.name().to_string(),
                hook: "on_enter",
                source,
            })?;

        let rendered = page.render(platform);
        info!(
            platform = %platform,
            page = %page.name(),
            buttons = rendered.buttons.len(),
            "Displaying page"
        );

        if let Some(key) = key {
            self.sessions.set(key, page.name().to_string()).await;
        }
        self.deliver(platform, ctx, &rendered).await;
        Ok(rendered)
    }

    async fn deliver(&self, platform: Platform, ctx: &Context, rendered: &RenderedPage) {
        let Some(chat) = ctx.chat.as_ref() else {
            debug!(platform = %platform, page = %rendered.page, "No chat in context, page not delivered");
            return;
        };
        let Some(transport) = self.transport(platform).await else {
            debug!(platform = %platform, page = %rendered.page, "No transport attached, page not delivered");
            return;
        };
        if let Err(e) = transport.send_page(chat, rendered).await {
            warn!(
                platform = %platform,
                page = %rendered.page,
                chat_id = %chat.id,
                error = %e,
                "Failed to deliver page"
            );
        }
    }
}
