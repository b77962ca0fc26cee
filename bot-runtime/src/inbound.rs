//! Routes incoming text: `/name args` dispatches a command, a bare number presses that button on
//! the chat's current page, anything else is ignored.

use std::sync::Arc;

use pagebot_core::{Context, Platform};
use tracing::{debug, error, instrument};

use crate::engine::{BotEngine, CommandDispatch, ExecutionReport};
use crate::error::EngineError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundOutcome {
    Command(CommandDispatch),
    Button(ExecutionReport),
    Ignored,
}

/// Splits `/name@bot arg1 arg2` into a lowercase name and its arguments.
pub fn parse_command(text: &str) -> Option<(String, Vec<String>)> {
    let rest = text.trim().strip_prefix('/')?;
    let mut parts = rest.split_whitespace();
    let head = parts.next()?;
    let name = head.split('@').next().unwrap_or(head).to_lowercase();
    if name.is_empty() {
        return None;
    }
    Some((name, parts.map(str::to_string).collect()))
}

/// A bare run of ASCII digits (surrounding whitespace allowed) as a 1-based button number.
pub fn parse_button_number(text: &str) -> Option<usize> {
    let digits = text.trim();
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Entry point platform handles call for every inbound text message.
#[derive(Clone)]
pub struct InboundRouter {
    engine: Arc<BotEngine>,
}

impl InboundRouter {
    pub fn new(engine: Arc<BotEngine>) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Arc<BotEngine> {
        &self.engine
    }

    #[instrument(skip(self, ctx, text))]
    pub async fn route(
        &self,
        platform: Platform,
        ctx: Context,
        text: &str,
    ) -> Result<InboundOutcome, EngineError> {
        if let Some((name, args)) = parse_command(text) {
            let ctx = Context { args, ..ctx };
            return match self.engine.dispatch_command(platform, &name, &ctx).await {
                Ok(CommandDispatch::NotFound(name)) => {
                    self.engine
                        .reply(platform, &ctx, &format!("Unknown command: /{}", name))
                        .await;
                    Ok(InboundOutcome::Command(CommandDispatch::NotFound(name)))
                }
                Ok(dispatch) => Ok(InboundOutcome::Command(dispatch)),
                Err(e) => {
                    error!(platform = %platform, command = %name, error = %e, "Command failed");
                    self.engine
                        .reply(platform, &ctx, &format!("Command /{} failed", name))
                        .await;
                    Err(e)
                }
            };
        }

        if let Some(index) = parse_button_number(text) {
            return match self.engine.press(platform, index, &ctx).await {
                Ok(report) => Ok(InboundOutcome::Button(report)),
                Err(EngineError::NoActivePage) => {
                    debug!(platform = %platform, "Number received with no active page");
                    Ok(InboundOutcome::Ignored)
                }
                Err(e @ EngineError::ButtonOutOfRange { .. }) => {
                    self.engine.reply(platform, &ctx, &e.to_string()).await;
                    Err(e)
                }
                Err(e) => {
                    error!(platform = %platform, error = %e, "Button press failed");
                    Err(e)
                }
            };
        }

        Ok(InboundOutcome::Ignored)
    }
}
