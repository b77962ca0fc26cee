//! Buttons and their builder.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use pagebot_core::{Platform, Result};
use serde::{Deserialize, Serialize};

use crate::error::BuildError;

/// Visual hint passed through to rendering as a `[style]` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ButtonStyle {
    Primary,
    Secondary,
    Success,
    Danger,
    Link,
}

impl ButtonStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ButtonStyle::Primary => "primary",
            ButtonStyle::Secondary => "secondary",
            ButtonStyle::Success => "success",
            ButtonStyle::Danger => "danger",
            ButtonStyle::Link => "link",
        }
    }
}

impl fmt::Display for ButtonStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Zero-argument effect run when a button is pressed. Async closures `Fn() -> impl Future`
/// implement it directly.
#[async_trait]
pub trait ButtonAction: Send + Sync {
    async fn run(&self) -> Result<()>;
}

#[async_trait]
impl<F, Fut> ButtonAction for F
where
    F: Fn() -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn run(&self) -> Result<()> {
        (self)().await
    }
}

/// A user-selectable entry on a page. Always has at least one of action, next page, or command.
#[derive(Clone)]
pub struct Button {
    text: String,
    platforms: BTreeSet<Platform>,
    style: Option<ButtonStyle>,
    action: Option<Arc<dyn ButtonAction>>,
    next_page: Option<String>,
    command: Option<String>,
}

impl Button {
    /// Starts a button visible on `platforms`; an empty slice means every supported platform.
    pub fn builder(text: impl Into<String>, platforms: &[Platform]) -> ButtonBuilder {
        ButtonBuilder::new(text, platforms)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn platforms(&self) -> &BTreeSet<Platform> {
        &self.platforms
    }

    pub fn is_visible_on(&self, platform: Platform) -> bool {
        self.platforms.contains(&platform)
    }

    pub fn style(&self) -> Option<ButtonStyle> {
        self.style
    }

    pub fn has_action(&self) -> bool {
        self.action.is_some()
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Runs the action if there is one. Returns whether an action ran.
    pub async fn run_action(&self) -> Result<bool> {
        match &self.action {
            Some(action) => {
                action.run().await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl fmt::Debug for Button {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Button")
            .field("text", &self.text)
            .field("platforms", &self.platforms)
            .field("style", &self.style)
            .field("has_action", &self.action.is_some())
            .field("next_page", &self.next_page)
            .field("command", &self.command)
            .finish()
    }
}

/// Fluent builder for [`Button`].
pub struct ButtonBuilder {
    text: String,
    platforms: BTreeSet<Platform>,
    style: Option<ButtonStyle>,
    action: Option<Arc<dyn ButtonAction>>,
    next_page: Option<String>,
    command: Option<String>,
}

impl ButtonBuilder {
    pub fn new(text: impl Into<String>, platforms: &[Platform]) -> Self {
        let platforms = if platforms.is_empty() {
            Platform::all()
        } else {
            platforms.iter().copied().collect()
        };
        Self {
            text: text.into(),
            platforms,
            style: None,
            action: None,
            next_page: None,
            command: None,
        }
    }

    pub fn action(mut self, action: impl ButtonAction + 'static) -> Self {
        self.action = Some(Arc::new(action));
        self
    }

    pub fn style(mut self, style: ButtonStyle) -> Self {
        self.style = Some(style);
        self
    }

    pub fn next_page(mut self, page: impl Into<String>) -> Self {
        self.next_page = Some(page.into());
        self
    }

    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    pub fn build(self) -> std::result::Result<Button, BuildError> {
        if self.action.is_none() && self.next_page.is_none() && self.command.is_none() {
            return Err(BuildError::ButtonWithoutEffect { text: self.text });
        }
        Ok(Button {
            text: self.text,
            platforms: self.platforms,
            style: self.style,
            action: self.action,
            next_page: self.next_page,
            command: self.command,
        })
    }
}
