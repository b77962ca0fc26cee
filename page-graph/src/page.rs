//! Pages, hooks, and the page builder.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use pagebot_core::{Context, Platform, RenderedButton, RenderedPage, Result};

use crate::button::Button;
use crate::error::BuildError;
use crate::table::PageTable;

/// Runs when a page is entered or left. Closures `Fn(Platform, Context) -> impl Future`
/// implement it directly.
#[async_trait]
pub trait PageHook: Send + Sync {
    async fn call(&self, platform: Platform, ctx: &Context) -> Result<()>;
}

#[async_trait]
impl<F, Fut> PageHook for F
where
    F: Fn(Platform, Context) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn call(&self, platform: Platform, ctx: &Context) -> Result<()> {
        (self)(platform, ctx.clone()).await
    }
}

/// A named unit of content plus its buttons. Immutable once built.
pub struct Page {
    name: String,
    content: String,
    buttons: Vec<Button>,
    on_enter: Option<Arc<dyn PageHook>>,
    on_leave: Option<Arc<dyn PageHook>>,
}

impl Page {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// All buttons in insertion order, regardless of platform.
    pub fn buttons(&self) -> &[Button] {
        &self.buttons
    }

    /// Buttons shown on `platform`, in insertion order.
    pub fn visible_buttons(&self, platform: Platform) -> impl Iterator<Item = &Button> {
        self.buttons.iter().filter(move |b| b.is_visible_on(platform))
    }

    /// The `index`-th (1-based) button visible on `platform`.
    pub fn visible_button(&self, platform: Platform, index: usize) -> Option<&Button> {
        index
            .checked_sub(1)
            .and_then(|i| self.visible_buttons(platform).nth(i))
    }

    pub fn has_on_enter(&self) -> bool {
        self.on_enter.is_some()
    }

    pub fn has_on_leave(&self) -> bool {
        self.on_leave.is_some()
    }

    pub async fn enter(&self, platform: Platform, ctx: &Context) -> Result<()> {
        match &self.on_enter {
            Some(hook) => hook.call(platform, ctx).await,
            None => Ok(()),
        }
    }

    pub async fn leave(&self, platform: Platform, ctx: &Context) -> Result<()> {
        match &self.on_leave {
            Some(hook) => hook.call(platform, ctx).await,
            None => Ok(()),
        }
    }

    /// Content plus the buttons visible on `platform`, numbered from 1 and tagged with their style.
    pub fn render(&self, platform: Platform) -> RenderedPage {
        let buttons = self
            .visible_buttons(platform)
            .enumerate()
            .map(|(i, b)| RenderedButton {
                index: i + 1,
                text: b.text().to_string(),
                style: b.style().map(|s| s.as_str().to_string()),
            })
            .collect();
        RenderedPage {
            page: self.name.clone(),
            content: self.content.clone(),
            buttons,
        }
    }
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("name", &self.name)
            .field("content", &self.content)
            .field("buttons", &self.buttons)
            .field("on_enter", &self.on_enter.is_some())
            .field("on_leave", &self.on_leave.is_some())
            .finish()
    }
}

/// Fluent builder for [`Page`]. `build()` publishes the page into the table it came from.
pub struct PageBuilder<'a> {
    table: &'a PageTable,
    name: String,
    content: String,
    buttons: Vec<Button>,
    on_enter: Option<Arc<dyn PageHook>>,
    on_leave: Option<Arc<dyn PageHook>>,
}

impl<'a> PageBuilder<'a> {
    pub(crate) fn new(table: &'a PageTable, name: String) -> Self {
        Self {
            table,
            name,
            content: String::new(),
            buttons: Vec::new(),
            on_enter: None,
            on_leave: None,
        }
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Appends a button; buttons keep call order.
    pub fn button(mut self, button: Button) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn buttons(mut self, buttons: impl IntoIterator<Item = Button>) -> Self {
        self.buttons.extend(buttons);
        self
    }

    pub fn on_enter(mut self, hook: impl PageHook + 'static) -> Self {
        self.on_enter = Some(Arc::new(hook));
        self
    }

    pub fn on_leave(mut self, hook: impl PageHook + 'static) -> Self {
        self.on_leave = Some(Arc::new(hook));
        self
    }

    /// Fails on a blank name; otherwise replaces any page with the same name.
    pub fn build(self) -> std::result::Result<Arc<Page>, BuildError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(BuildError::MissingPageName);
        }
        let page = Arc::new(Page {
            name,
            content: self.content,
            buttons: self.buttons,
            on_enter: self.on_enter,
            on_leave: self.on_leave,
        });
        self.table.insert(page.clone());
        Ok(page)
    }
}
