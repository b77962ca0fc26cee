//! Command record and the handler trait.

use std::collections::BTreeSet;
use std::fmt;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use pagebot_core::{Context, Platform, Result};

/// Runs a command for one platform. Closures `Fn(Platform, Context) -> impl Future<Output = Result<()>>`
/// implement this directly.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, platform: Platform, ctx: &Context) -> Result<()>;
}

#[async_trait]
impl<F, Fut> CommandHandler for F
where
    F: Fn(Platform, Context) -> Fut + Send + Sync,
    Fut: Future<Output = Result<()>> + Send,
{
    async fn handle(&self, platform: Platform, ctx: &Context) -> Result<()> {
        (self)(platform, ctx.clone()).await
    }
}

/// A named, invocable handler reachable by its primary name or any alias.
///
/// Names and aliases are stored lowercase.
#[derive(Clone)]
pub struct Command {
    name: String,
    description: String,
    aliases: BTreeSet<String>,
    show_in_help: bool,
    show_in_list: bool,
    handler: Arc<dyn CommandHandler>,
}

impl Command {
    /// Creates a command visible in both help and listings, with no aliases.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        handler: impl CommandHandler + 'static,
    ) -> Self {
        Self {
            name: name.into().trim().to_lowercase(),
            description: description.into(),
            aliases: BTreeSet::new(),
            show_in_help: true,
            show_in_list: true,
            handler: Arc::new(handler),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.insert(alias.into().trim().to_lowercase());
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for alias in aliases {
            self = self.alias(alias);
        }
        self
    }

    pub fn show_in_help(mut self, show: bool) -> Self {
        self.show_in_help = show;
        self
    }

    pub fn show_in_list(mut self, show: bool) -> Self {
        self.show_in_list = show;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn alias_set(&self) -> &BTreeSet<String> {
        &self.aliases
    }

    pub fn is_shown_in_help(&self) -> bool {
        self.show_in_help
    }

    pub fn is_shown_in_list(&self) -> bool {
        self.show_in_list
    }

    /// Primary name followed by aliases; the keys this command is registered under.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Invokes the handler.
    pub async fn run(&self, platform: Platform, ctx: &Context) -> Result<()> {
        self.handler.handle(platform, ctx).await
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("aliases", &self.aliases)
            .field("show_in_help", &self.show_in_help)
            .field("show_in_list", &self.show_in_list)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn noop(_platform: Platform, _ctx: Context) -> Result<()> {
        Ok(())
    }

    #[test]
    fn test_names_and_aliases_are_lowercased() {
        let cmd = Command::new("Help", "Shows help", noop).aliases(["H", " ? "]);
        assert_eq!(cmd.name(), "help");
        let keys: Vec<&str> = cmd.keys().collect();
        assert_eq!(keys, vec!["help", "?", "h"]);
    }

    #[tokio::test]
    async fn test_closure_handler_receives_platform_and_context() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();
        let cmd = Command::new("count", "Counts", move |platform: Platform, ctx: Context| {
            let seen = seen.clone();
            async move {
                assert_eq!(platform, Platform::Discord);
                assert_eq!(ctx.args, vec!["x".to_string()]);
                seen.fetch_add(1, Ordering::SeqCst);
                Ok(())
            }
        });

        cmd.run(Platform::Discord, &Context::new().with_args(["x"]))
            .await
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
