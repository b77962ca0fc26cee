use std::collections::BTreeSet;
use std::sync::Arc;

use command_registry::CommandRegistry;
use page_graph::PageTable;
use pagebot_core::{Context, Platform};
use tracing::{info, warn};

use crate::engine::BotEngine;
use crate::manager::{BotFactory, BotManager, LifecycleReport};
use crate::shutdown::wait_for_signal;

/// One bot process: the shared engine, the lifecycle manager, and the owner list.
pub struct BotApp {
    engine: Arc<BotEngine>,
    manager: BotManager,
    owners: BTreeSet<String>,
}

impl BotApp {
    pub fn new(enabled: impl IntoIterator<Item = Platform>, factory: Arc<dyn BotFactory>) -> Self {
        let engine = Arc::new(BotEngine::new());
        let manager = BotManager::new(engine.clone(), factory, enabled);
        Self {
            engine,
            manager,
            owners: BTreeSet::new(),
        }
    }

    pub fn with_owners<I, S>(mut self, owners: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.owners = owners.into_iter().map(Into::into).collect();
        self
    }

    pub fn engine(&self) -> &Arc<BotEngine> {
        &self.engine
    }

    pub fn manager(&self) -> &BotManager {
        &self.manager
    }

    pub fn commands(&self) -> &CommandRegistry {
        self.engine.commands()
    }

    pub fn pages(&self) -> &PageTable {
        self.engine.pages()
    }

    pub fn owners(&self) -> &BTreeSet<String> {
        &self.owners
    }

    /// True when the context's user id is in the owner list.
    pub fn is_owner(&self, ctx: &Context) -> bool {
        ctx.user_id().is_some_and(|id| self.owners.contains(id))
    }

    /// Starts `platforms`, waits for SIGINT/SIGTERM, then shuts everything down.
    ///
    /// Returns the start reports followed by the shutdown reports.
    pub async fn run_until_signal(&self, platforms: &[Platform]) -> Vec<LifecycleReport> {
        let mut reports = self.manager.start(platforms).await;
        for report in &reports {
            if report.ok {
                info!("{}", report);
            } else {
                warn!("{}", report);
            }
        }

        match wait_for_signal().await {
            Ok(signal) => info!(signal, "Received signal, shutting down"),
            Err(e) => warn!(error = %e, "Signal listener failed, shutting down"),
        }

        let stopped = self.manager.shutdown().await;
        for report in &stopped {
            info!("{}", report);
        }
        reports.extend(stopped);
        reports
    }
}
