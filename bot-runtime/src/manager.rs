//! Per-platform bot lifecycle.
//!
//! Every start/stop of one platform holds that platform's slot lock for its whole duration, so two
//! concurrent starts cannot both build a handle. Batch operations walk platforms in input order
//! and never abort on one platform's failure.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use pagebot_core::{Platform, Transport};
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::engine::BotEngine;
use crate::error::LifecycleError;
use crate::inbound::InboundRouter;

/// Message of the single report `shutdown()` returns when nothing runs.
pub const NO_RUNNING_BOTS: &str = "No bots are currently running";

/// A live connection to one platform.
#[async_trait]
pub trait BotHandle: Send + Sync {
    fn platform(&self) -> Platform;
    /// Outbound path used by the engine while this handle is registered.
    fn transport(&self) -> Arc<dyn Transport>;
    async fn start(&mut self) -> pagebot_core::Result<()>;
    async fn stop(&mut self) -> pagebot_core::Result<()>;
}

/// Builds handles. `router` is where the handle delivers inbound messages.
pub trait BotFactory: Send + Sync {
    fn create(
        &self,
        platform: Platform,
        router: InboundRouter,
    ) -> Result<Box<dyn BotHandle>, LifecycleError>;
}

/// Result of one platform within a batch operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleReport {
    /// `None` only for the "nothing running" shutdown report.
    pub platform: Option<Platform>,
    pub ok: bool,
    pub message: String,
}

impl LifecycleReport {
    fn success(platform: Platform, message: String) -> Self {
        Self {
            platform: Some(platform),
            ok: true,
            message,
        }
    }

    fn failure(platform: Platform, err: &LifecycleError) -> Self {
        Self {
            platform: Some(platform),
            ok: false,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for LifecycleReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

type Slot = Arc<Mutex<Option<Box<dyn BotHandle>>>>;

/// Starts, stops and tracks one bot handle per enabled platform.
pub struct BotManager {
    engine: Arc<BotEngine>,
    factory: Arc<dyn BotFactory>,
    enabled: BTreeSet<Platform>,
    slots: BTreeMap<Platform, Slot>,
}

impl BotManager {
    pub fn new(
        engine: Arc<BotEngine>,
        factory: Arc<dyn BotFactory>,
        enabled: impl IntoIterator<Item = Platform>,
    ) -> Self {
        let slots = Platform::ALL
            .into_iter()
            .map(|p| (p, Slot::default()))
            .collect();
        Self {
            engine,
            factory,
            enabled: enabled.into_iter().collect(),
            slots,
        }
    }

    pub fn enabled_platforms(&self) -> &BTreeSet<Platform> {
        &self.enabled
    }

    fn slot(&self, platform: Platform) -> Slot {
        // Slots are created for every supported platform in `new`.
        self.slots.get(&platform).cloned().unwrap_or_default()
    }

    fn router(&self) -> InboundRouter {
        InboundRouter::new(self.engine.clone())
    }

    pub async fn is_running(&self, platform: Platform) -> bool {
        self.slot(platform).lock().await.is_some()
    }

    /// Running platforms in platform order.
    pub async fn running_platforms(&self) -> Vec<Platform> {
        let mut running = Vec::new();
        for (platform, slot) in &self.slots {
            if slot.lock().await.is_some() {
                running.push(*platform);
            }
        }
        running
    }

    /// Starts one platform. The handle's transport is attached before `start()` so messages
    /// arriving during startup can be answered; it is detached again if startup fails.
    pub async fn start_platform(&self, platform: Platform) -> Result<(), LifecycleError> {
        if !self.enabled.contains(&platform) {
            warn!(platform = %platform, "Start requested for a platform that is not enabled");
            return Err(LifecycleError::NotEnabled(platform));
        }

        let slot = self.slot(platform);
        let mut current = slot.lock().await;
        if current.is_some() {
            return Err(LifecycleError::AlreadyRunning(platform));
        }

        let mut handle = self.factory.create(platform, self.router())?;
        self.engine.attach_transport(handle.transport()).await;

        if let Err(source) = handle.start().await {
            self.engine.detach_transport(platform).await;
            error!(platform = %platform, error = %source, "Failed to start bot");
            return Err(LifecycleError::StartFailed { platform, source });
        }

        *current = Some(handle);
        info!(platform = %platform, "Bot started");
        Ok(())
    }

    /// Stops one platform. On failure the handle stays registered as running.
    pub async fn stop_platform(&self, platform: Platform) -> Result<(), LifecycleError> {
        let slot = self.slot(platform);
        let mut current = slot.lock().await;
        let Some(handle) = current.as_mut() else {
            return Err(LifecycleError::NotRunning(platform));
        };

        if let Err(source) = handle.stop().await {
            error!(platform = %platform, error = %source, "Failed to stop bot");
            return Err(LifecycleError::StopFailed { platform, source });
        }

        *current = None;
        self.engine.detach_transport(platform).await;
        self.engine.sessions().clear_platform(platform).await;
        info!(platform = %platform, "Bot stopped");
        Ok(())
    }

    pub async fn start(&self, platforms: &[Platform]) -> Vec<LifecycleReport> {
        let mut reports = Vec::with_capacity(platforms.len());
        for &platform in platforms {
            let report = match self.start_platform(platform).await {
                Ok(()) => LifecycleReport::success(
                    platform,
                    format!("Bot for {} started successfully", platform),
                ),
                Err(e) => LifecycleReport::failure(platform, &e),
            };
            reports.push(report);
        }
        reports
    }

    pub async fn stop(&self, platforms: &[Platform]) -> Vec<LifecycleReport> {
        let mut reports = Vec::with_capacity(platforms.len());
        for &platform in platforms {
            let report = match self.stop_platform(platform).await {
                Ok(()) => LifecycleReport::success(
                    platform,
                    format!("Bot for {} stopped successfully", platform),
                ),
                Err(e) => LifecycleReport::failure(platform, &e),
            };
            reports.push(report);
        }
        reports
    }

    /// Stop then start. Not transactional: if the start fails the platform stays stopped.
    pub async fn restart(&self, platforms: &[Platform]) -> Vec<LifecycleReport> {
        let mut reports = self.stop(platforms).await;
        reports.extend(self.start(platforms).await);
        reports
    }

    pub async fn start_all(&self) -> Vec<LifecycleReport> {
        let enabled: Vec<Platform> = self.enabled.iter().copied().collect();
        self.start(&enabled).await
    }

    pub async fn stop_all(&self) -> Vec<LifecycleReport> {
        let running = self.running_platforms().await;
        self.stop(&running).await
    }

    /// Stops everything running.
    pub async fn shutdown(&self) -> Vec<LifecycleReport> {
        let running = self.running_platforms().await;
        if running.is_empty() {
            info!("Shutdown requested with no running bots");
            return vec![LifecycleReport {
                platform: None,
                ok: true,
                message: NO_RUNNING_BOTS.to_string(),
            }];
        }
        info!(count = running.len(), "Shutting down running bots");
        self.stop(&running).await
    }
}
