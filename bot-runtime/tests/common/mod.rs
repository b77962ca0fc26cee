//! Mock transport, handle and factory shared by the bot-runtime integration tests.
//!
//! Nothing here talks to a real platform: sent texts are recorded in memory and handles only
//! flip a flag on start/stop.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use bot_runtime::{BotFactory, BotHandle, InboundRouter, LifecycleError};
use pagebot_core::{Chat, PagebotError, Platform, Result, SentMessage, Transport, TransportError};

/// One recorded `send_message` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRecord {
    pub chat_id: String,
    pub text: String,
}

/// Records every sent message; edit/delete are accepted and ignored.
pub struct MockTransport {
    platform: Platform,
    sent: Mutex<Vec<SentRecord>>,
}

impl MockTransport {
    pub fn new(platform: Platform) -> Arc<Self> {
        Arc::new(Self {
            platform,
            sent: Mutex::new(Vec::new()),
        })
    }

    pub fn sent(&self) -> Vec<SentRecord> {
        self.sent.lock().unwrap().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent().into_iter().map(|r| r.text).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    fn platform(&self) -> Platform {
        self.platform
    }

    async fn send_message(&self, chat: &Chat, text: &str) -> Result<SentMessage> {
        let mut sent = self.sent.lock().unwrap();
        sent.push(SentRecord {
            chat_id: chat.id.clone(),
            text: text.to_string(),
        });
        Ok(SentMessage {
            id: sent.len().to_string(),
            chat_id: chat.id.clone(),
        })
    }

    async fn edit_message(&self, _chat: &Chat, _message_id: &str, _text: &str) -> Result<()> {
        Ok(())
    }

    async fn delete_message(&self, _chat: &Chat, _message_id: &str) -> Result<()> {
        Ok(())
    }
}

/// Knobs shared by a factory and every handle it creates.
#[derive(Default)]
pub struct MockBehavior {
    pub fail_start: AtomicBool,
    pub fail_stop: AtomicBool,
    /// Milliseconds `start()` sleeps before returning, to widen race windows.
    pub start_delay_ms: AtomicUsize,
    pub created: AtomicUsize,
    pub started: AtomicUsize,
    pub stopped: AtomicUsize,
}

pub struct MockHandle {
    platform: Platform,
    transport: Arc<MockTransport>,
    behavior: Arc<MockBehavior>,
    pub router: InboundRouter,
}

#[async_trait]
impl BotHandle for MockHandle {
    fn platform(&self) -> Platform {
        self.platform
    }

    fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone()
    }

    async fn start(&mut self) -> Result<()> {
        let delay = self.behavior.start_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay as u64)).await;
        }
        if self.behavior.fail_start.load(Ordering::SeqCst) {
            return Err(PagebotError::Transport(TransportError::Api(
                "connection refused".to_string(),
            )));
        }
        self.behavior.started.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&mut self) -> Result<()> {
        if self.behavior.fail_stop.load(Ordering::SeqCst) {
            return Err(PagebotError::handler("stop timed out"));
        }
        self.behavior.stopped.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Creates [`MockHandle`]s that all share one transport per platform.
pub struct MockFactory {
    pub behavior: Arc<MockBehavior>,
    pub telegram: Arc<MockTransport>,
    pub discord: Arc<MockTransport>,
}

impl MockFactory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            behavior: Arc::new(MockBehavior::default()),
            telegram: MockTransport::new(Platform::Telegram),
            discord: MockTransport::new(Platform::Discord),
        })
    }

    pub fn transport(&self, platform: Platform) -> Arc<MockTransport> {
        match platform {
            Platform::Telegram => self.telegram.clone(),
            Platform::Discord => self.discord.clone(),
        }
    }
}

impl BotFactory for MockFactory {
    fn create(
        &self,
        platform: Platform,
        router: InboundRouter,
    ) -> std::result::Result<Box<dyn BotHandle>, LifecycleError> {
        self.behavior.created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockHandle {
            platform,
            transport: self.transport(platform),
            behavior: self.behavior.clone(),
            router,
        }))
    }
}
