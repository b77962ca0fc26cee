use std::collections::HashMap;
use std::sync::Arc;

use pagebot_core::{Context, Platform};
use tokio::sync::RwLock;

/// One chat on one platform.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SessionKey {
    pub platform: Platform,
    pub chat_id: String,
}

impl SessionKey {
    pub fn new(platform: Platform, chat_id: impl Into<String>) -> Self {
        Self {
            platform,
            chat_id: chat_id.into(),
        }
    }

    /// `None` when the context has no chat; such interactions are not tracked.
    pub fn from_context(platform: Platform, ctx: &Context) -> Option<Self> {
        ctx.chat_id().map(|id| Self::new(platform, id))
    }
}

/// Name of the page currently shown per chat. In memory only.
#[derive(Clone, Default)]
pub struct SessionStore {
    pages: Arc<RwLock<HashMap<SessionKey, String>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set(&self, key: SessionKey, page: String) {
        self.pages.write().await.insert(key, page);
    }

    pub async fn get(&self, key: &SessionKey) -> Option<String> {
        self.pages.read().await.get(key).cloned()
    }

    pub async fn remove(&self, key: &SessionKey) -> Option<String> {
        self.pages.write().await.remove(key)
    }

    /// Drops every session of one platform (used when its bot stops).
    pub async fn clear_platform(&self, platform: Platform) {
        self.pages.write().await.retain(|k, _| k.platform != platform);
    }

    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }
}
