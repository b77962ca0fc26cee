//! Page name → page table.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};

use crate::page::{Page, PageBuilder};

/// Pages by unique name. Re-registering a name replaces the earlier page.
#[derive(Default)]
pub struct PageTable {
    pages: RwLock<HashMap<String, Arc<Page>>>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a page that is published here on `build()`.
    pub fn build_page(&self, name: impl Into<String>) -> PageBuilder<'_> {
        PageBuilder::new(self, name.into())
    }

    /// Publishes a page, returning the one it replaced.
    pub fn insert(&self, page: Arc<Page>) -> Option<Arc<Page>> {
        let previous = self
            .pages
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(page.name().to_string(), page.clone());
        if previous.is_some() {
            warn!(page = %page.name(), "Page replaced");
        } else {
            debug!(page = %page.name(), buttons = page.buttons().len(), "Page registered");
        }
        previous
    }

    pub fn get(&self, name: &str) -> Option<Arc<Page>> {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Page names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.pages
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
