//! In-memory cache store
//!
//! Useful for long-lived processes (watch mode) that do not need entries to
//! survive a restart, and for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::domain::entities::CacheEntry;
use crate::domain::ports::{CacheStore, StoreError, StoreResult};
use crate::domain::value_objects::CacheKey;

#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> StoreError {
    StoreError::AccessError {
        message: "cache store lock poisoned".to_string(),
    }
}

impl CacheStore for MemoryCacheStore {
    fn load(&self, key: &CacheKey) -> StoreResult<Option<CacheEntry>> {
        let entries = self.entries.lock().map_err(|_| poisoned())?;
        Ok(entries.get(key.as_str()).cloned())
    }

    fn save(&self, key: &CacheKey, entry: &CacheEntry) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.insert(key.as_str().to_string(), entry.clone());
        Ok(())
    }

    fn delete(&self, key: &CacheKey) -> StoreResult<()> {
        let mut entries = self.entries.lock().map_err(|_| poisoned())?;
        entries.remove(key.as_str());
        Ok(())
    }
}
