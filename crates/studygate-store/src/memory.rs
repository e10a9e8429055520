//! In-memory store implementation

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::{Store, StoreError, StoreResult};

/// Volatile store; the state lives as long as the value
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every key/value pair, ordered by key
    pub fn snapshot(&self) -> StoreResult<BTreeMap<String, String>> {
        let items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(items.clone())
    }
}

impl Store for MemoryStore {
    fn get_item(&self, key: &str) -> StoreResult<Option<String>> {
        let items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(items.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StoreResult<()> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        items.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StoreResult<()> {
        let mut items = self.items.lock().map_err(|_| StoreError::Poisoned)?;
        items.remove(key);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        self.items.lock().is_ok()
    }
}
