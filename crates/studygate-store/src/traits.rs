//! Store trait definitions

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{StoreError, StoreResult};

/// String-keyed persistent map
pub trait Store: Send + Sync {
    /// Read a raw value
    fn get_item(&self, key: &str) -> StoreResult<Option<String>>;

    /// Write a raw value, replacing any previous one
    fn set_item(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Delete a value; deleting a missing key is not an error
    fn remove_item(&self, key: &str) -> StoreResult<()>;

    /// Whether a key is present
    fn contains(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get_item(key)?.is_some())
    }

    /// Check if store is healthy
    fn is_healthy(&self) -> bool;
}

/// Read and decode a JSON value
pub fn load_json<T: DeserializeOwned>(store: &dyn Store, key: &str) -> StoreResult<Option<T>> {
    match store.get_item(key)? {
        Some(raw) => {
            let value = serde_json::from_str(&raw).map_err(|e| StoreError::Serialization {
                key: key.to_string(),
                message: e.to_string(),
            })?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Encode and write a JSON value
pub fn save_json<T: Serialize>(store: &dyn Store, key: &str, value: &T) -> StoreResult<()> {
    let raw = serde_json::to_string(value).map_err(|e| StoreError::Serialization {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    store.set_item(key, &raw)?;
    debug!(key, bytes = raw.len(), "JSON value saved");
    Ok(())
}
