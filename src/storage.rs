//! A small JSON key-value store for client-side persistence.
//!
//! [`KeyValueStore`] backs features like remembered carts and recent
//! searches. Values are serialized to JSON strings; a value that fails to
//! parse on load falls back to the caller's default rather than erroring,
//! so corrupt state never breaks startup.

use std::collections::HashMap;
use std::sync::Mutex;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

/// In-memory string-keyed JSON store.
#[derive(Debug, Default)]
pub struct KeyValueStore {
    entries: Mutex<HashMap<String, String>>,
}

impl KeyValueStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serializes `value` and stores it under `key`.
    ///
    /// # Errors
    ///
    /// Returns the serialization error when `value` cannot be encoded.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), serde_json::Error> {
        let encoded = serde_json::to_string(value)?;
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(key.to_string(), encoded);
        Ok(())
    }

    /// Loads and deserializes the value under `key`.
    ///
    /// Returns `default` when the key is absent or the stored value no
    /// longer parses as `T`.
    pub fn load<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        let entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        let Some(raw) = entries.get(key) else {
            return default;
        };
        match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(error) => {
                warn!(key, %error, "stored value failed to parse, using default");
                default
            }
        }
    }

    /// Removes the value under `key`, if any.
    pub fn remove(&self, key: &str) {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.remove(key);
    }

    /// Removes every stored value.
    pub fn clear(&self) {
        let mut entries = self.entries.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.clear();
    }
}
