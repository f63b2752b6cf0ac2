//! Persistence shim
//!
//! The active labels are mirrored to a single key of a per-origin key/value
//! store as a JSON array of strings. The store is injected through
//! [`SelectionStore`]; the browser binding backs it with `localStorage`,
//! tests and tools use [`MemoryStore`].

use std::collections::HashMap;

use crate::config::SwitchConfig;

/// Error type for storage backends.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("Storage is unavailable")]
    Unavailable,
    #[error("Failed to read '{key}': {reason}")]
    Read { key: String, reason: String },
    #[error("Failed to write '{key}': {reason}")]
    Write { key: String, reason: String },
}

/// Read/write-by-key capability.
pub trait SelectionStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
}

/// Store that persists nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStore;

impl SelectionStore for NoStore {
    fn read(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Ok(None)
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Ok(())
    }
}

/// In-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with one raw value.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut store = Self::new();
        store.entries.insert(key.to_string(), value.to_string());
        store
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of successful writes since creation.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl SelectionStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}

impl<S: SelectionStore + ?Sized> SelectionStore for Box<S> {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).write(key, value)
    }
}

/// Read the persisted labels that still exist in `config`.
///
/// Returns `None` when persistence is off, nothing is stored, the stored
/// value is not a JSON array of strings, or no stored label survives.
/// Every failure is logged and swallowed.
pub fn load_persisted<S: SelectionStore + ?Sized>(
    store: &S,
    config: &SwitchConfig,
) -> Option<Vec<String>> {
    if !config.persist {
        return None;
    }

    let raw = match store.read(&config.storage_key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Ignoring persisted selection: {}", e);
            return None;
        }
    };

    let stored: Vec<String> = match serde_json::from_str(&raw) {
        Ok(labels) => labels,
        Err(e) => {
            log::warn!(
                "Ignoring malformed selection under '{}': {}",
                config.storage_key,
                e
            );
            return None;
        }
    };

    let mut labels: Vec<String> = Vec::with_capacity(stored.len());
    for label in stored {
        if config.has_label(&label) && !labels.contains(&label) {
            labels.push(label);
        }
    }

    if labels.is_empty() {
        None
    } else {
        Some(labels)
    }
}

/// Write `labels` to the configured key. No-op when persistence is off.
pub fn save_persisted<S: SelectionStore + ?Sized>(
    store: &mut S,
    config: &SwitchConfig,
    labels: &[String],
) -> Result<(), StorageError> {
    if !config.persist {
        return Ok(());
    }

    let value = serde_json::to_string(labels).map_err(|e| StorageError::Write {
        key: config.storage_key.clone(),
        reason: e.to_string(),
    })?;
    store.write(&config.storage_key, &value)
}
