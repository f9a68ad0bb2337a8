//! In-process slot storage.

use super::{SlotStorage, StorageError, StorageResult};
use std::collections::BTreeMap;

/// Map-backed slot store with an optional byte quota.
///
/// Counts successful writes so callers can assert write amplification.
#[derive(Debug, Clone, Default)]
pub struct MemorySlotStorage {
    slots: BTreeMap<String, String>,
    quota_bytes: Option<usize>,
    writes: usize,
}

impl MemorySlotStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits the summed byte size of all keys and values.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Seeds one slot without counting it as a write.
    pub fn with_slot(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.slots.insert(key.into(), value.into());
        self
    }

    /// Number of successful `set` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }

    /// Raw slot content, bypassing the trait.
    pub fn raw(&self, key: &str) -> Option<&str> {
        self.slots.get(key).map(String::as_str)
    }

    fn used_bytes_without(&self, key: &str) -> usize {
        self.slots
            .iter()
            .filter(|(slot_key, _)| slot_key.as_str() != key)
            .map(|(slot_key, value)| slot_key.len() + value.len())
            .sum()
    }
}

impl SlotStorage for MemorySlotStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota_bytes) = self.quota_bytes {
            if self.used_bytes_without(key) + key.len() + value.len() > quota_bytes {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    quota_bytes,
                });
            }
        }
        self.slots.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }
}
