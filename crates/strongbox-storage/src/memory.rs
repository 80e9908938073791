// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory slot store for tests and throwaway sessions.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use strongbox_core::{DurableStore, StrongboxError};
use tokio::sync::Mutex;

/// Process-local slot store.
///
/// Writes can be made to fail on demand, which lets callers exercise their
/// storage-error paths without a real disk.
#[derive(Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// When `true`, every write returns a storage error and changes nothing.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Names of all written slots, sorted.
    pub async fn slot_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.slots.lock().await.keys().cloned().collect();
        names.sort();
        names
    }

    fn check_writable(&self) -> Result<(), StrongboxError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StrongboxError::storage(std::io::Error::other(
                "simulated write failure",
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl DurableStore for MemoryStore {
    fn name(&self) -> &str {
        "memory"
    }

    async fn get(&self, slot: &str) -> Result<Option<Vec<u8>>, StrongboxError> {
        Ok(self.slots.lock().await.get(slot).cloned())
    }

    async fn set(&self, slot: &str, value: &[u8]) -> Result<(), StrongboxError> {
        self.check_writable()?;
        self.slots
            .lock()
            .await
            .insert(slot.to_string(), value.to_vec());
        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, &[u8])]) -> Result<(), StrongboxError> {
        self.check_writable()?;
        let mut slots = self.slots.lock().await;
        for (slot, value) in entries {
            slots.insert(slot.to_string(), value.to_vec());
        }
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<(), StrongboxError> {
        self.check_writable()?;
        self.slots.lock().await.remove(slot);
        Ok(())
    }
}
