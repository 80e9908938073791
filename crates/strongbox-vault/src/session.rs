// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! One vault per session, serialized behind a single async mutex.
//!
//! The session starts locked. [`VaultSession::unlock`] resolves the key,
//! flips the access gate, and hydrates the store. Front ends watch the gate
//! through [`VaultSession::accessible`] to decide when to show the vault.

use std::sync::Arc;

use strongbox_config::StorageConfig;
use strongbox_core::{
    AeadProvider, DurableStore, NewRecord, RecordId, RecordPatch, SecretRecord, StrongboxError,
};
use tokio::sync::{watch, Mutex};
use tracing::debug;

use crate::codec::FieldCodec;
use crate::key::KeyManager;
use crate::store::{HydrationReport, QuarantinedRecord, VaultStore};
use crate::view::filter_records;

/// Names of the two durable slots a vault uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotNames {
    pub key: String,
    pub vault: String,
}

impl Default for SlotNames {
    fn default() -> Self {
        Self::from(&StorageConfig::default())
    }
}

impl From<&StorageConfig> for SlotNames {
    fn from(config: &StorageConfig) -> Self {
        Self {
            key: config.key_slot.clone(),
            vault: config.vault_slot.clone(),
        }
    }
}

pub struct VaultSession {
    keys: KeyManager,
    codec: FieldCodec,
    store: Arc<dyn DurableStore>,
    vault_slot: String,
    vault: Mutex<Option<VaultStore>>,
    gate: watch::Sender<bool>,
}

impl VaultSession {
    pub fn new(
        store: Arc<dyn DurableStore>,
        provider: Arc<dyn AeadProvider>,
        slots: SlotNames,
    ) -> Self {
        let (gate, _) = watch::channel(false);
        Self {
            keys: KeyManager::new(store.clone(), provider.clone(), slots.key),
            codec: FieldCodec::new(provider),
            store,
            vault_slot: slots.vault,
            vault: Mutex::new(None),
            gate,
        }
    }

    /// Subscribe to the "vault accessible" signal. It turns true once the key
    /// is resolved and falls back to false if hydration then fails.
    pub fn accessible(&self) -> watch::Receiver<bool> {
        self.gate.subscribe()
    }

    pub fn is_accessible(&self) -> bool {
        *self.gate.borrow()
    }

    pub fn keys(&self) -> &KeyManager {
        &self.keys
    }

    /// Resolve the key and hydrate the vault. A second call is a no-op and
    /// returns an empty report.
    pub async fn unlock(&self) -> Result<HydrationReport, StrongboxError> {
        let mut guard = self.vault.lock().await;
        if guard.is_some() {
            debug!("vault already unlocked");
            return Ok(HydrationReport::default());
        }

        let key = self.keys.load_or_create().await?;
        self.gate.send_replace(true);

        let mut vault = VaultStore::new(
            self.store.clone(),
            self.codec.clone(),
            key,
            self.vault_slot.clone(),
        );
        let report = match vault.hydrate().await {
            Ok(report) => report,
            Err(e) => {
                self.gate.send_replace(false);
                return Err(e);
            }
        };
        *guard = Some(vault);
        Ok(report)
    }

    pub async fn records(&self) -> Result<Vec<SecretRecord>, StrongboxError> {
        let guard = self.vault.lock().await;
        let vault = guard.as_ref().ok_or(StrongboxError::Locked)?;
        Ok(vault.records().to_vec())
    }

    pub async fn get(&self, id: &RecordId) -> Result<Option<SecretRecord>, StrongboxError> {
        let guard = self.vault.lock().await;
        let vault = guard.as_ref().ok_or(StrongboxError::Locked)?;
        Ok(vault.get(id).cloned())
    }

    /// Records whose title, username or url contain `query`, ignoring case.
    pub async fn search(&self, query: &str) -> Result<Vec<SecretRecord>, StrongboxError> {
        let guard = self.vault.lock().await;
        let vault = guard.as_ref().ok_or(StrongboxError::Locked)?;
        Ok(filter_records(vault.records(), query)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn quarantined(&self) -> Result<Vec<QuarantinedRecord>, StrongboxError> {
        let guard = self.vault.lock().await;
        let vault = guard.as_ref().ok_or(StrongboxError::Locked)?;
        Ok(vault.quarantined().to_vec())
    }

    pub async fn create(&self, fields: &NewRecord) -> Result<SecretRecord, StrongboxError> {
        let mut guard = self.vault.lock().await;
        let vault = guard.as_mut().ok_or(StrongboxError::Locked)?;
        vault.create(fields).await
    }

    pub async fn update(
        &self,
        id: &RecordId,
        patch: &RecordPatch,
    ) -> Result<SecretRecord, StrongboxError> {
        let mut guard = self.vault.lock().await;
        let vault = guard.as_mut().ok_or(StrongboxError::Locked)?;
        vault.update(id, patch).await
    }

    pub async fn delete(&self, id: &RecordId) -> Result<(), StrongboxError> {
        let mut guard = self.vault.lock().await;
        let vault = guard.as_mut().ok_or(StrongboxError::Locked)?;
        vault.delete(id).await
    }

    pub async fn discard_quarantined(&self) -> Result<usize, StrongboxError> {
        let mut guard = self.vault.lock().await;
        let vault = guard.as_mut().ok_or(StrongboxError::Locked)?;
        vault.discard_quarantined().await
    }

    pub async fn rotate_key(&self) -> Result<(), StrongboxError> {
        let mut guard = self.vault.lock().await;
        let vault = guard.as_mut().ok_or(StrongboxError::Locked)?;
        vault.rotate_key(&self.keys).await
    }
}

impl std::fmt::Debug for VaultSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultSession")
            .field("keys", &self.keys)
            .field("vault_slot", &self.vault_slot)
            .field("accessible", &self.is_accessible())
            .finish_non_exhaustive()
    }
}
