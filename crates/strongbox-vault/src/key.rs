// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vault key lifecycle: load the persisted key or create it on first use.

use std::sync::Arc;

use strongbox_core::{AeadProvider, DurableStore, StrongboxError, VaultKey};
use tracing::{debug, info};
use zeroize::Zeroizing;

/// Owns the durable key slot.
///
/// A key that exists but cannot be parsed is reported as
/// [`StrongboxError::KeyCorrupt`] and left in place. Replacing it would make
/// every stored ciphertext unrecoverable.
#[derive(Clone)]
pub struct KeyManager {
    store: Arc<dyn DurableStore>,
    provider: Arc<dyn AeadProvider>,
    slot: String,
}

impl KeyManager {
    pub fn new(
        store: Arc<dyn DurableStore>,
        provider: Arc<dyn AeadProvider>,
        slot: impl Into<String>,
    ) -> Self {
        Self {
            store,
            provider,
            slot: slot.into(),
        }
    }

    /// Name of the slot holding the exported key.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    pub fn provider(&self) -> &Arc<dyn AeadProvider> {
        &self.provider
    }

    /// Read the persisted key, if any.
    pub async fn load(&self) -> Result<Option<VaultKey>, StrongboxError> {
        let Some(bytes) = self.store.get(&self.slot).await? else {
            return Ok(None);
        };
        let bytes = Zeroizing::new(bytes);
        let encoded = std::str::from_utf8(&bytes)
            .map_err(|_| StrongboxError::KeyCorrupt("stored key is not UTF-8 text".to_string()))?;
        let key = self.provider.import_key(encoded)?;
        debug!(slot = %self.slot, "vault key loaded");
        Ok(Some(key))
    }

    /// Return the persisted key, generating and persisting one if the slot is
    /// empty. The new key is written before it is returned, so a later run
    /// always sees the same key.
    pub async fn load_or_create(&self) -> Result<VaultKey, StrongboxError> {
        if let Some(key) = self.load().await? {
            return Ok(key);
        }

        let key = self.generate()?;
        let exported = self.export(&key);
        self.store.set(&self.slot, exported.as_bytes()).await?;
        info!(slot = %self.slot, algorithm = self.provider.algorithm(), "generated new vault key");
        Ok(key)
    }

    /// Generate a fresh key without persisting it.
    pub fn generate(&self) -> Result<VaultKey, StrongboxError> {
        self.provider.generate_key()
    }

    /// Serialized form of `key`, as written to the key slot.
    pub fn export(&self, key: &VaultKey) -> Zeroizing<String> {
        self.provider.export_key(key)
    }
}

impl std::fmt::Debug for KeyManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyManager")
            .field("store", &self.store.name())
            .field("algorithm", &self.provider.algorithm())
            .field("slot", &self.slot)
            .finish()
    }
}
