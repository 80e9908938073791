// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The authoritative in-memory record list and its encrypted mirror.
//!
//! Every mutation is applied to a copy of the list, the copy is encrypted and
//! written to the vault slot, and only after the write succeeds does the copy
//! replace the live list. A failed write therefore leaves memory unchanged.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use strongbox_core::{
    DurableStore, NewRecord, RecordId, RecordPatch, SecretField, SecretRecord, StrongboxError,
    VaultKey,
};
use tracing::{debug, info, warn};

use crate::codec::FieldCodec;
use crate::key::KeyManager;
use crate::persisted::{describe_raw, PersistedRecord, PersistedVault};

/// A record that could not be loaded during hydration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadWarning {
    pub id: Option<RecordId>,
    pub title: Option<String>,
    /// The confidential field that failed, when the record parsed at all.
    pub field: Option<SecretField>,
    pub reason: String,
}

impl std::fmt::Display for LoadWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.id {
            Some(id) => write!(f, "record {id}")?,
            None => f.write_str("record without id")?,
        }
        if let Some(title) = &self.title {
            write!(f, " ({title})")?;
        }
        if let Some(field) = self.field {
            write!(f, ", field {field}")?;
        }
        write!(f, ": {}", self.reason)
    }
}

/// Outcome of [`VaultStore::hydrate`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    pub loaded: usize,
    pub warnings: Vec<LoadWarning>,
}

impl HydrationReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A persisted entry excluded from the live list.
///
/// The raw JSON is carried through every persist untouched, so fixing the key
/// or the data later can still recover it.
#[derive(Debug, Clone, PartialEq)]
pub struct QuarantinedRecord {
    pub id: Option<RecordId>,
    pub title: Option<String>,
    pub reason: String,
    raw: Value,
}

impl QuarantinedRecord {
    fn new(warning: &LoadWarning, raw: Value) -> Self {
        Self {
            id: warning.id.clone(),
            title: warning.title.clone(),
            reason: warning.reason.clone(),
            raw,
        }
    }

    /// The entry exactly as it was read from storage.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

pub struct VaultStore {
    store: Arc<dyn DurableStore>,
    codec: FieldCodec,
    key: VaultKey,
    slot: String,
    records: Vec<SecretRecord>,
    quarantine: Vec<QuarantinedRecord>,
    hydrated: bool,
}

impl VaultStore {
    /// A store in the key-ready state. Call [`hydrate`](Self::hydrate) before
    /// any mutation.
    pub fn new(
        store: Arc<dyn DurableStore>,
        codec: FieldCodec,
        key: VaultKey,
        slot: impl Into<String>,
    ) -> Self {
        Self {
            store,
            codec,
            key,
            slot: slot.into(),
            records: Vec::new(),
            quarantine: Vec::new(),
            hydrated: false,
        }
    }

    pub fn is_hydrated(&self) -> bool {
        self.hydrated
    }

    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// Live records in insertion order.
    pub fn records(&self) -> &[SecretRecord] {
        &self.records
    }

    pub fn get(&self, id: &RecordId) -> Option<&SecretRecord> {
        self.records.iter().find(|record| &record.id == id)
    }

    pub fn quarantined(&self) -> &[QuarantinedRecord] {
        &self.quarantine
    }

    /// Load and decrypt the vault slot, replacing the in-memory state.
    ///
    /// An absent slot is an empty vault and nothing is written. A document
    /// that does not parse aborts the load. Records that fail to decrypt or
    /// repeat an earlier id are quarantined and reported.
    pub async fn hydrate(&mut self) -> Result<HydrationReport, StrongboxError> {
        let Some(bytes) = self.store.get(&self.slot).await? else {
            self.records.clear();
            self.quarantine.clear();
            self.hydrated = true;
            debug!(slot = %self.slot, "vault slot empty");
            return Ok(HydrationReport::default());
        };

        let document = PersistedVault::parse(&bytes)?;
        let mut records = Vec::with_capacity(document.records.len());
        let mut quarantine = Vec::new();
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for raw in document.records {
            let persisted = match serde_json::from_value::<PersistedRecord>(raw.clone()) {
                Ok(persisted) => persisted,
                Err(e) => {
                    let (id, title) = describe_raw(&raw);
                    let warning = LoadWarning {
                        id,
                        title,
                        field: None,
                        reason: format!("unreadable record: {e}"),
                    };
                    quarantine.push(QuarantinedRecord::new(&warning, raw));
                    warnings.push(warning);
                    continue;
                }
            };

            if seen.contains(&persisted.id) {
                let warning = LoadWarning {
                    id: Some(persisted.id.clone()),
                    title: Some(persisted.title.clone()),
                    field: None,
                    reason: "duplicate record id".to_string(),
                };
                quarantine.push(QuarantinedRecord::new(&warning, raw));
                warnings.push(warning);
                continue;
            }

            match self.open_record(&persisted) {
                Ok(record) => {
                    seen.insert(record.id.clone());
                    records.push(record);
                }
                Err((field, err)) if err.is_record_local() => {
                    let warning = LoadWarning {
                        id: Some(persisted.id.clone()),
                        title: Some(persisted.title.clone()),
                        field: Some(field),
                        reason: err.to_string(),
                    };
                    quarantine.push(QuarantinedRecord::new(&warning, raw));
                    warnings.push(warning);
                }
                Err((_, err)) => return Err(err),
            }
        }

        for warning in &warnings {
            warn!(%warning, "record quarantined");
        }
        let report = HydrationReport {
            loaded: records.len(),
            warnings,
        };
        self.records = records;
        self.quarantine = quarantine;
        self.hydrated = true;
        info!(
            slot = %self.slot,
            loaded = report.loaded,
            quarantined = self.quarantine.len(),
            "vault hydrated"
        );
        Ok(report)
    }

    pub async fn create(&mut self, fields: &NewRecord) -> Result<SecretRecord, StrongboxError> {
        self.ensure_hydrated()?;
        let record = SecretRecord::new(self.fresh_id(), fields, Utc::now());
        let mut next = self.records.clone();
        next.push(record.clone());
        self.commit(next, None).await?;
        debug!(id = %record.id, "record created");
        Ok(record)
    }

    /// Apply `patch` to the record with `id` and refresh its timestamp.
    pub async fn update(
        &mut self,
        id: &RecordId,
        patch: &RecordPatch,
    ) -> Result<SecretRecord, StrongboxError> {
        self.ensure_hydrated()?;
        let mut next = self.records.clone();
        let record = next
            .iter_mut()
            .find(|record| &record.id == id)
            .ok_or_else(|| StrongboxError::NotFound { id: id.to_string() })?;
        patch.apply_to(record);
        record.last_modified = Utc::now();
        let updated = record.clone();
        self.commit(next, None).await?;
        debug!(id = %id, "record updated");
        Ok(updated)
    }

    /// Remove the record with `id`, live or quarantined. Succeeds when no such
    /// record exists.
    pub async fn delete(&mut self, id: &RecordId) -> Result<(), StrongboxError> {
        self.ensure_hydrated()?;
        let next: Vec<SecretRecord> = self
            .records
            .iter()
            .filter(|record| &record.id != id)
            .cloned()
            .collect();
        let quarantine: Vec<QuarantinedRecord> = self
            .quarantine
            .iter()
            .filter(|entry| entry.id.as_ref() != Some(id))
            .cloned()
            .collect();
        let removed = (self.records.len() - next.len()) + (self.quarantine.len() - quarantine.len());
        self.commit(next, Some(quarantine)).await?;
        debug!(id = %id, removed, "record deleted");
        Ok(())
    }

    /// Re-encrypt every record with fresh nonces and overwrite the vault slot.
    pub async fn persist(&mut self) -> Result<(), StrongboxError> {
        self.ensure_hydrated()?;
        let payload = self.encode(&self.records, &self.quarantine, &self.key)?;
        self.store.set(&self.slot, &payload).await
    }

    /// Drop every quarantined record for good. Returns how many were dropped.
    pub async fn discard_quarantined(&mut self) -> Result<usize, StrongboxError> {
        self.ensure_hydrated()?;
        let count = self.quarantine.len();
        if count == 0 {
            return Ok(0);
        }
        self.commit(self.records.clone(), Some(Vec::new())).await?;
        warn!(count, "quarantined records discarded");
        Ok(count)
    }

    /// Re-encrypt the vault under a new key.
    ///
    /// The new key and the re-encrypted vault are written in one atomic
    /// `set_many`, so storage never pairs a key with ciphertext it cannot
    /// open. Both slots must live in this store.
    pub async fn rotate_key(&mut self, keys: &KeyManager) -> Result<(), StrongboxError> {
        self.ensure_hydrated()?;
        if !self.quarantine.is_empty() {
            return Err(StrongboxError::RotationBlocked {
                quarantined: self.quarantine.len(),
            });
        }

        let new_key = keys.generate()?;
        let payload = self.encode(&self.records, &[], &new_key)?;
        let exported = keys.export(&new_key);
        self.store
            .set_many(&[
                (keys.slot(), exported.as_bytes()),
                (self.slot.as_str(), payload.as_slice()),
            ])
            .await?;
        self.key = new_key;
        info!(records = self.records.len(), "vault key rotated");
        Ok(())
    }

    fn ensure_hydrated(&self) -> Result<(), StrongboxError> {
        if self.hydrated {
            Ok(())
        } else {
            Err(StrongboxError::NotHydrated)
        }
    }

    fn fresh_id(&self) -> RecordId {
        loop {
            let id = RecordId::generate();
            let taken = self.get(&id).is_some()
                || self.quarantine.iter().any(|entry| entry.id.as_ref() == Some(&id));
            if !taken {
                return id;
            }
        }
    }

    /// Persist `records` (and `quarantine`, when given), then adopt them.
    async fn commit(
        &mut self,
        records: Vec<SecretRecord>,
        quarantine: Option<Vec<QuarantinedRecord>>,
    ) -> Result<(), StrongboxError> {
        let kept = quarantine.as_deref().unwrap_or(&self.quarantine);
        let payload = self.encode(&records, kept, &self.key)?;
        self.store.set(&self.slot, &payload).await?;
        self.records = records;
        if let Some(quarantine) = quarantine {
            self.quarantine = quarantine;
        }
        Ok(())
    }

    fn encode(
        &self,
        records: &[SecretRecord],
        quarantine: &[QuarantinedRecord],
        key: &VaultKey,
    ) -> Result<Vec<u8>, StrongboxError> {
        let mut values = Vec::with_capacity(records.len() + quarantine.len());
        for record in records {
            let sealed = self.seal_record(record, key)?;
            let value = serde_json::to_value(&sealed).map_err(|e| {
                StrongboxError::Internal(format!("failed to serialize record {}: {e}", record.id))
            })?;
            values.push(value);
        }
        values.extend(quarantine.iter().map(|entry| entry.raw.clone()));
        PersistedVault::new(values).to_bytes()
    }

    fn seal_record(&self, record: &SecretRecord, key: &VaultKey) -> Result<PersistedRecord, StrongboxError> {
        Ok(PersistedRecord {
            id: record.id.clone(),
            title: record.title.clone(),
            username: self.codec.encrypt_field(&record.username, key)?,
            password: self.codec.encrypt_field(&record.password, key)?,
            url: record.url.clone(),
            notes: self.codec.encrypt_field(&record.notes, key)?,
            last_modified: record.last_modified,
        })
    }

    fn open_record(
        &self,
        persisted: &PersistedRecord,
    ) -> Result<SecretRecord, (SecretField, StrongboxError)> {
        let open = |field: SecretField| {
            let blob = match field {
                SecretField::Username => &persisted.username,
                SecretField::Password => &persisted.password,
                SecretField::Notes => &persisted.notes,
            };
            self.codec
                .decrypt_field(blob, &self.key)
                .map_err(|err| (field, err))
        };
        Ok(SecretRecord {
            id: persisted.id.clone(),
            title: persisted.title.clone(),
            username: open(SecretField::Username)?,
            password: open(SecretField::Password)?,
            url: persisted.url.clone(),
            notes: open(SecretField::Notes)?,
            last_modified: persisted.last_modified,
        })
    }
}

impl std::fmt::Debug for VaultStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultStore")
            .field("store", &self.store.name())
            .field("slot", &self.slot)
            .field("records", &self.records.len())
            .field("quarantined", &self.quarantine.len())
            .field("hydrated", &self.hydrated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::RingAead;
    use strongbox_core::AeadProvider;
    use strongbox_storage::MemoryStore;

    fn sample(title: &str) -> NewRecord {
        NewRecord {
            title: title.to_string(),
            username: format!("{title}@example.com"),
            password: format!("{title}-pw"),
            url: format!("https://{title}.example.com"),
            notes: String::new(),
        }
    }

    fn vault(store: Arc<MemoryStore>) -> VaultStore {
        let provider = Arc::new(RingAead::new());
        let key = provider.generate_key().unwrap();
        VaultStore::new(store, FieldCodec::new(provider), key, "vault-items")
    }

    #[tokio::test]
    async fn mutations_require_hydration() {
        let store = Arc::new(MemoryStore::new());
        let mut vault = vault(store.clone());

        assert!(matches!(
            vault.create(&sample("a")).await,
            Err(StrongboxError::NotHydrated)
        ));
        assert!(matches!(
            vault.delete(&RecordId::from("x")).await,
            Err(StrongboxError::NotHydrated)
        ));
        assert!(matches!(vault.persist().await, Err(StrongboxError::NotHydrated)));
        assert!(store.slot_names().await.is_empty());
    }

    #[tokio::test]
    async fn hydrate_of_absent_slot_writes_nothing() {
        let store = Arc::new(MemoryStore::new());
        let mut vault = vault(store.clone());
        let report = vault.hydrate().await.unwrap();
        assert_eq!(report, HydrationReport::default());
        assert!(vault.is_hydrated());
        assert!(store.slot_names().await.is_empty());
    }

    #[tokio::test]
    async fn insertion_order_is_kept_and_delete_is_in_place() {
        let mut vault = vault(Arc::new(MemoryStore::new()));
        vault.hydrate().await.unwrap();
        let a = vault.create(&sample("a")).await.unwrap();
        let b = vault.create(&sample("b")).await.unwrap();
        let c = vault.create(&sample("c")).await.unwrap();

        vault.delete(&b.id).await.unwrap();

        let ids: Vec<_> = vault.records().iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![a.id.clone(), c.id.clone()]);
    }

    #[tokio::test]
    async fn update_missing_id_is_not_found() {
        let mut vault = vault(Arc::new(MemoryStore::new()));
        vault.hydrate().await.unwrap();
        let patch = RecordPatch {
            title: Some("x".into()),
            ..Default::default()
        };
        let err = vault.update(&RecordId::from("nope"), &patch).await.unwrap_err();
        assert!(matches!(err, StrongboxError::NotFound { id } if id == "nope"));
    }

    #[tokio::test]
    async fn partial_update_preserves_other_fields() {
        let mut vault = vault(Arc::new(MemoryStore::new()));
        vault.hydrate().await.unwrap();
        let original = vault.create(&sample("site")).await.unwrap();

        let patch = RecordPatch {
            password: Some("rotated".into()),
            ..Default::default()
        };
        let updated = vault.update(&original.id, &patch).await.unwrap();

        assert_eq!(updated.password, "rotated");
        assert_eq!(updated.username, original.username);
        assert_eq!(updated.title, original.title);
        assert_eq!(updated.url, original.url);
        assert!(updated.last_modified >= original.last_modified);
        assert_eq!(vault.get(&original.id), Some(&updated));
    }

    #[tokio::test]
    async fn failed_persist_leaves_memory_unchanged() {
        let store = Arc::new(MemoryStore::new());
        let mut vault = vault(store.clone());
        vault.hydrate().await.unwrap();
        let kept = vault.create(&sample("kept")).await.unwrap();

        store.set_fail_writes(true);
        assert!(vault.create(&sample("lost")).await.is_err());
        assert!(vault.delete(&kept.id).await.is_err());
        let patch = RecordPatch {
            title: Some("renamed".into()),
            ..Default::default()
        };
        assert!(vault.update(&kept.id, &patch).await.is_err());

        assert_eq!(vault.records().len(), 1);
        assert_eq!(vault.records()[0], kept);
    }

    #[tokio::test]
    async fn unparseable_document_aborts_hydration() {
        let store = Arc::new(MemoryStore::new());
        store.set("vault-items", b"{ truncated").await.unwrap();
        let mut vault = vault(store);
        assert!(matches!(vault.hydrate().await, Err(StrongboxError::Format(_))));
        assert!(!vault.is_hydrated());
    }

    #[tokio::test]
    async fn malformed_entry_is_quarantined_with_its_id() {
        let store = Arc::new(MemoryStore::new());
        store
            .set(
                "vault-items",
                br#"{"version":1,"records":[{"id":"broken","title":"Old","password":42}]}"#,
            )
            .await
            .unwrap();
        let mut vault = vault(store);

        let report = vault.hydrate().await.unwrap();

        assert_eq!(report.loaded, 0);
        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.warnings[0].id, Some(RecordId::from("broken")));
        assert_eq!(report.warnings[0].field, None);
        assert_eq!(vault.quarantined().len(), 1);
    }

    #[tokio::test]
    async fn discard_quarantined_drops_and_persists() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("vault-items", br#"[{"id":"junk"}]"#)
            .await
            .unwrap();
        let mut vault = vault(store.clone());
        vault.hydrate().await.unwrap();

        assert_eq!(vault.discard_quarantined().await.unwrap(), 1);
        assert!(vault.quarantined().is_empty());

        let doc = PersistedVault::parse(&store.get("vault-items").await.unwrap().unwrap()).unwrap();
        assert!(doc.records.is_empty());
        assert_eq!(vault.discard_quarantined().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_removes_quarantined_entry() {
        let store = Arc::new(MemoryStore::new());
        store
            .set("vault-items", br#"[{"id":"junk"},{"id":"other"}]"#)
            .await
            .unwrap();
        let mut vault = vault(store);
        vault.hydrate().await.unwrap();

        vault.delete(&RecordId::from("junk")).await.unwrap();

        let left: Vec<_> = vault.quarantined().iter().map(|q| q.id.clone()).collect();
        assert_eq!(left, vec![Some(RecordId::from("other"))]);
    }

    #[test]
    fn warning_display_names_the_record() {
        let warning = LoadWarning {
            id: Some(RecordId::from("r1")),
            title: Some("Bank".into()),
            field: Some(SecretField::Password),
            reason: "authentication failed".into(),
        };
        assert_eq!(
            warning.to_string(),
            "record r1 (Bank), field password: authentication failed"
        );
    }
}
