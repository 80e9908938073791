// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-file slot store.
//!
//! All slots live in one JSON document (`{"version":1,"slots":{name: base64}}`).
//! Every write rewrites the whole document into a temp file in the same
//! directory, fsyncs it, and renames it over the original. A reader therefore
//! sees either the old document or the new one, which makes `set_many` atomic
//! across slots as well.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use strongbox_core::{DurableStore, StrongboxError};
use tokio::sync::Mutex;
use tracing::debug;

const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Default, Serialize, Deserialize)]
struct SlotFile {
    version: u32,
    slots: BTreeMap<String, String>,
}

/// File-backed slot store.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the document. A missing file is an empty store; an unparseable
    /// one is an error, never silently treated as empty.
    async fn read_document(&self) -> Result<SlotFile, StrongboxError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SlotFile {
                    version: FORMAT_VERSION,
                    slots: BTreeMap::new(),
                });
            }
            Err(e) => return Err(StrongboxError::storage(e)),
        };

        let doc: SlotFile = serde_json::from_slice(&bytes).map_err(|e| {
            StrongboxError::storage(format!(
                "slot file {} is not valid: {e}",
                self.path.display()
            ))
        })?;
        if doc.version != FORMAT_VERSION {
            return Err(StrongboxError::storage(format!(
                "slot file {} has unsupported version {}",
                self.path.display(),
                doc.version
            )));
        }
        Ok(doc)
    }

    async fn write_document(&self, doc: SlotFile) -> Result<(), StrongboxError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || write_atomically(&path, &doc))
            .await
            .map_err(|e| StrongboxError::Internal(format!("file write task failed: {e}")))?
    }

    async fn modify<F>(&self, apply: F) -> Result<(), StrongboxError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self.write_lock.lock().await;
        let mut doc = self.read_document().await?;
        apply(&mut doc.slots);
        self.write_document(doc).await
    }
}

fn write_atomically(path: &Path, doc: &SlotFile) -> Result<(), StrongboxError> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(StrongboxError::storage)?;

    let body = serde_json::to_vec_pretty(doc).map_err(StrongboxError::storage)?;

    // tempfile creates the file with owner-only permissions on Unix.
    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(StrongboxError::storage)?;
    tmp.write_all(&body).map_err(StrongboxError::storage)?;
    tmp.as_file().sync_all().map_err(StrongboxError::storage)?;
    tmp.persist(path)
        .map_err(|e| StrongboxError::storage(e.error))?;
    Ok(())
}

#[async_trait]
impl DurableStore for FileStore {
    fn name(&self) -> &str {
        "file"
    }

    async fn get(&self, slot: &str) -> Result<Option<Vec<u8>>, StrongboxError> {
        let doc = self.read_document().await?;
        doc.slots
            .get(slot)
            .map(|encoded| {
                STANDARD.decode(encoded).map_err(|e| {
                    StrongboxError::storage(format!("slot `{slot}` is not valid base64: {e}"))
                })
            })
            .transpose()
    }

    async fn set(&self, slot: &str, value: &[u8]) -> Result<(), StrongboxError> {
        let encoded = STANDARD.encode(value);
        self.modify(|slots| {
            slots.insert(slot.to_string(), encoded);
        })
        .await?;
        debug!(slot = %slot, path = %self.path.display(), "slot written");
        Ok(())
    }

    async fn set_many(&self, entries: &[(&str, &[u8])]) -> Result<(), StrongboxError> {
        self.modify(|slots| {
            for (slot, value) in entries {
                slots.insert(slot.to_string(), STANDARD.encode(value));
            }
        })
        .await?;
        debug!(count = entries.len(), path = %self.path.display(), "slots written");
        Ok(())
    }

    async fn remove(&self, slot: &str) -> Result<(), StrongboxError> {
        self.modify(|slots| {
            slots.remove(slot);
        })
        .await?;
        debug!(slot = %slot, "slot removed");
        Ok(())
    }
}
