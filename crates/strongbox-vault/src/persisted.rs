// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! On-disk shape of the vault slot.
//!
//! ```json
//! { "version": 1, "records": [ { "id": "...", "title": "...", "url": "...",
//!   "lastModified": "2026-01-01T00:00:00Z",
//!   "username": "<blob>", "password": "<blob>", "notes": "<blob>" } ] }
//! ```
//!
//! Records are kept as raw JSON values at the document level so one bad
//! entry can be set aside without failing the whole load. A bare top-level
//! array of records is accepted on read as the unversioned legacy layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strongbox_core::{CipherBlob, RecordId, StrongboxError};

/// Current document version.
pub const VAULT_FORMAT_VERSION: u32 = 1;

/// One record with its confidential fields sealed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedRecord {
    pub id: RecordId,
    pub title: String,
    pub username: CipherBlob,
    pub password: CipherBlob,
    pub url: String,
    pub notes: CipherBlob,
    pub last_modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersistedVault {
    pub version: u32,
    pub records: Vec<Value>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Document {
    Versioned(PersistedVault),
    Legacy(Vec<Value>),
}

impl PersistedVault {
    pub fn new(records: Vec<Value>) -> Self {
        Self {
            version: VAULT_FORMAT_VERSION,
            records,
        }
    }

    /// Parse the vault slot. Only a document that is unreadable as a whole
    /// fails; individual records are validated later.
    pub fn parse(bytes: &[u8]) -> Result<Self, StrongboxError> {
        let document: Document = serde_json::from_slice(bytes).map_err(|e| {
            StrongboxError::Format(format!("vault document is not valid JSON: {e}"))
        })?;
        match document {
            Document::Versioned(vault) if vault.version == VAULT_FORMAT_VERSION => Ok(vault),
            Document::Versioned(vault) => Err(StrongboxError::Format(format!(
                "unsupported vault format version {}",
                vault.version
            ))),
            Document::Legacy(records) => Ok(Self::new(records)),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, StrongboxError> {
        serde_json::to_vec(self)
            .map_err(|e| StrongboxError::Internal(format!("failed to serialize vault: {e}")))
    }
}

/// Best-effort `(id, title)` of a raw record, for warnings about entries
/// that did not parse.
pub fn describe_raw(raw: &Value) -> (Option<RecordId>, Option<String>) {
    let id = raw
        .get("id")
        .and_then(Value::as_str)
        .map(RecordId::from);
    let title = raw.get("title").and_then(Value::as_str).map(str::to_owned);
    (id, title)
}
