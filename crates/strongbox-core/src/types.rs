// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared by the vault, storage backends, and front ends.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::error::StrongboxError;

/// Unique identifier for a vault record.
///
/// Opaque text; new records get a UUID v4, but any string read back from
/// storage is accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub String);

impl RecordId {
    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// The confidential fields of a record, i.e. the ones stored encrypted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum SecretField {
    Username,
    Password,
    Notes,
}

impl SecretField {
    /// All confidential fields, in persisted order.
    pub const ALL: [SecretField; 3] = [Self::Username, Self::Password, Self::Notes];
}

/// One decrypted vault entry.
///
/// Deliberately not `Serialize`: the only serializable form of a record is
/// the encrypted one. Confidential fields are wiped when the record drops.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretRecord {
    #[zeroize(skip)]
    pub id: RecordId,
    #[zeroize(skip)]
    pub title: String,
    pub username: String,
    pub password: String,
    #[zeroize(skip)]
    pub url: String,
    pub notes: String,
    #[zeroize(skip)]
    pub last_modified: DateTime<Utc>,
}

impl SecretRecord {
    /// Build a record from user-supplied fields.
    pub fn new(id: RecordId, fields: &NewRecord, last_modified: DateTime<Utc>) -> Self {
        Self {
            id,
            title: fields.title.clone(),
            username: fields.username.clone(),
            password: fields.password.clone(),
            url: fields.url.clone(),
            notes: fields.notes.clone(),
            last_modified,
        }
    }

    /// Plaintext value of one confidential field.
    pub fn secret(&self, field: SecretField) -> &str {
        match field {
            SecretField::Username => &self.username,
            SecretField::Password => &self.password,
            SecretField::Notes => &self.notes,
        }
    }
}

impl std::fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRecord")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("username", &"[REDACTED]")
            .field("password", &"[REDACTED]")
            .field("url", &self.url)
            .field("notes", &"[REDACTED]")
            .field("last_modified", &self.last_modified)
            .finish()
    }
}

/// Fields supplied when creating a record.
#[derive(Clone, Default)]
pub struct NewRecord {
    pub title: String,
    pub username: String,
    pub password: String,
    pub url: String,
    pub notes: String,
}

impl std::fmt::Debug for NewRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewRecord")
            .field("title", &self.title)
            .field("url", &self.url)
            .finish_non_exhaustive()
    }
}

/// A partial edit. `None` leaves the field unchanged.
#[derive(Clone, Default)]
pub struct RecordPatch {
    pub title: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub url: Option<String>,
    pub notes: Option<String>,
}

impl RecordPatch {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.url.is_none()
            && self.notes.is_none()
    }

    /// Apply the supplied fields to `record`, leaving the rest untouched.
    ///
    /// Does not touch `last_modified`; the store owns the clock.
    pub fn apply_to(&self, record: &mut SecretRecord) {
        if let Some(title) = &self.title {
            record.title.clone_from(title);
        }
        if let Some(username) = &self.username {
            record.username.zeroize();
            record.username.clone_from(username);
        }
        if let Some(password) = &self.password {
            record.password.zeroize();
            record.password.clone_from(password);
        }
        if let Some(url) = &self.url {
            record.url.clone_from(url);
        }
        if let Some(notes) = &self.notes {
            record.notes.zeroize();
            record.notes.clone_from(notes);
        }
    }
}

impl std::fmt::Debug for RecordPatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordPatch")
            .field("title", &self.title)
            .field("username", &self.username.as_ref().map(|_| "[REDACTED]"))
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("url", &self.url)
            .field("notes", &self.notes.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// A symmetric AEAD key held in zeroizing memory.
///
/// Debug output intentionally omits the key bytes.
#[derive(Clone)]
pub struct VaultKey {
    bytes: Zeroizing<Vec<u8>>,
}

impl VaultKey {
    /// Wrap raw key bytes. Length is validated by the AEAD provider.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Zeroizing::new(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Serialize the raw key bytes as standard base64.
    pub fn export(&self) -> Zeroizing<String> {
        Zeroizing::new(STANDARD.encode(self.bytes.as_slice()))
    }

    /// Parse an exported key, requiring exactly `expected_len` raw bytes.
    pub fn import(encoded: &str, expected_len: usize) -> Result<Self, StrongboxError> {
        let raw = Zeroizing::new(
            STANDARD
                .decode(encoded.trim())
                .map_err(|e| StrongboxError::KeyCorrupt(format!("not valid base64: {e}")))?,
        );
        if raw.len() != expected_len {
            return Err(StrongboxError::KeyCorrupt(format!(
                "expected {expected_len} key bytes, found {}",
                raw.len()
            )));
        }
        Ok(Self::from_bytes(raw.to_vec()))
    }
}

impl std::fmt::Debug for VaultKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultKey")
            .field("len", &self.bytes.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// The persisted form of one confidential field: `base64(nonce ‖ ciphertext ‖ tag)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CipherBlob(String);

impl CipherBlob {
    /// Encode raw `nonce ‖ sealed` bytes.
    pub fn encode(raw: &[u8]) -> Self {
        Self(STANDARD.encode(raw))
    }

    /// Decode back to raw bytes.
    pub fn decode(&self) -> Result<Vec<u8>, StrongboxError> {
        STANDARD
            .decode(&self.0)
            .map_err(|e| StrongboxError::MalformedBlob(format!("not valid base64: {e}")))
    }

    /// The leading nonce bytes of the blob.
    pub fn nonce(&self, nonce_len: usize) -> Result<Vec<u8>, StrongboxError> {
        let raw = self.decode()?;
        if raw.len() < nonce_len {
            return Err(StrongboxError::MalformedBlob(format!(
                "blob is {} bytes, shorter than the {nonce_len}-byte nonce",
                raw.len()
            )));
        }
        Ok(raw[..nonce_len].to_vec())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for CipherBlob {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for CipherBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
