// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Strongbox credential vault.

use thiserror::Error;

/// The primary error type used across the vault, storage backends, and CLI.
#[derive(Debug, Error)]
pub enum StrongboxError {
    /// Stored key material cannot be parsed into a valid key.
    ///
    /// Fatal: the vault cannot be unlocked. The key is never regenerated
    /// automatically because that would orphan every existing ciphertext.
    #[error("vault key is corrupt: {0}")]
    KeyCorrupt(String),

    /// The authentication tag did not verify (tampered data or wrong key).
    #[error("authentication failed -- wrong key or tampered ciphertext")]
    Authentication,

    /// A cipher blob could not be decoded into nonce and ciphertext.
    #[error("malformed cipher blob: {0}")]
    MalformedBlob(String),

    /// A record id was referenced that is not in the vault.
    #[error("record not found: {id}")]
    NotFound { id: String },

    /// Durable storage read or write failure.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The persisted vault document could not be parsed at all.
    #[error("persisted vault is unreadable: {0}")]
    Format(String),

    /// A mutation was attempted before the store was hydrated.
    #[error("vault store has not been hydrated")]
    NotHydrated,

    /// An operation was attempted before the session was unlocked.
    #[error("vault is locked")]
    Locked,

    /// Key rotation was refused because some records could not be decrypted.
    #[error("key rotation blocked: {quarantined} quarantined record(s) would become unrecoverable")]
    RotationBlocked { quarantined: usize },

    /// Configuration or option errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// The AEAD provider or random source failed.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl StrongboxError {
    /// Wrap any error as a storage failure.
    pub fn storage<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Storage { source: err.into() }
    }

    /// Whether this error only affects a single field or record.
    ///
    /// Hydration uses this to quarantine a record instead of aborting the load.
    pub fn is_record_local(&self) -> bool {
        matches!(self, Self::Authentication | Self::MalformedBlob(_))
    }
}
