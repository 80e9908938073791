// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Strongbox credential vault.
//!
//! This crate provides the error taxonomy, the record and key types, and the
//! capability traits ([`AeadProvider`], [`DurableStore`]) that the vault and
//! the storage backends are written against.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::StrongboxError;
pub use traits::{AeadProvider, DurableStore};
pub use types::{CipherBlob, NewRecord, RecordId, RecordPatch, SecretField, SecretRecord, VaultKey};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::str::FromStr;

    fn sample() -> SecretRecord {
        let fields = NewRecord {
            title: "Example".into(),
            username: "a@b.com".into(),
            password: "p1".into(),
            url: "https://e.com".into(),
            notes: String::new(),
        };
        SecretRecord::new(RecordId::from("rec-1"), &fields, Utc::now())
    }

    #[test]
    fn record_local_errors_are_classified() {
        assert!(StrongboxError::Authentication.is_record_local());
        assert!(StrongboxError::MalformedBlob("short".into()).is_record_local());
        assert!(!StrongboxError::KeyCorrupt("bad".into()).is_record_local());
        assert!(!StrongboxError::storage(std::io::Error::other("disk")).is_record_local());
        assert!(!StrongboxError::NotFound { id: "x".into() }.is_record_local());
    }

    #[test]
    fn record_debug_redacts_confidential_fields() {
        let record = sample();
        let debug = format!("{record:?}");
        assert!(debug.contains("Example"));
        assert!(debug.contains("https://e.com"));
        assert!(!debug.contains("a@b.com"));
        assert!(!debug.contains("p1\""));
    }

    #[test]
    fn patch_preserves_unspecified_fields() {
        let mut record = sample();
        let patch = RecordPatch {
            password: Some("p2".into()),
            ..Default::default()
        };
        patch.apply_to(&mut record);

        assert_eq!(record.password, "p2");
        assert_eq!(record.username, "a@b.com");
        assert_eq!(record.title, "Example");
        assert_eq!(record.url, "https://e.com");
    }

    #[test]
    fn empty_patch_is_detected() {
        assert!(RecordPatch::default().is_empty());
        let patch = RecordPatch {
            notes: Some(String::new()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn vault_key_export_import() {
        let key = VaultKey::from_bytes(vec![7u8; 32]);
        let exported = key.export();
        let imported = VaultKey::import(&exported, 32).unwrap();
        assert_eq!(imported.as_bytes(), key.as_bytes());
    }

    #[test]
    fn vault_key_import_rejects_wrong_length() {
        let short = VaultKey::from_bytes(vec![1u8; 16]).export();
        let err = VaultKey::import(&short, 32).unwrap_err();
        assert!(matches!(err, StrongboxError::KeyCorrupt(_)));
    }

    #[test]
    fn vault_key_import_rejects_garbage() {
        let err = VaultKey::import("not base64 at all!", 32).unwrap_err();
        assert!(matches!(err, StrongboxError::KeyCorrupt(_)));
    }

    #[test]
    fn vault_key_debug_is_redacted() {
        let key = VaultKey::from_bytes(vec![0xAB; 32]);
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("171"));
    }

    #[test]
    fn cipher_blob_nonce_prefix() {
        let blob = CipherBlob::encode(&[1, 2, 3, 4, 5]);
        assert_eq!(blob.nonce(3).unwrap(), vec![1, 2, 3]);
        assert!(matches!(blob.nonce(12), Err(StrongboxError::MalformedBlob(_))));
    }

    #[test]
    fn secret_field_names() {
        assert_eq!(SecretField::Password.to_string(), "password");
        assert_eq!(SecretField::from_str("notes").unwrap(), SecretField::Notes);
        assert_eq!(SecretField::ALL.len(), 3);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(RecordId::generate(), RecordId::generate());
    }
}
