// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Field-level encryption.
//!
//! Each confidential field is sealed on its own with a fresh nonce and stored
//! as `base64(nonce ‖ ciphertext ‖ tag)`.

use std::sync::Arc;

use strongbox_core::{AeadProvider, CipherBlob, StrongboxError, VaultKey};
use zeroize::Zeroizing;

#[derive(Clone)]
pub struct FieldCodec {
    provider: Arc<dyn AeadProvider>,
}

impl FieldCodec {
    pub fn new(provider: Arc<dyn AeadProvider>) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &Arc<dyn AeadProvider> {
        &self.provider
    }

    /// Seal `plaintext` under `key`. The empty string is a valid input.
    pub fn encrypt_field(&self, plaintext: &str, key: &VaultKey) -> Result<CipherBlob, StrongboxError> {
        let mut raw = vec![0u8; self.provider.nonce_len()];
        self.provider.fill_nonce(&mut raw)?;
        let sealed = self.provider.seal(key, &raw, plaintext.as_bytes())?;
        raw.extend_from_slice(&sealed);
        Ok(CipherBlob::encode(&raw))
    }

    /// Open a blob produced by [`encrypt_field`](Self::encrypt_field).
    ///
    /// Fails with [`StrongboxError::MalformedBlob`] when the blob cannot hold a
    /// nonce and tag, and [`StrongboxError::Authentication`] when it was
    /// tampered with or sealed under another key.
    pub fn decrypt_field(&self, blob: &CipherBlob, key: &VaultKey) -> Result<String, StrongboxError> {
        let raw = blob.decode()?;
        let nonce_len = self.provider.nonce_len();
        let min_len = nonce_len + self.provider.tag_len();
        if raw.len() < min_len {
            return Err(StrongboxError::MalformedBlob(format!(
                "blob is {} bytes, needs at least {min_len}",
                raw.len()
            )));
        }

        let (nonce, sealed) = raw.split_at(nonce_len);
        let plaintext = Zeroizing::new(self.provider.open(key, nonce, sealed)?);
        std::str::from_utf8(&plaintext)
            .map(str::to_owned)
            .map_err(|_| StrongboxError::MalformedBlob("decrypted field is not UTF-8".to_string()))
    }
}

impl std::fmt::Debug for FieldCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldCodec")
            .field("algorithm", &self.provider.algorithm())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::{RingAead, NONCE_LEN, TAG_LEN};
    use proptest::prelude::*;

    fn codec() -> FieldCodec {
        FieldCodec::new(Arc::new(RingAead::new()))
    }

    #[test]
    fn empty_string_round_trips() {
        let codec = codec();
        let key = codec.provider().generate_key().unwrap();
        let blob = codec.encrypt_field("", &key).unwrap();
        assert_eq!(blob.decode().unwrap().len(), NONCE_LEN + TAG_LEN);
        assert_eq!(codec.decrypt_field(&blob, &key).unwrap(), "");
    }

    #[test]
    fn same_plaintext_gets_distinct_blobs() {
        let codec = codec();
        let key = codec.provider().generate_key().unwrap();
        let a = codec.encrypt_field("hunter2", &key).unwrap();
        let b = codec.encrypt_field("hunter2", &key).unwrap();
        assert_ne!(a, b);
        assert_ne!(a.nonce(NONCE_LEN).unwrap(), b.nonce(NONCE_LEN).unwrap());
    }

    #[test]
    fn wrong_key_fails_authentication() {
        let codec = codec();
        let k1 = codec.provider().generate_key().unwrap();
        let k2 = codec.provider().generate_key().unwrap();
        let blob = codec.encrypt_field("secret", &k1).unwrap();
        assert!(matches!(
            codec.decrypt_field(&blob, &k2),
            Err(StrongboxError::Authentication)
        ));
    }

    #[test]
    fn every_flipped_byte_is_detected() {
        let codec = codec();
        let key = codec.provider().generate_key().unwrap();
        let raw = codec.encrypt_field("pw", &key).unwrap().decode().unwrap();

        for i in 0..raw.len() {
            let mut tampered = raw.clone();
            tampered[i] ^= 0x01;
            let err = codec
                .decrypt_field(&CipherBlob::encode(&tampered), &key)
                .unwrap_err();
            assert!(
                matches!(err, StrongboxError::Authentication),
                "byte {i} flip gave {err:?}"
            );
        }
    }

    #[test]
    fn short_blob_is_malformed() {
        let codec = codec();
        let key = codec.provider().generate_key().unwrap();
        let blob = CipherBlob::encode(&[0u8; NONCE_LEN + TAG_LEN - 1]);
        assert!(matches!(
            codec.decrypt_field(&blob, &key),
            Err(StrongboxError::MalformedBlob(_))
        ));
    }

    #[test]
    fn non_base64_blob_is_malformed() {
        let codec = codec();
        let key = codec.provider().generate_key().unwrap();
        let blob = CipherBlob::from("not*base64!".to_string());
        assert!(matches!(
            codec.decrypt_field(&blob, &key),
            Err(StrongboxError::MalformedBlob(_))
        ));
    }

    proptest! {
        #[test]
        fn any_text_round_trips(text in ".*") {
            let codec = codec();
            let key = codec.provider().generate_key().unwrap();
            let blob = codec.encrypt_field(&text, &key).unwrap();
            prop_assert_eq!(codec.decrypt_field(&blob, &key).unwrap(), text);
        }
    }
}
