// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM provider backed by `ring`.
//!
//! Keys and nonces come from the system CSPRNG. Nonce reuse under one key
//! would be catastrophic for GCM, so callers must take a fresh nonce from
//! [`AeadProvider::fill_nonce`] for every seal.

use ring::aead::{Aad, LessSafeKey, Nonce, UnboundKey, AES_256_GCM};
use ring::rand::{SecureRandom, SystemRandom};
use strongbox_core::{AeadProvider, StrongboxError, VaultKey};

/// AES-256 key length in bytes.
pub const KEY_LEN: usize = 32;

/// GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = ring::aead::NONCE_LEN;

/// GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// The default AEAD provider.
pub struct RingAead {
    rng: SystemRandom,
}

impl RingAead {
    pub fn new() -> Self {
        Self {
            rng: SystemRandom::new(),
        }
    }

    fn less_safe_key(key: &VaultKey) -> Result<LessSafeKey, StrongboxError> {
        let unbound = UnboundKey::new(&AES_256_GCM, key.as_bytes()).map_err(|_| {
            StrongboxError::KeyCorrupt(format!(
                "AES-256-GCM needs a {KEY_LEN}-byte key, got {} bytes",
                key.len()
            ))
        })?;
        Ok(LessSafeKey::new(unbound))
    }

    fn nonce(nonce: &[u8]) -> Result<Nonce, StrongboxError> {
        Nonce::try_assume_unique_for_key(nonce).map_err(|_| {
            StrongboxError::MalformedBlob(format!(
                "nonce must be {NONCE_LEN} bytes, got {}",
                nonce.len()
            ))
        })
    }
}

impl Default for RingAead {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RingAead {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingAead")
            .field("algorithm", &self.algorithm())
            .finish()
    }
}

impl AeadProvider for RingAead {
    fn algorithm(&self) -> &'static str {
        "AES-256-GCM"
    }

    fn key_len(&self) -> usize {
        KEY_LEN
    }

    fn nonce_len(&self) -> usize {
        NONCE_LEN
    }

    fn tag_len(&self) -> usize {
        TAG_LEN
    }

    fn generate_key(&self) -> Result<VaultKey, StrongboxError> {
        let mut key = zeroize::Zeroizing::new([0u8; KEY_LEN]);
        self.rng
            .fill(key.as_mut())
            .map_err(|_| StrongboxError::Crypto("failed to generate random key".to_string()))?;
        Ok(VaultKey::from_bytes(key.to_vec()))
    }

    fn fill_nonce(&self, nonce: &mut [u8]) -> Result<(), StrongboxError> {
        self.rng
            .fill(nonce)
            .map_err(|_| StrongboxError::Crypto("failed to generate random nonce".to_string()))
    }

    fn seal(&self, key: &VaultKey, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, StrongboxError> {
        let key = Self::less_safe_key(key)?;
        let nonce = Self::nonce(nonce)?;

        // Seal in place: the buffer is extended with the authentication tag.
        let mut in_out = plaintext.to_vec();
        key.seal_in_place_append_tag(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| StrongboxError::Crypto("AES-256-GCM encryption failed".to_string()))?;
        Ok(in_out)
    }

    fn open(&self, key: &VaultKey, nonce: &[u8], sealed: &[u8]) -> Result<Vec<u8>, StrongboxError> {
        let key = Self::less_safe_key(key)?;
        let nonce = Self::nonce(nonce)?;

        let mut in_out = sealed.to_vec();
        let plaintext = key
            .open_in_place(nonce, Aad::empty(), &mut in_out)
            .map_err(|_| StrongboxError::Authentication)?;
        Ok(plaintext.to_vec())
    }
}
