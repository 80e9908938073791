// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authenticated-encryption provider trait.

use crate::error::StrongboxError;
use crate::types::VaultKey;

/// A trusted AEAD primitive plus its key and nonce source.
///
/// Implementations must draw keys and nonces from a cryptographically secure
/// random source. `seal` output is `ciphertext ‖ tag`.
pub trait AeadProvider: Send + Sync + 'static {
    /// Human-readable algorithm name, e.g. `AES-256-GCM`.
    fn algorithm(&self) -> &'static str;

    /// Raw key length in bytes.
    fn key_len(&self) -> usize;

    /// Nonce length in bytes.
    fn nonce_len(&self) -> usize;

    /// Authentication tag length in bytes.
    fn tag_len(&self) -> usize;

    /// Generate a fresh random key of [`key_len`](Self::key_len) bytes.
    fn generate_key(&self) -> Result<VaultKey, StrongboxError>;

    /// Fill `nonce` with fresh random bytes.
    fn fill_nonce(&self, nonce: &mut [u8]) -> Result<(), StrongboxError>;

    /// Encrypt and authenticate `plaintext`, returning `ciphertext ‖ tag`.
    fn seal(&self, key: &VaultKey, nonce: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, StrongboxError>;

    /// Verify and decrypt `ciphertext ‖ tag`.
    ///
    /// Returns [`StrongboxError::Authentication`] when the tag does not verify.
    fn open(&self, key: &VaultKey, nonce: &[u8], sealed: &[u8]) -> Result<Vec<u8>, StrongboxError>;

    /// Serialize a key for durable storage.
    fn export_key(&self, key: &VaultKey) -> zeroize::Zeroizing<String> {
        key.export()
    }

    /// Parse a stored key, rejecting material of the wrong length.
    fn import_key(&self, encoded: &str) -> Result<VaultKey, StrongboxError> {
        VaultKey::import(encoded, self.key_len())
    }
}
