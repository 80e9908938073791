// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! AES-256-GCM encrypted local credential vault.
//!
//! A single random key, kept in its own durable slot, seals every
//! confidential field of every record independently. The decrypted records
//! live in memory; each mutation re-encrypts the whole collection with fresh
//! nonces and writes it back in one atomic slot write.

pub mod codec;
pub mod crypto;
pub mod generator;
pub mod key;
pub mod mask;
pub mod persisted;
pub mod session;
pub mod store;
pub mod view;

pub use codec::FieldCodec;
pub use crypto::RingAead;
pub use generator::{generate_password, GeneratorOptions};
pub use key::KeyManager;
pub use mask::mask_secret;
pub use persisted::{PersistedRecord, PersistedVault, VAULT_FORMAT_VERSION};
pub use session::{SlotNames, VaultSession};
pub use store::{HydrationReport, LoadWarning, QuarantinedRecord, VaultStore};
pub use view::filter_records;
