// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Durable key-value storage trait.

use async_trait::async_trait;

use crate::error::StrongboxError;

/// Named-slot storage over byte strings.
///
/// Every write is atomic from the caller's perspective: after `set` returns,
/// the slot holds either the complete new value or (on error) its previous
/// value, never a partial write.
#[async_trait]
pub trait DurableStore: Send + Sync + 'static {
    /// Returns the backend name for logging (e.g. `file`, `sqlite`).
    fn name(&self) -> &str;

    /// Read a slot. `Ok(None)` when the slot has never been written.
    async fn get(&self, slot: &str) -> Result<Option<Vec<u8>>, StrongboxError>;

    /// Overwrite a slot atomically.
    async fn set(&self, slot: &str, value: &[u8]) -> Result<(), StrongboxError>;

    /// Overwrite several slots as one atomic unit: all are written or none.
    async fn set_many(&self, entries: &[(&str, &[u8])]) -> Result<(), StrongboxError>;

    /// Remove a slot. Removing an absent slot is not an error.
    async fn remove(&self, slot: &str) -> Result<(), StrongboxError>;
}
