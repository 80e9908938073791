// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Capability traits injected into the vault at construction.
//!
//! The vault never touches a cipher or a storage medium directly; it goes
//! through an [`AeadProvider`] and a [`DurableStore`] so both can be swapped
//! for other implementations or test doubles.

pub mod aead;
pub mod store;

pub use aead::AeadProvider;
pub use store::DurableStore;
