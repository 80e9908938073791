// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Strongbox credential vault.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Top-level Strongbox configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StrongboxConfig {
    /// Durable storage settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Password generator defaults.
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Which durable store backs the vault.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Display, EnumString, Deserialize, Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum StorageBackend {
    /// A single JSON file replaced atomically on every write.
    #[default]
    File,
    /// A SQLite database with one row per slot.
    Sqlite,
    /// Process-local memory; nothing survives exit.
    Memory,
}

/// Durable storage configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Storage backend.
    #[serde(default)]
    pub backend: StorageBackend,

    /// Path of the vault file or database. Defaults per backend when unset.
    #[serde(default)]
    pub path: Option<String>,

    /// Slot holding the exported encryption key.
    #[serde(default = "default_key_slot")]
    pub key_slot: String,

    /// Slot holding the encrypted record collection.
    #[serde(default = "default_vault_slot")]
    pub vault_slot: String,

    /// Enable WAL (Write-Ahead Logging) mode for the SQLite backend.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            path: None,
            key_slot: default_key_slot(),
            vault_slot: default_vault_slot(),
            wal_mode: default_wal_mode(),
        }
    }
}

impl StorageConfig {
    /// The configured path, or the XDG data-dir default for the backend.
    pub fn resolved_path(&self) -> PathBuf {
        if let Some(path) = &self.path {
            return PathBuf::from(path);
        }
        let file_name = match self.backend {
            StorageBackend::Sqlite => "vault.db",
            StorageBackend::File | StorageBackend::Memory => "vault.json",
        };
        dirs::data_dir()
            .map(|p| p.join("strongbox"))
            .unwrap_or_else(|| PathBuf::from(".strongbox"))
            .join(file_name)
    }
}

fn default_key_slot() -> String {
    "vault-key".to_string()
}

fn default_vault_slot() -> String {
    "vault-items".to_string()
}

fn default_wal_mode() -> bool {
    true
}

/// Password generator defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Number of characters (8..=64).
    #[serde(default = "default_length")]
    pub length: usize,

    /// Include `A-Z`.
    #[serde(default = "default_true")]
    pub uppercase: bool,

    /// Include `a-z`.
    #[serde(default = "default_true")]
    pub lowercase: bool,

    /// Include `0-9`.
    #[serde(default = "default_true")]
    pub numbers: bool,

    /// Include punctuation symbols.
    #[serde(default = "default_true")]
    pub symbols: bool,

    /// Drop look-alike characters such as `l`, `1`, `O`, `0`.
    #[serde(default)]
    pub exclude_similar: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            length: default_length(),
            uppercase: true,
            lowercase: true,
            numbers: true,
            symbols: true,
            exclude_similar: false,
        }
    }
}

fn default_length() -> usize {
    16
}

fn default_true() -> bool {
    true
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}
