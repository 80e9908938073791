// SPDX-FileCopyrightText: 2026 Strongbox Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./strongbox.toml` > `~/.config/strongbox/strongbox.toml`
//! > `/etc/strongbox/strongbox.toml` with environment variable overrides via
//! the `STRONGBOX_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};

use crate::model::StrongboxConfig;

/// System-wide config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/strongbox/strongbox.toml";

/// Config file looked up in the working directory.
pub const LOCAL_CONFIG_FILE: &str = "strongbox.toml";

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/strongbox/strongbox.toml` (system-wide)
/// 3. `~/.config/strongbox/strongbox.toml` (user XDG config)
/// 4. `./strongbox.toml` (local directory)
/// 5. `STRONGBOX_*` environment variables
pub fn load_config() -> Result<StrongboxConfig, figment::Error> {
    build_figment().extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit configuration.
pub fn load_config_from_str(toml_content: &str) -> Result<StrongboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StrongboxConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<StrongboxConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(StrongboxConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Build the Figment used internally for config loading.
///
/// Returns the Figment before extraction so callers can inspect metadata.
pub fn build_figment() -> Figment {
    Figment::new()
        .merge(Serialized::defaults(StrongboxConfig::default()))
        .merge(Toml::file(SYSTEM_CONFIG_PATH))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("strongbox").join(LOCAL_CONFIG_FILE))
                .unwrap_or_default(),
        ))
        .merge(Toml::file(LOCAL_CONFIG_FILE))
        .merge(env_provider())
}

/// Create the environment variable provider using explicit `map()` for section-to-dot mapping.
///
/// Uses `Env::map()` rather than `Env::split("_")` because keys contain
/// underscores: `STRONGBOX_STORAGE_KEY_SLOT` must map to `storage.key_slot`,
/// not `storage.key.slot`.
fn env_provider() -> Env {
    Env::prefixed("STRONGBOX_")
        // Consumed by the CLI directly, never part of the config tree.
        .ignore(&["entry_password"])
        .map(|key| {
            // Env hands over the suffix in its original case.
            let mapped = key
                .as_str()
                .to_ascii_lowercase()
                .replacen("storage_", "storage.", 1)
                .replacen("generator_", "generator.", 1)
                .replacen("logging_", "logging.", 1);
            mapped.into()
        })
}
